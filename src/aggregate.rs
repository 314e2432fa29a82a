//! Folding arrest records into per-person totals

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ArrestRecord, charges::count_for_charge, names::canonical_name};

/// Running totals for one canonical name
///
/// `occurrence_count` counts posts, not charge lines. `total_charge_count`
/// sums [`count_for_charge`] over every charge line of every post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAggregate {
    pub name: String,
    pub occurrence_count: u32,
    pub total_charge_count: u32,
    pub image_url: Option<String>,
}

/// Per-person totals, iterated in the order names were first seen
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    people: Vec<PersonAggregate>,
    index: HashMap<String, usize>,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the totals
    ///
    /// The first image seen for a name is kept; later ones are ignored.
    /// Records whose name canonicalizes to nothing are dropped.
    pub fn add(&mut self, record: &ArrestRecord) {
        let name = canonical_name(&record.name);
        if name.is_empty() {
            return;
        }

        let slot = match self.index.get(&name) {
            Some(&slot) => slot,
            None => {
                self.people.push(PersonAggregate {
                    name: name.clone(),
                    occurrence_count: 0,
                    total_charge_count: 0,
                    image_url: None,
                });
                self.index.insert(name, self.people.len() - 1);
                self.people.len() - 1
            }
        };

        let person = &mut self.people[slot];
        person.occurrence_count += 1;
        person.total_charge_count = record
            .charge_lines
            .iter()
            .map(|line| count_for_charge(line))
            .fold(person.total_charge_count, u32::saturating_add);
        if person.image_url.is_none() {
            person.image_url = record.image_url.clone();
        }
    }

    /// Look up a person; the name is canonicalized first
    pub fn get(&self, name: &str) -> Option<&PersonAggregate> {
        self.index
            .get(&canonical_name(name))
            .map(|&slot| &self.people[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonAggregate> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Total charge count keyed by canonical name
    pub fn totals(&self) -> HashMap<String, u32> {
        self.people
            .iter()
            .map(|person| (person.name.clone(), person.total_charge_count))
            .collect()
    }
}

/// Fold records in arrival order
pub fn aggregate(records: &[ArrestRecord]) -> Aggregates {
    let mut aggregates = Aggregates::new();
    for record in records {
        aggregates.add(record);
    }
    aggregates
}
