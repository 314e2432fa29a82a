//! Append-only history of every parsed record, and the guessing game built on it
//!
//! A [`RecordStore`] is an explicit value owned by the caller: the pipeline
//! appends to the one it is handed and never keeps a store of its own.

use std::{collections::HashSet, fs, io, path::Path};

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ArrestRecord, StoreError, names::canonical_name};

/// Number of suspects in a game unless told otherwise
pub const DEFAULT_GAME_PICKS: usize = 3;

/// Every record parsed so far, oldest run first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStore {
    records: Vec<ArrestRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store saved with [`save`](Self::save); a missing file is an empty store
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => {
                let store: Self = serde_json::from_str(&json)?;
                debug!(path = %path.display(), records = store.len(), "loaded record store");
                Ok(store)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(error) => Err(error.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn append(&mut self, records: impl IntoIterator<Item = ArrestRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[ArrestRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Uniformly pick one record
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ArrestRecord> {
        self.records.choose(rng)
    }

    /// Deal a game of `picks` suspects and their shuffled charges
    ///
    /// Only records with a mugshot and at least one charge line are eligible,
    /// and each person appears at most once (their first eligible record).
    /// With fewer eligible people than `picks`, all of them are dealt.
    pub fn sample_game<R: Rng + ?Sized>(&self, rng: &mut R, picks: usize) -> Game {
        let mut seen = HashSet::new();
        let eligible: Vec<(String, &ArrestRecord)> = self
            .records
            .iter()
            .filter(|record| record.image_url.is_some() && !record.charge_lines.is_empty())
            .filter_map(|record| {
                let name = canonical_name(&record.name);
                seen.insert(name.clone()).then_some((name, record))
            })
            .collect();

        let mut suspects = Vec::new();
        let mut charges = Vec::new();
        for (name, record) in eligible.choose_multiple(rng, picks) {
            let suspect = suspects.len();
            charges.extend(record.charge_lines.iter().map(|text| GameCharge {
                text: text.clone(),
                suspect,
            }));
            suspects.push(Suspect {
                name: name.clone(),
                image_url: record.image_url.clone().unwrap_or_default(),
            });
        }
        charges.shuffle(rng);

        Game { suspects, charges }
    }
}

/// A person whose mugshot is shown in a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suspect {
    pub name: String,
    pub image_url: String,
}

/// A charge line to be matched with its suspect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCharge {
    pub text: String,
    /// Index into [`Game::suspects`]
    pub suspect: usize,
}

/// Mugshots plus their charges in random order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub suspects: Vec<Suspect>,
    pub charges: Vec<GameCharge>,
}

impl Game {
    /// Whether the charge at `charge` belongs to the suspect at `suspect`
    pub fn is_match(&self, charge: usize, suspect: usize) -> bool {
        self.charges
            .get(charge)
            .is_some_and(|entry| entry.suspect == suspect)
    }

    /// How many of the `(charge, suspect)` guesses are right
    pub fn score(&self, guesses: &[(usize, usize)]) -> usize {
        guesses
            .iter()
            .filter(|&&(charge, suspect)| self.is_match(charge, suspect))
            .count()
    }
}
