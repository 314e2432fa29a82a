//! Assembling the ranked output handed to presentation code

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Aggregates, ArrestRecord,
    aggregate::aggregate,
    rank::{rank_aggregates, standings},
};

/// Default number of leaderboard slots
pub const DEFAULT_TOP_N: usize = 10;

/// Span of post dates observed during a walk
///
/// Both ends only ever widen: `earliest` moves backward, `latest` forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl DateWindow {
    pub fn widen_earliest(&mut self, date: NaiveDate) {
        if self.earliest.is_none_or(|earliest| date < earliest) {
            self.earliest = Some(date);
        }
    }

    pub fn widen_latest(&mut self, date: NaiveDate) {
        if self.latest.is_none_or(|latest| date > latest) {
            self.latest = Some(date);
        }
    }
}

/// One row of the leaderboard
///
/// `image_url` is empty when no mugshot was found for the person. `rank` is
/// `None` only when the rank map handed to [`assemble`] has no entry for the
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub occurrence_count: u32,
    pub rank: Option<usize>,
    pub total_charge_count: u32,
    pub image_url: String,
}

/// Join the top `top_n` people with their precomputed ranks
///
/// Rows follow [`standings`] order, so tied people appear in the order their
/// names were first seen. A person missing from `ranks` keeps their row
/// with no rank.
pub fn assemble(
    aggregates: &Aggregates,
    ranks: &HashMap<String, usize>,
    top_n: usize,
) -> Vec<RankedEntry> {
    standings(aggregates)
        .into_iter()
        .take(top_n)
        .map(|person| RankedEntry {
            name: person.name.clone(),
            occurrence_count: person.occurrence_count,
            rank: ranks.get(&person.name).copied(),
            total_charge_count: person.total_charge_count,
            image_url: person.image_url.clone().unwrap_or_default(),
        })
        .collect()
}

/// Result of a walk that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<RankedEntry>,
    pub window: DateWindow,
    pub pages_walked: usize,
    pub records_seen: usize,
    pub generated_at: DateTime<Utc>,
}

impl Leaderboard {
    /// Aggregate, rank and assemble `records` in one go
    pub fn build(
        records: &[ArrestRecord],
        window: DateWindow,
        pages_walked: usize,
        top_n: usize,
    ) -> Self {
        let aggregates = aggregate(records);
        let ranks = rank_aggregates(&aggregates);
        Self {
            entries: assemble(&aggregates, &ranks, top_n),
            window,
            pages_walked,
            records_seen: records.len(),
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
