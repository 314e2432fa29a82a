//! Standing order and dense ranks

use std::collections::HashMap;

use crate::{Aggregates, PersonAggregate};

/// People ordered by `(occurrence_count, total_charge_count)`, highest first
///
/// The sort is stable: people with equal keys keep the order in which their
/// names were first seen.
pub fn standings(aggregates: &Aggregates) -> Vec<&PersonAggregate> {
    let mut sorted: Vec<_> = aggregates.iter().collect();
    sorted.sort_by(|a, b| {
        (b.occurrence_count, b.total_charge_count).cmp(&(a.occurrence_count, a.total_charge_count))
    });
    sorted
}

/// Assign ranks to an already sorted sequence of `(name, occurrence_count)`
///
/// `sorted_entries` must be ordered descending by occurrence count and then
/// by `totals[name]`; this function does not sort. Entries sharing both keys
/// share a rank, and the next distinct pair gets its 1-based position, so
/// pairs `[(5,10), (5,10), (3,7), (1,1)]` rank `[1, 1, 3, 4]`. A name
/// missing from `totals` is treated as having a total of 0.
pub fn dense_rank(
    sorted_entries: &[(String, u32)],
    totals: &HashMap<String, u32>,
) -> HashMap<String, usize> {
    let mut ranks = HashMap::with_capacity(sorted_entries.len());
    let mut previous: Option<(u32, u32)> = None;
    let mut current_rank = 0;

    for (position, (name, occurrences)) in sorted_entries.iter().enumerate() {
        let key = (*occurrences, totals.get(name).copied().unwrap_or(0));
        if previous != Some(key) {
            current_rank = position + 1;
            previous = Some(key);
        }
        ranks.insert(name.clone(), current_rank);
    }

    ranks
}

/// Rank every person in `aggregates`
pub fn rank_aggregates(aggregates: &Aggregates) -> HashMap<String, usize> {
    let sorted: Vec<(String, u32)> = standings(aggregates)
        .into_iter()
        .map(|person| (person.name.clone(), person.occurrence_count))
        .collect();
    dense_rank(&sorted, &aggregates.totals())
}
