//! Update scripts between two displayed lists.
//!
//! Rows are matched by currency symbol and compared by rate and multiplier.
//! Applying the operations in order to the old list yields the new one:
//! removals first (highest position first), then inserts and moves, then
//! content changes addressed by their position in the new list.

use crate::core::rates::RateEntry;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// What a changed row needs for rebinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangePayload {
    /// Partial rebind with the new values.
    Rate {
        rate: Decimal,
        multiplier: Option<Decimal>,
    },
    /// The base row: skip the partial update and rebind fully.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    Removed { position: usize },
    Inserted { position: usize, entry: RateEntry },
    /// Remove at `from`, then insert at `to`.
    Moved { from: usize, to: usize },
    Changed { position: usize, payload: ChangePayload },
}

pub fn diff(old: &[RateEntry], new: &[RateEntry]) -> Vec<ListChange> {
    let new_positions: HashMap<&str, usize> = new
        .iter()
        .enumerate()
        .map(|(position, entry)| (entry.symbol(), position))
        .collect();
    let old_entries: HashMap<&str, &RateEntry> =
        old.iter().map(|entry| (entry.symbol(), entry)).collect();

    let mut changes = Vec::new();

    for (position, entry) in old.iter().enumerate().rev() {
        if !new_positions.contains_key(entry.symbol()) {
            changes.push(ListChange::Removed { position });
        }
    }

    let mut working: Vec<&str> = old
        .iter()
        .map(RateEntry::symbol)
        .filter(|symbol| new_positions.contains_key(symbol))
        .collect();
    let targets: Vec<usize> = working.iter().map(|symbol| new_positions[symbol]).collect();
    let stable: HashSet<&str> = longest_increasing_run(&targets)
        .into_iter()
        .zip(&working)
        .filter_map(|(keep, symbol)| keep.then_some(*symbol))
        .collect();

    // Walk the new list backwards; everything from `anchor` on is final.
    let mut anchor = working.len();
    for entry in new.iter().rev() {
        let symbol = entry.symbol();
        if !old_entries.contains_key(symbol) {
            working.insert(anchor, symbol);
            changes.push(ListChange::Inserted {
                position: anchor,
                entry: entry.clone(),
            });
            continue;
        }
        let Some(from) = working.iter().position(|s| *s == symbol) else {
            continue;
        };
        if stable.contains(symbol) {
            anchor = from;
            continue;
        }
        working.remove(from);
        let to = if from < anchor { anchor - 1 } else { anchor };
        working.insert(to, symbol);
        if from != to {
            changes.push(ListChange::Moved { from, to });
        }
        anchor = to;
    }

    for (position, entry) in new.iter().enumerate() {
        let Some(previous) = old_entries.get(entry.symbol()) else {
            continue;
        };
        if previous.rate != entry.rate || previous.multiplier != entry.multiplier {
            let payload = if position == 0 {
                ChangePayload::Skip
            } else {
                ChangePayload::Rate {
                    rate: entry.rate,
                    multiplier: entry.multiplier,
                }
            };
            changes.push(ListChange::Changed { position, payload });
        }
    }

    changes
}

/// Marks one longest strictly increasing subsequence of `values`.
fn longest_increasing_run(values: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; values.len()];

    for (index, &value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&tail| values[tail] < value);
        if slot > 0 {
            previous[index] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(index);
        } else {
            tails[slot] = index;
        }
    }

    let mut keep = vec![false; values.len()];
    let mut cursor = tails.last().copied();
    while let Some(index) = cursor {
        keep[index] = true;
        cursor = previous[index];
    }
    keep
}
