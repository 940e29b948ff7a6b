//! Turns rate snapshots into the displayed list.

use crate::core::rates::{RateEntry, RatesSnapshot};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Builds the displayed list for `snapshot`.
///
/// Every non-base symbol in the snapshot becomes an entry carrying the base
/// multiplier. With a `previous` list the entries keep their earlier
/// positions and unseen symbols go last; without one the snapshot order is
/// used. The base is always inserted at position 0 with rate 1.
pub fn rebase(
    snapshot: &RatesSnapshot,
    base: &RateEntry,
    previous: Option<&[RateEntry]>,
) -> Vec<RateEntry> {
    let mut entries: Vec<RateEntry> = snapshot
        .rates
        .iter()
        .filter(|(currency, _)| **currency != base.currency)
        .map(|(currency, rate)| RateEntry::new(currency.clone(), *rate, base.multiplier))
        .collect();

    if let Some(previous) = previous {
        let order: HashMap<&str, usize> = previous
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.symbol(), index))
            .collect();
        entries.sort_by_key(|entry| order.get(entry.symbol()).copied().unwrap_or(usize::MAX));
    }

    entries.insert(0, RateEntry::base(base.currency.clone(), base.multiplier));
    debug!(base = %base.currency, count = entries.len(), "Rebased rates");
    entries
}

/// Makes `entry` the new base, keeping the displayed amount: the new
/// multiplier is the old one times the entry's rate.
pub fn switch_base(entry: &RateEntry) -> RateEntry {
    let multiplier = entry.multiplier.and_then(|m| {
        let rebased = m.checked_mul(entry.rate);
        if rebased.is_none() {
            warn!(currency = %entry.currency, "Amount overflowed while switching base");
        }
        rebased
    });
    RateEntry::base(entry.currency.clone(), multiplier)
}
