//! State holder for the converter screen.
//!
//! Owns the current base entry, the last displayed list and the failure
//! flag, and drives a [`Poller`] for the current base.

use crate::core::currency::Currency;
use crate::core::diff::{ListChange, diff};
use crate::core::poller::{PollResult, Poller};
use crate::core::rates::{FetchOutcome, RateEntry, RatesProvider};
use crate::core::rebase::{rebase, switch_base};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum RatesUpdate {
    Rates {
        rates: Vec<RateEntry>,
        changes: Vec<ListChange>,
        as_of: NaiveDate,
    },
    Failure,
}

pub struct RatesViewModel {
    provider: Arc<dyn RatesProvider>,
    interval: Duration,
    base: RateEntry,
    rates: Option<Vec<RateEntry>>,
    failure: Option<bool>,
    generation: u64,
    poller: Option<Poller>,
    sender: UnboundedSender<PollResult>,
    receiver: UnboundedReceiver<PollResult>,
}

impl RatesViewModel {
    pub fn new(provider: Arc<dyn RatesProvider>, interval: Duration, base: RateEntry) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        RatesViewModel {
            provider,
            interval,
            base: RateEntry::base(base.currency, base.multiplier),
            rates: None,
            failure: None,
            generation: 0,
            poller: None,
            sender,
            receiver,
        }
    }

    pub fn base(&self) -> &RateEntry {
        &self.base
    }

    /// The displayed list, `None` until the first successful fetch.
    pub fn rates(&self) -> Option<&[RateEntry]> {
        self.rates.as_deref()
    }

    /// Whether the latest fetch failed, `None` before any fetch completed.
    pub fn failure(&self) -> Option<bool> {
        self.failure
    }

    pub fn is_running(&self) -> bool {
        self.poller.is_some()
    }

    /// Makes `entry` the base, carrying its displayed amount over.
    pub fn set_base(&mut self, entry: &RateEntry) {
        self.base = switch_base(entry);
        debug!(base = %self.base.currency, multiplier = ?self.base.multiplier, "Base changed");
        self.restart();
    }

    /// Makes the displayed row at `position` the base. Returns whether the
    /// base changed.
    pub fn select(&mut self, position: usize) -> bool {
        if position == 0 {
            return false;
        }
        let Some(entry) = self.rates.as_ref().and_then(|rates| rates.get(position)).cloned() else {
            return false;
        };
        self.set_base(&entry);
        true
    }

    /// Makes the displayed row for `currency` the base.
    pub fn select_currency(&mut self, currency: &Currency) -> bool {
        let position = self
            .rates
            .as_ref()
            .and_then(|rates| rates.iter().position(|entry| entry.currency == *currency));
        position.is_some_and(|position| self.select(position))
    }

    pub fn set_multiplier(&mut self, multiplier: Option<Decimal>) {
        self.base.multiplier = multiplier;
        debug!(base = %self.base.currency, ?multiplier, "Multiplier changed");
        self.restart();
    }

    /// Starts polling the current base, replacing any running loop.
    pub fn start(&mut self) {
        self.stop();
        self.poller = Some(Poller::spawn(
            Arc::clone(&self.provider),
            self.base.currency.clone(),
            self.interval,
            self.generation,
            self.sender.clone(),
        ));
    }

    /// Cancels polling. Results queued before this call are never applied.
    pub fn stop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
        self.generation += 1;
    }

    fn restart(&mut self) {
        if self.is_running() {
            self.start();
        }
    }

    /// Waits for the next result of the running poll loop and applies it.
    /// Returns `None` when polling is stopped or the poll task has ended.
    pub async fn next_update(&mut self) -> Option<RatesUpdate> {
        loop {
            let poller = self.poller.as_mut()?;
            let current = poller.generation();
            let result = tokio::select! {
                biased;
                result = self.receiver.recv() => result?,
                _ = poller.finished() => {
                    warn!(generation = current, "Rate polling ended unexpectedly");
                    self.poller = None;
                    self.generation += 1;
                    return None;
                }
            };
            if result.generation != current {
                debug!(
                    generation = result.generation,
                    current, "Dropping result from a cancelled poll"
                );
                continue;
            }
            if let Some(update) = self.apply(result.outcome) {
                return Some(update);
            }
        }
    }

    /// Applies one fetch outcome. A failure keeps the displayed list and
    /// raises the failure flag. Snapshots for another base are ignored.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Option<RatesUpdate> {
        match outcome {
            FetchOutcome::Success(snapshot) => {
                if snapshot.base != self.base.currency {
                    warn!(
                        expected = %self.base.currency,
                        received = %snapshot.base,
                        "Ignoring rates for another base"
                    );
                    return None;
                }
                let previous = self.rates.take();
                let rates = rebase(&snapshot, &self.base, previous.as_deref());
                let changes = diff(previous.as_deref().unwrap_or_default(), &rates);
                self.rates = Some(rates.clone());
                self.failure = Some(false);
                Some(RatesUpdate::Rates {
                    rates,
                    changes,
                    as_of: snapshot.date,
                })
            }
            FetchOutcome::Failure => {
                self.failure = Some(true);
                Some(RatesUpdate::Failure)
            }
        }
    }
}

impl Drop for RatesViewModel {
    fn drop(&mut self) {
        self.stop();
    }
}
