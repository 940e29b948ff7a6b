//! Periodic rate polling with latest-wins delivery.

use crate::core::currency::Currency;
use crate::core::rates::{FetchOutcome, RatesProvider, RatesSnapshot};
use anyhow::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// A fetch result tagged with the poll loop that produced it.
#[derive(Debug, Clone)]
pub struct PollResult {
    pub generation: u64,
    pub base: Currency,
    pub outcome: FetchOutcome,
}

/// A running poll loop. Dropping it cancels the loop.
pub struct Poller {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Starts polling `base` every `interval`, the first fetch right away.
    ///
    /// A tick that fires while a fetch is still pending drops that fetch, so
    /// only the newest one can reach `sink`.
    pub fn spawn(
        provider: Arc<dyn RatesProvider>,
        base: Currency,
        interval: Duration,
        generation: u64,
        sink: UnboundedSender<PollResult>,
    ) -> Self {
        info!(%base, generation, ?interval, "Starting rate polling");
        let handle = tokio::spawn(poll_loop(provider, base, interval, generation, sink));
        Poller { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        debug!(generation = self.generation, "Cancelling rate polling");
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Resolves once the poll task has ended on its own.
    pub async fn finished(&mut self) {
        if let Err(e) = (&mut self.handle).await {
            if e.is_panic() {
                error!(generation = self.generation, "Rate polling panicked");
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

type PendingFetch = BoxFuture<'static, Result<RatesSnapshot>>;

async fn poll_loop(
    provider: Arc<dyn RatesProvider>,
    base: Currency,
    interval: Duration,
    generation: u64,
    sink: UnboundedSender<PollResult>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight: Option<PendingFetch> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if in_flight.is_some() {
                    debug!(%base, "Dropping superseded fetch");
                }
                let provider = Arc::clone(&provider);
                let base = base.clone();
                in_flight = Some(async move { provider.fetch_rates(&base).await }.boxed());
            }
            result = resolve(&mut in_flight) => {
                in_flight = None;
                if let Err(e) = &result {
                    warn!(%base, error = %e, "Failed to fetch rates");
                }
                let delivered = sink.send(PollResult {
                    generation,
                    base: base.clone(),
                    outcome: result.into(),
                });
                if delivered.is_err() {
                    debug!(generation, "Rate consumer is gone, stopping");
                    return;
                }
            }
        }
    }
}

async fn resolve(in_flight: &mut Option<PendingFetch>) -> Result<RatesSnapshot> {
    match in_flight {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}
