use super::table::{RateTable, heading};
use super::ui;
use crate::core::RateEntry;
use crate::core::RatesProvider;
use crate::core::rebase::rebase;
use anyhow::{Context, Result, bail};
use tracing::debug;

/// Fetches one snapshot for `base` and prints the converted table.
pub async fn run(provider: &dyn RatesProvider, base: &RateEntry) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching rates for {}...", base.currency));
    let result = provider.fetch_rates(&base.currency).await;
    spinner.finish_and_clear();

    let snapshot =
        result.with_context(|| format!("Failed to fetch rates for {}", base.currency))?;
    if snapshot.base != base.currency {
        bail!(
            "Requested rates for {} but received {}",
            base.currency,
            snapshot.base
        );
    }
    debug!(count = snapshot.rates.len(), date = %snapshot.date, "Received rates");

    let rates = rebase(&snapshot, base, None);
    let mut table = RateTable::default();
    table.update(&rates, &[]);

    println!("{}", heading(base, snapshot.date));
    println!("{}", table.render());
    Ok(())
}
