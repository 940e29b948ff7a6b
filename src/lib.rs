pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::watch::WatchOptions;
use crate::core::amount::parse_amount;
use crate::core::config::{AppConfig, poll_interval_from_millis};
use crate::core::{Currency, RateEntry, RatesProvider};
use crate::providers::RatesApiProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Watch(WatchOptions),
    Convert {
        base: Option<Currency>,
        amount: Option<String>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratewatch starting...");

    if let AppCommand::Currencies = command {
        cli::currencies::run();
        return Ok(());
    }

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = RatesApiProvider::new(&config.provider.base_url, config.provider.timeout())?;

    match command {
        AppCommand::Watch(options) => {
            let base = resolve_base(&config, options.base.clone(), options.amount.as_deref())?;
            let interval = resolve_interval(&config, options.interval_ms)?;
            let provider: Arc<dyn RatesProvider> = Arc::new(provider);
            cli::watch::run(provider, base, interval, &options).await
        }
        AppCommand::Convert { base, amount } => {
            let base = resolve_base(&config, base, amount.as_deref())?;
            cli::convert::run(&provider, &base).await
        }
        AppCommand::Currencies => Ok(()),
    }
}

fn resolve_interval(config: &AppConfig, interval_ms: Option<u64>) -> Result<Duration> {
    match interval_ms {
        Some(millis) => poll_interval_from_millis(millis).context("Invalid --interval-ms"),
        None => config.poll_interval(),
    }
}

/// Builds the starting base entry; flags win over the config file.
fn resolve_base(
    config: &AppConfig,
    base: Option<Currency>,
    amount: Option<&str>,
) -> Result<RateEntry> {
    let currency = base.unwrap_or_else(|| config.base.clone());
    let multiplier = match amount {
        Some(amount) => parse_amount(amount).context("Invalid --amount")?,
        None => config.multiplier()?,
    };
    Ok(RateEntry::base(currency, multiplier))
}
