use crate::core::currency::Currency;
use crate::core::rates::{RatesProvider, RatesSnapshot};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// RatesApiProvider fetches `/latest?base=<SYMBOL>` from a rates API
pub struct RatesApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl RatesApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ratewatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(RatesApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    date: NaiveDate,
    rates: IndexMap<String, Decimal>,
}

impl TryFrom<LatestRatesResponse> for RatesSnapshot {
    type Error = anyhow::Error;

    fn try_from(response: LatestRatesResponse) -> Result<Self> {
        let rates = response
            .rates
            .into_iter()
            .filter_map(|(symbol, rate)| match symbol.parse::<Currency>() {
                Ok(currency) => Some((currency, rate)),
                Err(e) => {
                    warn!(%symbol, error = %e, "Skipping rate with an invalid symbol");
                    None
                }
            })
            .collect();
        Ok(RatesSnapshot {
            base: response.base.parse()?,
            date: response.date,
            rates,
        })
    }
}

#[async_trait]
impl RatesProvider for RatesApiProvider {
    #[instrument(name = "RatesFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &Currency) -> Result<RatesSnapshot> {
        let url = format!("{}/latest?base={}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {} URL: {}", e, base, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base: {}",
                response.status(),
                base
            ));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response for base: {base}"))?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        let snapshot = RatesSnapshot::try_from(data)
            .with_context(|| format!("Invalid rates response for base: {base}"))?;
        debug!(count = snapshot.rates.len(), date = %snapshot.date, "Received rates");
        Ok(snapshot)
    }
}
