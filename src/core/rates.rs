//! Rate types and the provider abstraction

use crate::core::currency::Currency;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One network response: rates for every symbol relative to `base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesSnapshot {
    pub base: Currency,
    pub date: NaiveDate,
    pub rates: IndexMap<Currency, Decimal>,
}

/// A displayable row: a currency, its rate against the current base and the
/// base amount the user entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub currency: Currency,
    pub rate: Decimal,
    pub multiplier: Option<Decimal>,
}

impl RateEntry {
    pub fn new(currency: Currency, rate: Decimal, multiplier: Option<Decimal>) -> Self {
        RateEntry {
            currency,
            rate,
            multiplier,
        }
    }

    /// A base entry: rate 1 with the given amount.
    pub fn base(currency: Currency, multiplier: Option<Decimal>) -> Self {
        Self::new(currency, Decimal::ONE, multiplier)
    }

    pub fn symbol(&self) -> &str {
        self.currency.symbol()
    }

    /// The converted amount shown for this row, blank without a multiplier.
    pub fn amount(&self) -> Option<Decimal> {
        self.multiplier.and_then(|m| self.rate.checked_mul(m))
    }
}

/// Outcome of a single fetch as seen by consumers. Every error kind
/// collapses into `Failure`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(RatesSnapshot),
    Failure,
}

impl From<Result<RatesSnapshot>> for FetchOutcome {
    fn from(result: Result<RatesSnapshot>) -> Self {
        match result {
            Ok(snapshot) => FetchOutcome::Success(snapshot),
            Err(_) => FetchOutcome::Failure,
        }
    }
}

#[async_trait]
pub trait RatesProvider: Send + Sync {
    async fn fetch_rates(&self, base: &Currency) -> Result<RatesSnapshot>;
}
