//! Currency symbols and their display metadata

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const EUR_SYMBOL: &str = "EUR";

/// Symbol, name and flag for every currency the rates API is known to serve.
pub const KNOWN_CURRENCIES: &[(&str, &str, &str)] = &[
    ("AUD", "Australian Dollar", "🇦🇺"),
    ("BGN", "Bulgarian Lev", "🇧🇬"),
    ("BRL", "Brazilian Real", "🇧🇷"),
    ("CAD", "Canadian Dollar", "🇨🇦"),
    ("CHF", "Swiss Franc", "🇨🇭"),
    ("CNY", "Yuan Renminbi", "🇨🇳"),
    ("CZK", "Czech Koruna", "🇨🇿"),
    ("DKK", "Danish Krone", "🇩🇰"),
    ("EUR", "Euro", "🇪🇺"),
    ("GBP", "Pound Sterling", "🇬🇧"),
    ("HKD", "Hong Kong Dollar", "🇭🇰"),
    ("HRK", "Croatian Kuna", "🇭🇷"),
    ("HUF", "Forint", "🇭🇺"),
    ("IDR", "Rupiah", "🇮🇩"),
    ("ILS", "New Israeli Sheqel", "🇮🇱"),
    ("INR", "Indian Rupee", "🇮🇳"),
    ("ISK", "Iceland Krona", "🇮🇸"),
    ("JPY", "Yen", "🇯🇵"),
    ("KRW", "Won", "🇰🇷"),
    ("MXN", "Mexican Peso", "🇲🇽"),
    ("MYR", "Malaysian Ringgit", "🇲🇾"),
    ("NOK", "Norwegian Krone", "🇳🇴"),
    ("NZD", "New Zealand Dollar", "🇳🇿"),
    ("PHP", "Philippine Peso", "🇵🇭"),
    ("PLN", "Zloty", "🇵🇱"),
    ("RON", "New Romanian Leu", "🇷🇴"),
    ("RUB", "Russian Ruble", "🇷🇺"),
    ("SEK", "Swedish Krona", "🇸🇪"),
    ("SGD", "Singapore Dollar", "🇸🇬"),
    ("THB", "Baht", "🇹🇭"),
    ("TRY", "Turkish Lira", "🇹🇷"),
    ("USD", "US Dollar", "🇺🇸"),
    ("ZAR", "Rand", "🇿🇦"),
];

/// An ISO 4217 currency symbol, always upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn symbol(&self) -> &str {
        &self.0
    }

    /// Display name, empty for symbols missing from [`KNOWN_CURRENCIES`].
    pub fn name(&self) -> &'static str {
        self.metadata().map_or("", |(_, name, _)| *name)
    }

    /// Icon reference for the currency, if one is known.
    pub fn flag(&self) -> Option<&'static str> {
        self.metadata().map(|(_, _, flag)| *flag)
    }

    pub fn is_known(&self) -> bool {
        self.metadata().is_some()
    }

    pub fn known() -> impl Iterator<Item = Currency> {
        KNOWN_CURRENCIES
            .iter()
            .map(|(symbol, _, _)| Currency((*symbol).to_string()))
    }

    fn metadata(&self) -> Option<&'static (&'static str, &'static str, &'static str)> {
        KNOWN_CURRENCIES
            .iter()
            .find(|(symbol, _, _)| *symbol == self.0)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency(EUR_SYMBOL.to_string())
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        if symbol.len() != 3 || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            bail!("Invalid currency symbol: {}", s);
        }
        Ok(Currency(symbol.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Currency {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}
