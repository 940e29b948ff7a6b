//! Core business logic: rates, rebasing, diffing and polling

pub mod amount;
pub mod config;
pub mod currency;
pub mod diff;
pub mod log;
pub mod poller;
pub mod rates;
pub mod rebase;
pub mod view_model;

// Re-export main types for cleaner imports
pub use currency::Currency;
pub use diff::{ChangePayload, ListChange};
pub use rates::{FetchOutcome, RateEntry, RatesProvider, RatesSnapshot};
pub use view_model::{RatesUpdate, RatesViewModel};
