//! Rate quote types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A single caución rate observation for one maturity.
///
/// `rate` is the annualized nominal rate (TNA) in percent, taken from
/// the `settlementPrice` field of the BYMA board for these instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Days until the placement settles.
    pub days: u32,
    /// Annualized nominal rate in percent.
    pub rate: f64,
    /// Settlement date as reported by the exchange (`YYYY-MM-DD`).
    pub maturity_date: Option<String>,
    /// Currency the placement is denominated in (`ARS`, `USD`).
    pub currency: CompactString,
}

impl RateQuote {
    /// Create a quote without a settlement date.
    pub fn new(days: u32, rate: f64, currency: impl Into<CompactString>) -> Self {
        Self {
            days,
            rate,
            maturity_date: None,
            currency: currency.into(),
        }
    }

    /// Builder pattern: attach the settlement date.
    pub fn with_maturity_date(mut self, date: impl Into<String>) -> Self {
        self.maturity_date = Some(date.into());
        self
    }

    /// State key for the notification gatekeeper, e.g. `ARS_7`.
    pub fn state_key(&self) -> String {
        rate_key(&self.currency, self.days)
    }
}

/// Build the per-maturity state key used by the notification gatekeeper.
pub fn rate_key(currency: &str, days: u32) -> String {
    format!("{}_{}", currency, days)
}
