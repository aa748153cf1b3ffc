//! Capital-tiered acceptance rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One capital tier with its per-maturity rate thresholds.
///
/// A quote matches when its maturity falls inside `[day_min, day_max]`,
/// a threshold exists for that exact maturity and the quoted rate
/// reaches it. A non-zero `min_net_profit` additionally requires the net
/// profit at `capital_max` to clear the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalRule {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Smallest capital the operator would place under this rule.
    pub capital_min: f64,
    /// Largest capital the operator would place under this rule.
    pub capital_max: f64,
    #[serde(default = "default_day_min")]
    pub day_min: u32,
    #[serde(default = "default_day_max")]
    pub day_max: u32,
    /// Minimum acceptable net profit at the capital ceiling. Zero turns
    /// the gate off.
    #[serde(default)]
    pub min_net_profit: f64,
    /// Maturity (days) to minimum acceptable rate in percent. JSON keys
    /// are day strings (`"7": 50.0`).
    #[serde(default)]
    pub thresholds: BTreeMap<u32, f64>,
}

fn default_enabled() -> bool {
    true
}

fn default_day_min() -> u32 {
    1
}

fn default_day_max() -> u32 {
    30
}

impl CapitalRule {
    /// Degenerate single-amount rule: the old flat-threshold mode.
    pub fn flat(capital: f64, thresholds: BTreeMap<u32, f64>) -> Self {
        Self {
            enabled: true,
            capital_min: capital,
            capital_max: capital,
            day_min: default_day_min(),
            day_max: default_day_max(),
            min_net_profit: 0.0,
            thresholds,
        }
    }

    /// Whether this maturity falls inside the rule's day window.
    pub fn covers_day(&self, days: u32) -> bool {
        days >= self.day_min && days <= self.day_max
    }

    /// Threshold configured for this exact maturity, if any.
    pub fn threshold_for(&self, days: u32) -> Option<f64> {
        self.thresholds.get(&days).copied()
    }
}
