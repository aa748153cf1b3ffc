//! Rules document schema.

use crate::cost::{CostModel, FeeSettings};
use crate::rule::CapitalRule;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// The operator-edited rules document (`rules.json`).
///
/// Everything except `capital_rules` carries a default so a minimal
/// document stays valid. A missing file is a fatal configuration error
/// handled by the store, never a defaulted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfig {
    /// Fee breakdown the cost model derives from.
    pub fees: FeeSettings,
    /// Flat per-notional cost rate override. When absent the rate is
    /// derived from `fees`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_rate: Option<f64>,
    /// Day-count basis for simple interest.
    pub base_days: u32,
    /// Inclusive day-range window for quote selection.
    pub day_min: u32,
    pub day_max: u32,
    /// Currency filter for the quote selector.
    pub currency: CompactString,
    /// Gatekeeper: minimum minutes between notifications for one key.
    pub cooldown_minutes: i64,
    /// Gatekeeper: rate improvement in percentage points that overrides
    /// the cooldown.
    pub min_improvement: f64,
    /// Ordered capital tiers.
    pub capital_rules: Vec<CapitalRule>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            fees: FeeSettings::default(),
            cost_rate: None,
            base_days: 365,
            day_min: 1,
            day_max: 30,
            currency: CompactString::const_new("ARS"),
            cooldown_minutes: 15,
            min_improvement: 0.10,
            capital_rules: Vec::new(),
        }
    }
}

impl RulesConfig {
    /// Cost model for one evaluation cycle.
    pub fn cost_model(&self) -> CostModel {
        CostModel {
            cost_rate: self.cost_rate.unwrap_or_else(|| self.fees.cost_rate()),
            day_basis: self.base_days,
        }
    }
}
