//! Transaction cost model.

use serde::{Deserialize, Serialize};

/// Fee breakdown applied to the placed notional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeSettings {
    /// Broker commission as a fraction of notional (0.0015 = 0.15%).
    pub broker_commission_rate: f64,
    /// VAT charged on top of the broker commission.
    pub iva_rate: f64,
    /// Exchange (market) fee as a fraction of notional.
    pub market_fee_rate: f64,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            broker_commission_rate: 0.0015,
            iva_rate: 0.21,
            market_fee_rate: 0.0,
        }
    }
}

impl FeeSettings {
    /// Effective flat cost rate: broker commission grossed up by VAT,
    /// plus the market fee.
    pub fn cost_rate(&self) -> f64 {
        self.broker_commission_rate * (1.0 + self.iva_rate) + self.market_fee_rate
    }
}

/// Flat per-notional cost plus the interest day-count basis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Flat fee+tax rate charged on the notional.
    pub cost_rate: f64,
    /// Day-count basis for simple interest (365 or 360).
    pub day_basis: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            cost_rate: FeeSettings::default().cost_rate(),
            day_basis: 365,
        }
    }
}

impl CostModel {
    /// Build from a fee breakdown and a day basis.
    pub fn from_fees(fees: &FeeSettings, day_basis: u32) -> Self {
        Self {
            cost_rate: fees.cost_rate(),
            day_basis,
        }
    }
}
