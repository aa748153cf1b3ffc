//! Simple-interest profitability math.
//!
//! All quantities are plain f64; nothing here rounds. Presentation
//! rounding happens in the alert renderer.

use caucion_core::CostModel;
use serde::Serialize;

/// Gross interest earned on `amount` over `days` at `rate_pct` (TNA %).
pub fn gross_interest(amount: f64, days: u32, rate_pct: f64, day_basis: u32) -> f64 {
    amount * (rate_pct / 100.0) * (days as f64 / day_basis as f64)
}

/// Flat transaction cost on the placed notional.
pub fn transaction_cost(amount: f64, cost_rate: f64) -> f64 {
    amount * cost_rate
}

/// Net profit: gross interest minus transaction cost.
pub fn net_profit(amount: f64, days: u32, rate_pct: f64, cost: &CostModel) -> f64 {
    gross_interest(amount, days, rate_pct, cost.day_basis) - transaction_cost(amount, cost.cost_rate)
}

/// Net rate earned per unit of capital; negative when fees eat the interest.
pub fn net_rate_per_unit(days: u32, rate_pct: f64, cost: &CostModel) -> f64 {
    (rate_pct / 100.0) * (days as f64 / cost.day_basis as f64) - cost.cost_rate
}

/// Minimum capital needed to clear `min_profit`.
///
/// Solves `min_profit = capital * net_rate_per_unit`. `None` when the
/// per-unit net rate is not strictly positive, since then no finite
/// capital reaches the target.
pub fn required_capital(
    min_profit: f64,
    days: u32,
    rate_pct: f64,
    cost: &CostModel,
) -> Option<f64> {
    let unit = net_rate_per_unit(days, rate_pct, cost);
    if unit <= 0.0 {
        return None;
    }
    Some(min_profit / unit)
}

/// Full return breakdown for a hypothetical placement (the `/calc` view).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementReturn {
    pub gross_interest: f64,
    pub total_cost: f64,
    pub net_interest: f64,
    /// Capital plus net interest.
    pub net_total: f64,
}

/// Compute the return breakdown for placing `amount` for `days` at `rate_pct`.
pub fn simulate_placement(amount: f64, days: u32, rate_pct: f64, cost: &CostModel) -> PlacementReturn {
    let gross = gross_interest(amount, days, rate_pct, cost.day_basis);
    let total_cost = transaction_cost(amount, cost.cost_rate);
    let net = gross - total_cost;
    PlacementReturn {
        gross_interest: gross,
        total_cost,
        net_interest: net,
        net_total: amount + net,
    }
}
