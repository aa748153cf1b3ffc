//! Capital-tiered rule matching.

use crate::profit::{net_profit, required_capital};
use caucion_core::{CapitalRule, CostModel, RateQuote};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// One rule that a maturity's best quote cleared.
#[derive(Debug, Clone, Serialize)]
pub struct RuleMatch {
    /// Position of the rule in the configured list (0-based).
    pub rule_index: usize,
    /// Threshold the quote had to reach for this maturity.
    pub threshold: f64,
    pub capital_min: f64,
    pub capital_max: f64,
    /// Net profit placing the capital floor.
    pub net_at_floor: f64,
    /// Net profit placing the capital ceiling.
    pub net_at_ceiling: f64,
    /// The rule's minimum acceptable net profit (zero when the gate is off).
    pub min_net_profit: f64,
    /// Whether the floor capital alone already clears `min_net_profit`.
    pub floor_meets_target: bool,
    /// Capital needed to clear `min_net_profit`, clamped to the rule's
    /// range. `None` when the gate is off.
    pub required_capital: Option<f64>,
}

/// A maturity whose best quote matched at least one rule.
#[derive(Debug, Clone, Serialize)]
pub struct MaturityMatches {
    pub days: u32,
    pub quote: RateQuote,
    pub matches: Vec<RuleMatch>,
}

/// Evaluate every maturity's best quote against the rules, in ascending
/// day order. Maturities with no matching rule are dropped; rule order
/// only orders the matches within a maturity.
pub fn match_rules(
    quotes: &BTreeMap<u32, RateQuote>,
    rules: &[CapitalRule],
    cost: &CostModel,
) -> Vec<MaturityMatches> {
    let mut results = Vec::new();

    for (&days, quote) in quotes {
        let mut matches = Vec::new();

        for (rule_index, rule) in rules.iter().enumerate() {
            if !rule.enabled {
                continue;
            }
            if !rule.covers_day(days) {
                continue;
            }
            let Some(threshold) = rule.threshold_for(days) else {
                continue;
            };
            if quote.rate < threshold {
                continue;
            }

            let net_at_floor = net_profit(rule.capital_min, days, quote.rate, cost);
            let net_at_ceiling = net_profit(rule.capital_max, days, quote.rate, cost);
            if net_at_ceiling < rule.min_net_profit {
                debug!(
                    days = days,
                    rule = rule_index,
                    net_at_ceiling = net_at_ceiling,
                    min_net_profit = rule.min_net_profit,
                    "Rule skipped: ceiling capital cannot clear the profit bar"
                );
                continue;
            }

            let (floor_meets_target, required) = if rule.min_net_profit > 0.0 {
                let required = required_capital(rule.min_net_profit, days, quote.rate, cost)
                    .map(|capital| capital.max(rule.capital_min).min(rule.capital_max));
                (net_at_floor >= rule.min_net_profit, required)
            } else {
                (true, None)
            };

            matches.push(RuleMatch {
                rule_index,
                threshold,
                capital_min: rule.capital_min,
                capital_max: rule.capital_max,
                net_at_floor,
                net_at_ceiling,
                min_net_profit: rule.min_net_profit,
                floor_meets_target,
                required_capital: required,
            });
        }

        if !matches.is_empty() {
            results.push(MaturityMatches {
                days,
                quote: quote.clone(),
                matches,
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quote(days: u32, rate: f64) -> RateQuote {
        RateQuote::new(days, rate, "ARS")
    }

    fn quotes(entries: &[(u32, f64)]) -> BTreeMap<u32, RateQuote> {
        entries.iter().map(|&(d, r)| (d, quote(d, r))).collect()
    }

    fn rule(capital_min: f64, capital_max: f64, thresholds: &[(u32, f64)]) -> CapitalRule {
        CapitalRule {
            enabled: true,
            capital_min,
            capital_max,
            day_min: 1,
            day_max: 30,
            min_net_profit: 0.0,
            thresholds: thresholds.iter().copied().collect(),
        }
    }

    fn cost() -> CostModel {
        CostModel {
            cost_rate: 0.0018,
            day_basis: 365,
        }
    }

    #[test]
    fn test_quote_above_threshold_matches() {
        let rules = vec![rule(100_000.0, 1_000_000.0, &[(7, 50.0)])];
        let results = match_rules(&quotes(&[(7, 55.0)]), &rules, &cost());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].days, 7);
        assert_eq!(results[0].matches.len(), 1);

        let m = &results[0].matches[0];
        assert_eq!(m.rule_index, 0);
        assert_eq!(m.threshold, 50.0);
        // 100000 * 0.55 * (7/365) - 180 ≈ 874.79
        assert!((m.net_at_floor - 874.794520547945).abs() < 1e-6);
        assert!((m.net_at_ceiling - 8747.945205479452).abs() < 1e-6);
        assert!(m.floor_meets_target);
        assert_eq!(m.required_capital, None);
    }

    #[test]
    fn test_quote_below_threshold_skipped() {
        let rules = vec![rule(100_000.0, 1_000_000.0, &[(7, 60.0)])];
        let results = match_rules(&quotes(&[(7, 55.0)]), &rules, &cost());
        assert!(results.is_empty());
    }

    #[test]
    fn test_day_without_threshold_skipped() {
        let rules = vec![rule(100_000.0, 1_000_000.0, &[(14, 45.0)])];
        let results = match_rules(&quotes(&[(7, 55.0)]), &rules, &cost());
        assert!(results.is_empty());
    }

    #[test]
    fn test_day_outside_rule_window_skipped() {
        let mut tight = rule(100_000.0, 1_000_000.0, &[(7, 50.0)]);
        tight.day_min = 10;
        tight.day_max = 20;
        let results = match_rules(&quotes(&[(7, 55.0)]), &[tight], &cost());
        assert!(results.is_empty());
    }

    #[test]
    fn test_ceiling_below_profit_bar_skips_rule() {
        // netAtCeiling ≈ 8747.95 < 20000 ⇒ no match despite the threshold pass.
        let mut demanding = rule(100_000.0, 1_000_000.0, &[(7, 50.0)]);
        demanding.min_net_profit = 20_000.0;
        let results = match_rules(&quotes(&[(7, 55.0)]), &[demanding], &cost());
        assert!(results.is_empty());
    }

    #[test]
    fn test_profit_bar_computes_required_capital() {
        let mut demanding = rule(100_000.0, 1_000_000.0, &[(7, 50.0)]);
        demanding.min_net_profit = 5000.0;
        let results = match_rules(&quotes(&[(7, 55.0)]), &[demanding], &cost());

        let m = &results[0].matches[0];
        assert!(!m.floor_meets_target); // floor nets ≈ 874.79 < 5000
        let required = m.required_capital.unwrap();
        // netProfit(required) == 5000 within tolerance, and inside the range.
        assert!((net_profit(required, 7, 55.0, &cost()) - 5000.0).abs() < 1e-6);
        assert!(required > 100_000.0 && required < 1_000_000.0);
    }

    #[test]
    fn test_required_capital_clamped_to_floor() {
        // Target so small the raw solution falls below the floor.
        let mut easy = rule(100_000.0, 1_000_000.0, &[(7, 50.0)]);
        easy.min_net_profit = 1.0;
        let results = match_rules(&quotes(&[(7, 55.0)]), &[easy], &cost());

        let m = &results[0].matches[0];
        assert!(m.floor_meets_target);
        assert_eq!(m.required_capital, Some(100_000.0));
    }

    #[test]
    fn test_disabled_rule_removal_is_invisible() {
        // The disabled rule sits first so removing it also shifts every
        // position; the match must be identical in everything except the
        // positional rule_index.
        let mut disabled = rule(1.0, 2.0, &[(7, 0.0)]);
        disabled.enabled = false;
        let enabled = rule(100_000.0, 1_000_000.0, &[(7, 50.0)]);

        let with_disabled = match_rules(
            &quotes(&[(7, 55.0)]),
            &[disabled, enabled.clone()],
            &cost(),
        );
        let without = match_rules(&quotes(&[(7, 55.0)]), &[enabled], &cost());

        assert_eq!(with_disabled.len(), without.len());
        assert_eq!(with_disabled[0].matches.len(), 1);
        assert_eq!(without[0].matches.len(), 1);

        let kept = &with_disabled[0].matches[0];
        let alone = &without[0].matches[0];
        assert_eq!(kept.threshold, alone.threshold);
        assert_eq!(kept.capital_min, alone.capital_min);
        assert_eq!(kept.capital_max, alone.capital_max);
        assert_eq!(kept.net_at_floor, alone.net_at_floor);
        assert_eq!(kept.net_at_ceiling, alone.net_at_ceiling);
        assert_eq!(kept.floor_meets_target, alone.floor_meets_target);
        assert_eq!(kept.required_capital, alone.required_capital);
    }

    #[test]
    fn test_multiple_rules_match_in_configured_order() {
        let small = rule(100_000.0, 500_000.0, &[(7, 50.0)]);
        let large = rule(500_000.0, 5_000_000.0, &[(7, 52.0)]);
        let results = match_rules(&quotes(&[(7, 55.0)]), &[small, large], &cost());

        assert_eq!(results[0].matches.len(), 2);
        assert_eq!(results[0].matches[0].rule_index, 0);
        assert_eq!(results[0].matches[1].rule_index, 1);
    }

    #[test]
    fn test_maturities_come_out_ascending() {
        let rules = vec![rule(100_000.0, 1_000_000.0, &[(1, 40.0), (7, 40.0), (14, 40.0)])];
        let results = match_rules(&quotes(&[(14, 45.0), (1, 80.0), (7, 55.0)]), &rules, &cost());
        let days: Vec<u32> = results.iter().map(|r| r.days).collect();
        assert_eq!(days, vec![1, 7, 14]);
    }
}
