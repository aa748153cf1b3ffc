//! Best-quote selection per maturity.

use caucion_core::RateQuote;
use caucion_feeds::CaucionRow;
use std::collections::BTreeMap;

/// Reduce raw market rows to the best (highest-rate) quote per maturity.
///
/// Rows are filtered to `currency` and the inclusive `[day_min, day_max]`
/// window; rows without a usable day field are skipped. Ties keep the
/// first row encountered, so the result is deterministic for a fixed
/// input order.
pub fn best_quotes_by_maturity(
    rows: &[CaucionRow],
    currency: &str,
    day_min: u32,
    day_max: u32,
) -> BTreeMap<u32, RateQuote> {
    let mut best: BTreeMap<u32, RateQuote> = BTreeMap::new();

    for row in rows {
        let Some(ccy) = row.denomination_ccy.as_deref() else {
            continue;
        };
        if ccy != currency {
            continue;
        }
        // try_from keeps negative and oversized day counts out instead
        // of letting a wrapping cast land them inside the window.
        let Some(days) = row.days_to_maturity.and_then(|d| u32::try_from(d).ok()) else {
            continue;
        };
        if days < day_min || days > day_max {
            continue;
        }

        let rate = row.settlement_price;
        match best.get(&days) {
            // Strictly-greater replacement keeps the first of equal rates.
            Some(current) if rate <= current.rate => {}
            _ => {
                best.insert(
                    days,
                    RateQuote {
                        days,
                        rate,
                        maturity_date: row.maturity_date.clone(),
                        currency: currency.into(),
                    },
                );
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rows_from(value: serde_json::Value) -> Vec<CaucionRow> {
        caucion_feeds::rows_from_value(value).unwrap()
    }

    #[test]
    fn test_keeps_max_rate_per_maturity() {
        let rows = rows_from(json!([
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 52.0},
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0},
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 53.5}
        ]));
        let best = best_quotes_by_maturity(&rows, "ARS", 1, 30);
        assert_eq!(best.len(), 1);
        assert_eq!(best[&7].rate, 55.0);
    }

    #[test]
    fn test_equal_rates_keep_first_row() {
        let rows = rows_from(json!([
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0,
             "maturityDate": "2026-08-30"},
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0,
             "maturityDate": "2026-08-31"}
        ]));
        let best = best_quotes_by_maturity(&rows, "ARS", 1, 30);
        assert_eq!(best[&7].maturity_date.as_deref(), Some("2026-08-30"));
    }

    #[test]
    fn test_filters_currency() {
        let rows = rows_from(json!([
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0},
            {"denominationCcy": "USD", "daysToMaturity": 7, "settlementPrice": 99.0},
            {"daysToMaturity": 7, "settlementPrice": 98.0}
        ]));
        let best = best_quotes_by_maturity(&rows, "ARS", 1, 30);
        assert_eq!(best.len(), 1);
        assert_eq!(best[&7].rate, 55.0);
        assert_eq!(best[&7].currency, "ARS");
    }

    #[test]
    fn test_day_range_is_inclusive() {
        let rows = rows_from(json!([
            {"denominationCcy": "ARS", "daysToMaturity": 1, "settlementPrice": 80.0},
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0},
            {"denominationCcy": "ARS", "daysToMaturity": 30, "settlementPrice": 45.0},
            {"denominationCcy": "ARS", "daysToMaturity": 31, "settlementPrice": 44.0}
        ]));
        let best = best_quotes_by_maturity(&rows, "ARS", 1, 30);
        let days: Vec<u32> = best.keys().copied().collect();
        assert_eq!(days, vec![1, 7, 30]);
    }

    #[test]
    fn test_skips_missing_and_negative_days() {
        let rows = rows_from(json!([
            {"denominationCcy": "ARS", "daysToMaturity": null, "settlementPrice": 60.0},
            {"denominationCcy": "ARS", "daysToMaturity": -3, "settlementPrice": 60.0},
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0}
        ]));
        let best = best_quotes_by_maturity(&rows, "ARS", 1, 30);
        assert_eq!(best.len(), 1);
        assert!(best.contains_key(&7));
    }

    #[test]
    fn test_oversized_day_count_does_not_wrap_into_window() {
        // 4294967303 is 2^32 + 7; a wrapping cast would put this row in
        // the 7-day bucket and its bogus rate would win it.
        let rows = rows_from(json!([
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0},
            {"denominationCcy": "ARS", "daysToMaturity": 4_294_967_303_i64, "settlementPrice": 99.0}
        ]));
        let best = best_quotes_by_maturity(&rows, "ARS", 1, 30);
        assert_eq!(best.len(), 1);
        assert_eq!(best[&7].rate, 55.0);
    }

    #[test]
    fn test_output_is_ascending_by_days() {
        let rows = rows_from(json!([
            {"denominationCcy": "ARS", "daysToMaturity": 14, "settlementPrice": 45.0},
            {"denominationCcy": "ARS", "daysToMaturity": 1, "settlementPrice": 80.0},
            {"denominationCcy": "ARS", "daysToMaturity": 7, "settlementPrice": 55.0}
        ]));
        let best = best_quotes_by_maturity(&rows, "ARS", 1, 30);
        let days: Vec<u32> = best.keys().copied().collect();
        assert_eq!(days, vec![1, 7, 14]);
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        let best = best_quotes_by_maturity(&[], "ARS", 1, 30);
        assert!(best.is_empty());
    }
}
