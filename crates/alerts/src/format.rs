//! Spanish-locale rendering helpers for operator-facing text.

use chrono::NaiveDate;

/// Format an ARS amount with dot thousands separators and a comma
/// decimal mark. The sign sits between the `$` and the digits.
pub fn format_money(value: f64) -> String {
    let negative = value < 0.0;
    let raw = format!("{:.2}", value.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("${}{},{}", sign, grouped, frac_part)
}

/// Parse an operator-typed amount. Underscores and dots are thousands
/// separators, a comma is the decimal mark, so `1_000_000`, `1.000.000`
/// and `1000000` all read the same.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let clean = raw
        .trim()
        .replace('_', "")
        .replace('.', "")
        .replace(',', ".");
    clean.parse().ok()
}

/// Render an ISO `YYYY-MM-DD` date as `DD/MM/YYYY`. Anything that does
/// not parse passes through unchanged; empty input becomes `?`.
pub fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) if raw.is_empty() => "?".to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(1_234_567.89), "$1.234.567,89");
        assert_eq!(format_money(1000.0), "$1.000,00");
        assert_eq!(format_money(180.0), "$180,00");
        assert_eq!(format_money(0.0), "$0,00");
    }

    #[test]
    fn test_format_money_negative_sign_after_symbol() {
        assert_eq!(format_money(-1234.5), "$-1.234,50");
        assert_eq!(format_money(-0.5), "$-0,50");
    }

    #[test]
    fn test_format_money_rounds_to_cents() {
        assert_eq!(format_money(874.794520547945), "$874,79");
        assert_eq!(format_money(999.999), "$1.000,00");
    }

    #[test]
    fn test_parse_amount_separator_styles() {
        assert_eq!(parse_amount("1_000_000"), Some(1_000_000.0));
        assert_eq!(parse_amount("1.000.000"), Some(1_000_000.0));
        assert_eq!(parse_amount("3000000"), Some(3_000_000.0));
        assert_eq!(parse_amount("1.234.567,89"), Some(1_234_567.89));
        assert_eq!(parse_amount(" 500,5 "), Some(500.5));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("tres millones"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_format_date_iso_to_argentine() {
        assert_eq!(format_date("2026-08-30"), "30/08/2026");
        assert_eq!(format_date("2026-01-02"), "02/01/2026");
    }

    #[test]
    fn test_format_date_fallbacks() {
        assert_eq!(format_date(""), "?");
        assert_eq!(format_date("mañana"), "mañana");
    }
}
