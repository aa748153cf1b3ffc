//! Assembles matched maturities into a single report.

use crate::matcher::MaturityMatches;
use serde::Serialize;

/// The single best match across the whole report, ranked by net profit
/// at the rule's capital ceiling.
#[derive(Debug, Clone, Serialize)]
pub struct BestOpportunity {
    pub days: u32,
    pub rate: f64,
    pub rule_index: usize,
    pub net_at_ceiling: f64,
    pub capital_max: f64,
}

/// Everything one evaluation cycle wants to tell the operator.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Matched maturities in ascending day order.
    pub sections: Vec<MaturityMatches>,
    /// Highlight of the most profitable match, if any section has one.
    pub best: Option<BestOpportunity>,
}

/// Build a report from the matcher output. Returns `None` when nothing
/// matched, so quiet cycles produce no message at all.
pub fn assemble(sections: Vec<MaturityMatches>) -> Option<Report> {
    if sections.is_empty() {
        return None;
    }

    let mut best: Option<BestOpportunity> = None;
    for section in &sections {
        for m in &section.matches {
            // Strictly-greater keeps the earliest of equal candidates.
            let beats = best
                .as_ref()
                .map_or(true, |b| m.net_at_ceiling > b.net_at_ceiling);
            if beats {
                best = Some(BestOpportunity {
                    days: section.days,
                    rate: section.quote.rate,
                    rule_index: m.rule_index,
                    net_at_ceiling: m.net_at_ceiling,
                    capital_max: m.capital_max,
                });
            }
        }
    }

    Some(Report { sections, best })
}
