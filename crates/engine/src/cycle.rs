//! One full evaluation cycle: select, match, gate, assemble.

use crate::gatekeeper::{decide, GateDecision, GatekeeperConfig};
use crate::matcher::match_rules;
use crate::report::{assemble, Report};
use crate::selector::best_quotes_by_maturity;
use caucion_core::{rate_key, NotificationState, RulesConfig};
use caucion_feeds::CaucionRow;
use serde::Serialize;
use tracing::{debug, info};

/// A gate-approved notification waiting for delivery. The state entry
/// for `key` is only committed once the message is confirmed sent.
#[derive(Debug, Clone, Serialize)]
pub struct PendingNotification {
    pub key: String,
    pub days: u32,
    pub rate: f64,
    pub decision: GateDecision,
}

/// What one cycle produced: a report for delivery (if anything passed
/// the gate) and the state updates to commit after delivery.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub report: Option<Report>,
    pub pending: Vec<PendingNotification>,
}

impl CycleOutcome {
    pub fn is_quiet(&self) -> bool {
        self.report.is_none()
    }
}

/// Run matching and gating over one feed snapshot. Pure apart from
/// logging; the caller owns fetching, delivery and state persistence.
pub fn evaluate_cycle(
    rows: &[CaucionRow],
    rules: &RulesConfig,
    state: &NotificationState,
    now_ts: i64,
) -> CycleOutcome {
    let quotes = best_quotes_by_maturity(rows, &rules.currency, rules.day_min, rules.day_max);
    let cost = rules.cost_model();
    let matched = match_rules(&quotes, &rules.capital_rules, &cost);

    let gate = GatekeeperConfig {
        cooldown_minutes: rules.cooldown_minutes,
        min_improvement: rules.min_improvement,
    };

    let mut sections = Vec::new();
    let mut pending = Vec::new();
    for section in matched {
        let key = rate_key(&rules.currency, section.days);
        let decision = decide(state, &key, section.quote.rate, now_ts, &gate);
        if !decision.should_notify() {
            debug!(
                key = key.as_str(),
                rate = section.quote.rate,
                "Match suppressed by gatekeeper"
            );
            continue;
        }
        pending.push(PendingNotification {
            key,
            days: section.days,
            rate: section.quote.rate,
            decision,
        });
        sections.push(section);
    }

    let report = assemble(sections);
    if let Some(report) = &report {
        info!(
            sections = report.sections.len(),
            best_days = report.best.as_ref().map(|b| b.days),
            "Cycle produced a report"
        );
    }

    CycleOutcome { report, pending }
}
