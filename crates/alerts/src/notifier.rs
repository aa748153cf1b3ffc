//! Report delivery and notification-state commit.

use crate::telegram::{render_report, TelegramBot, TelegramError};
use caucion_core::NotificationState;
use caucion_engine::{CycleOutcome, PendingNotification};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),
}

/// Record the delivered notifications in the state map. Runs only after
/// a confirmed send.
fn commit_pending(state: &mut NotificationState, pending: &[PendingNotification], now_ts: i64) {
    for notification in pending {
        state.record_sent(&notification.key, notification.rate, now_ts);
        debug!(
            key = notification.key.as_str(),
            rate = notification.rate,
            decision = ?notification.decision,
            "Notification committed"
        );
    }
}

/// Sends the assembled report and records what went out.
pub struct Notifier {
    bot: Arc<TelegramBot>,
}

impl Notifier {
    pub fn new(bot: Arc<TelegramBot>) -> Self {
        Self { bot }
    }

    /// Deliver the cycle's report, if any, and commit the sent keys.
    ///
    /// State is mutated only after the send succeeded, so a delivery
    /// failure never advances a cooldown.
    pub async fn process_cycle(
        &self,
        outcome: &CycleOutcome,
        state: &mut NotificationState,
        now: DateTime<Utc>,
    ) -> Result<u32, NotifierError> {
        let Some(report) = &outcome.report else {
            debug!("Quiet cycle, nothing to deliver");
            return Ok(0);
        };

        let text = render_report(report, &now);
        self.bot.send_html(&text).await?;
        commit_pending(state, &outcome.pending, now.timestamp());

        info!(
            sections = report.sections.len(),
            notified = outcome.pending.len(),
            "Report delivered"
        );
        Ok(outcome.pending.len() as u32)
    }
}
