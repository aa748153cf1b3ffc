//! Notification gating: cooldown and improvement checks.

use caucion_core::NotificationState;
use serde::Serialize;

/// Gating knobs, taken from the rules document.
#[derive(Debug, Clone, Copy)]
pub struct GatekeeperConfig {
    /// Minimum silence between alerts for the same key, in minutes.
    pub cooldown_minutes: i64,
    /// Rate gain (percentage points) that overrides the cooldown.
    pub min_improvement: f64,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: 15,
            min_improvement: 0.10,
        }
    }
}

impl GatekeeperConfig {
    fn cooldown_secs(&self) -> i64 {
        self.cooldown_minutes * 60
    }
}

/// Why a notification passed the gate, or that it did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateDecision {
    /// No prior notification recorded for this key.
    FirstSeen,
    /// Enough time has passed since the last send.
    CooldownElapsed,
    /// The rate improved enough to override the cooldown.
    Improved,
    /// Neither condition held.
    Suppressed,
}

impl GateDecision {
    pub fn should_notify(&self) -> bool {
        !matches!(self, GateDecision::Suppressed)
    }
}

/// Decide whether an alert for `key` at `rate` may go out at `now_ts`.
pub fn decide(
    state: &NotificationState,
    key: &str,
    rate: f64,
    now_ts: i64,
    config: &GatekeeperConfig,
) -> GateDecision {
    match state.get(key) {
        None => GateDecision::FirstSeen,
        Some(entry) => {
            let cooldown_elapsed = now_ts - entry.last_sent_ts >= config.cooldown_secs();
            let improved = rate >= entry.last_sent_rate + config.min_improvement;
            if cooldown_elapsed {
                GateDecision::CooldownElapsed
            } else if improved {
                GateDecision::Improved
            } else {
                GateDecision::Suppressed
            }
        }
    }
}
