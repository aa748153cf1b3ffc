//! Persisted notification state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last notification sent for one state key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Epoch seconds of the last sent notification.
    pub last_sent_ts: i64,
    /// Rate carried by that notification, in percent.
    pub last_sent_rate: f64,
}

/// On-disk value shape: the current entry object, or the bare rate
/// number written by earlier versions of the monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Entry(StateEntry),
    LegacyRate(f64),
}

impl From<StoredEntry> for StateEntry {
    fn from(stored: StoredEntry) -> Self {
        match stored {
            StoredEntry::Entry(entry) => entry,
            // Legacy values carry no timestamp; epoch zero keeps the
            // cooldown permanently elapsed for them.
            StoredEntry::LegacyRate(rate) => StateEntry {
                last_sent_ts: 0,
                last_sent_rate: rate,
            },
        }
    }
}

/// In-memory notification state for one evaluation cycle.
///
/// Entries accumulate, one per maturity ever notified, and are never
/// deleted. The dirty flag tracks whether anything changed since load so
/// the caller can skip rewriting an unchanged file.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    entries: BTreeMap<String, StateEntry>,
    dirty: bool,
}

impl NotificationState {
    /// Empty state (missing state file).
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a stored map into canonical entries.
    pub fn from_stored(stored: BTreeMap<String, StoredEntry>) -> Self {
        let entries = stored
            .into_iter()
            .map(|(key, value)| (key, StateEntry::from(value)))
            .collect();
        Self {
            entries,
            dirty: false,
        }
    }

    /// Look up the entry for a key.
    pub fn get(&self, key: &str) -> Option<&StateEntry> {
        self.entries.get(key)
    }

    /// Record a sent notification. Call only after confirmed delivery.
    pub fn record_sent(&mut self, key: &str, rate: f64, now_ts: i64) {
        self.entries.insert(
            key.to_string(),
            StateEntry {
                last_sent_ts: now_ts,
                last_sent_rate: rate,
            },
        );
        self.dirty = true;
    }

    /// Whether any entry changed since load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the dirty flag once the entries are persisted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key has ever been notified.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical map for persistence.
    pub fn entries(&self) -> &BTreeMap<String, StateEntry> {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_legacy_bare_number_normalizes() {
        let raw = r#"{"ARS_7": 54.3, "ARS_14": {"last_sent_ts": 1700000000, "last_sent_rate": 45.0}}"#;
        let stored: BTreeMap<String, StoredEntry> = serde_json::from_str(raw).unwrap();
        let state = NotificationState::from_stored(stored);

        let legacy = state.get("ARS_7").unwrap();
        assert_eq!(legacy.last_sent_ts, 0);
        assert_eq!(legacy.last_sent_rate, 54.3);

        let current = state.get("ARS_14").unwrap();
        assert_eq!(current.last_sent_ts, 1_700_000_000);
        assert_eq!(current.last_sent_rate, 45.0);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_record_sent_marks_dirty() {
        let mut state = NotificationState::new();
        assert!(state.is_empty());
        assert!(!state.is_dirty());

        state.record_sent("ARS_7", 55.0, 1_700_000_000);
        assert!(state.is_dirty());
        assert_eq!(state.len(), 1);

        let entry = state.get("ARS_7").unwrap();
        assert_eq!(entry.last_sent_ts, 1_700_000_000);
        assert_eq!(entry.last_sent_rate, 55.0);
    }

    #[test]
    fn test_record_sent_overwrites_existing_key() {
        let mut state = NotificationState::new();
        state.record_sent("ARS_7", 55.0, 100);
        state.record_sent("ARS_7", 55.2, 200);
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("ARS_7").unwrap().last_sent_rate, 55.2);
    }

    #[test]
    fn test_entries_serialize_canonical_shape() {
        let mut state = NotificationState::new();
        state.record_sent("ARS_7", 55.0, 1_700_000_000);
        let raw = serde_json::to_string(state.entries()).unwrap();
        assert_eq!(
            raw,
            r#"{"ARS_7":{"last_sent_ts":1700000000,"last_sent_rate":55.0}}"#
        );
    }
}
