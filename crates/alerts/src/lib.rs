//! Telegram alert surface for the caución monitor.
//!
//! This crate provides:
//! - JSON file stores for the rules document and notification state
//! - Telegram bot integration (reports and operator commands)
//! - Spanish-locale money and date rendering

pub mod format;
pub mod notifier;
pub mod store;
pub mod telegram;

pub use notifier::{Notifier, NotifierError};
pub use store::{InstanceLock, RulesStore, StateStore, StoreError};
pub use telegram::{render_report, TelegramBot, TelegramError};
