//! Core data types for the caución monitor.

pub mod config;
pub mod cost;
pub mod quote;
pub mod rule;
pub mod state;

pub use config::*;
pub use cost::*;
pub use quote::*;
pub use rule::*;
pub use state::*;
