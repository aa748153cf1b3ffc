//! Caución rate evaluation engine.
//!
//! This crate contains the pure logic of one monitoring cycle: picking
//! the best quote per maturity, matching quotes against capital rules,
//! gating notifications and assembling the report.

pub mod cycle;
pub mod gatekeeper;
pub mod matcher;
pub mod profit;
pub mod report;
pub mod selector;

pub use cycle::*;
pub use gatekeeper::*;
pub use matcher::*;
pub use profit::*;
pub use report::*;
pub use selector::*;
