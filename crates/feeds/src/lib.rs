//! Market-data feed for BYMA cauciones.
//!
//! One public REST endpoint, polled once per evaluation cycle. Decoding
//! is lenient at the row level and strict at the shape level: the
//! response must be an array, individual rows may be garbage.

pub mod byma;
pub mod error;

pub use byma::*;
pub use error::*;
