//! Tracing and logging setup shared by Forsee binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogFormat, init};
