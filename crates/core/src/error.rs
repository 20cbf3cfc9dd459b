//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Deterministic failures only (validation, unknown values). Storage and
/// transport concerns have their own error types in the crates that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty email).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A string did not name a known variant (role, risk level, ...).
    #[error("unknown {kind}: '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
