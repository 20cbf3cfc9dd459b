use thiserror::Error;

use forsee_core::DomainError;

/// Failure of an authentication attempt.
///
/// Surfaced to the initiating view; the session state is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("federated sign-in failed: {0}")]
    FederatedAuthFailed(String),

    #[error(transparent)]
    Validation(#[from] DomainError),
}

/// Failure of the durable key-value record.
///
/// Never escapes the session store: write failures are logged, parse failures
/// trigger the hydration recovery path.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed value under '{key}': {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode storage contents: {0}")]
    Encode(serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}
