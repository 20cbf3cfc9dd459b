//! `forsee-core`: shared primitives for the Forsee workspace.
//!
//! Identifiers and the domain error model. No IO, no async.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{TransitionId, UserId};
