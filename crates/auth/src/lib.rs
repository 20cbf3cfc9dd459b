//! Local session and authorization state.
//!
//! Owns the session state machine (signed-out / signed-in / roleless), its
//! durable key-value record and the role-selection gate. Decoupled from views
//! and routing: consumers observe the store and branch on its snapshots.

pub mod authenticator;
pub mod error;
pub mod role_gate;
pub mod roles;
pub mod session;
pub mod storage;
pub mod user;

pub use authenticator::{Authenticator, DemoAuthenticator};
pub use error::{AuthError, StorageError};
pub use role_gate::{RoleGate, RoleGateView};
pub use roles::{Role, RoleOption};
pub use session::{SessionConfig, SessionState, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, ROLE_KEY, USER_KEY};
pub use user::User;
