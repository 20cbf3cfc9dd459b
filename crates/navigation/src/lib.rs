//! Client-side routing primitives: routes, history, guard and handoffs.
//!
//! - `route`: path → typed route table (public vs protected)
//! - `guard`: access decision for protected routes
//! - `history`: in-memory navigation history with replace semantics
//! - `handoff`: one-shot, transition-scoped payload table

pub mod guard;
pub mod handoff;
pub mod history;
pub mod route;

pub use guard::{GuardDecision, LOGIN_PATH, Redirect, guard};
pub use handoff::HandoffTable;
pub use history::{Location, NavigateOptions, Navigator};
pub use route::{LEGACY_ASSET_ALIASES, Route};
