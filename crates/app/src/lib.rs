//! Composition root for the Forsee demo.
//!
//! Wires the session store, navigation guard, role gate and prediction
//! handoff into one headless [`App`] whose [`App::render`] produces a typed
//! frame for whatever UI sits on top (the bundled CLI prints it as JSON).

pub mod config;
pub mod flow;
pub mod notice;
pub mod screen;
pub mod shell;

pub use config::{AppConfig, ConfigError};
pub use flow::PredictionFlow;
pub use notice::{Notice, NoticeLevel};
pub use screen::{CatalogEntry, Frame, Screen};
pub use shell::{App, AppError};
