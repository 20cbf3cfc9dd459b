//! `forsee-prediction`
//!
//! Asset catalog and demo health predictions.
//!
//! Predictions here are display formulas over the entered sensor values, not
//! inference. They are pure and deterministic so a result can be reproduced
//! from its inputs.

pub mod devices;
pub mod engine;
pub mod manifest;
pub mod output;
pub mod result;

pub use devices::{Device, DeviceRegistry};
pub use engine::{SensorForm, predict};
pub use manifest::{SensorConfig, SystemProfile, catalog, profile, profile_or_default};
pub use output::{MonitoringOutcome, OutputView};
pub use result::{PredictionPayload, PredictionResult, RiskLevel, SensorWeight, SystemInfo};
