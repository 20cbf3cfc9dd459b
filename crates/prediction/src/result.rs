use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Risk band derived from the health index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// LOW ≥ 70, MEDIUM ≥ 50, HIGH ≥ 30, CRITICAL below.
    pub fn from_health(health_index: f64) -> Self {
        if health_index >= 70.0 {
            RiskLevel::Low
        } else if health_index >= 50.0 {
            RiskLevel::Medium
        } else if health_index >= 30.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorWeight {
    pub name: String,
    pub weight: f64,
}

/// Fabricated health prediction for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// 0..=100.
    pub health_index: u32,
    pub risk_level: RiskLevel,
    /// Remaining useful life, in days.
    pub rul: u32,
    pub precursor_prob: f64,
    /// In \[0, 1\].
    pub confidence: f64,
    pub failure_mode: String,
    pub action: String,
    pub top_sensors: Vec<SensorWeight>,
    pub drift_detected: bool,
}

/// Identifies the asset a result belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub id: String,
    pub name: String,
}

/// What the input view hands to the results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPayload {
    pub result: PredictionResult,
    pub inputs: BTreeMap<String, String>,
    pub system_info: SystemInfo,
}
