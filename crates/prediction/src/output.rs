//! Results view model: live handoff or canned demo.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::devices::{Device, DeviceRegistry};
use crate::result::{PredictionPayload, PredictionResult, RiskLevel, SystemInfo};

pub const DEMO_SYSTEM_ID: &str = "demo-system";
pub const DEMO_SYSTEM_NAME: &str = "Demo Jet Engine (HTS-400)";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What the results view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputView {
    pub result: PredictionResult,
    pub inputs: BTreeMap<String, String>,
    pub system_info: SystemInfo,
    /// True when no handoff was present (direct link, reload).
    pub is_demo: bool,
}

/// Outcome of "add to monitoring".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MonitoringOutcome {
    /// Demo mode: nothing registered, only an explanation.
    Skipped { notice: String },
    Registered { device: Device, redirect: String },
}

impl OutputView {
    /// Build from the handoff taken on mount. Absence is the demo case.
    pub fn from_handoff(payload: Option<PredictionPayload>) -> Self {
        match payload {
            Some(PredictionPayload {
                result,
                inputs,
                system_info,
            }) => Self {
                result,
                inputs,
                system_info,
                is_demo: false,
            },
            None => {
                tracing::debug!("no handoff; rendering demo record");
                Self::demo()
            }
        }
    }

    pub fn demo() -> Self {
        Self {
            result: PredictionResult {
                health_index: 92,
                risk_level: RiskLevel::Low,
                rul: 342,
                precursor_prob: 0.08,
                confidence: 0.98,
                failure_mode: "Normal Operation".to_string(),
                action: "Maintain current monitoring schedule. No immediate action required."
                    .to_string(),
                top_sensors: Vec::new(),
                drift_detected: false,
            },
            inputs: BTreeMap::new(),
            system_info: SystemInfo {
                id: DEMO_SYSTEM_ID.to_string(),
                name: DEMO_SYSTEM_NAME.to_string(),
            },
            is_demo: true,
        }
    }

    /// Demo disclosure shown alongside the record, if any.
    pub fn disclosure(&self) -> Option<&'static str> {
        self.is_demo
            .then_some("This is based on fake data for demonstration purposes.")
    }

    pub fn add_to_monitoring(
        &self,
        registry: &mut DeviceRegistry,
        now: DateTime<Utc>,
    ) -> MonitoringOutcome {
        if self.is_demo {
            return MonitoringOutcome::Skipped {
                notice: "This is a preview. To add real systems, run a prediction first."
                    .to_string(),
            };
        }
        let device = registry.register(&self.system_info, now);
        MonitoringOutcome::Registered {
            device,
            redirect: DASHBOARD_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SensorForm, predict};
    use crate::manifest::profile;

    fn live_payload() -> PredictionPayload {
        let tx = profile("power-transformers").unwrap();
        let form = SensorForm::for_profile(tx);
        PredictionPayload {
            result: predict(tx, &form),
            inputs: form.to_map(),
            system_info: SystemInfo {
                id: tx.id.to_string(),
                name: tx.title.to_string(),
            },
        }
    }

    #[test]
    fn missing_handoff_is_demo_mode() {
        let view = OutputView::from_handoff(None);
        assert!(view.is_demo);
        assert_eq!(view.system_info.id, DEMO_SYSTEM_ID);
        assert_eq!(view.result.health_index, 92);
        assert!(view.disclosure().is_some());
    }

    #[test]
    fn demo_add_to_monitoring_registers_nothing() {
        let mut registry = DeviceRegistry::new();
        let outcome = OutputView::demo().add_to_monitoring(&mut registry, Utc::now());
        assert!(matches!(outcome, MonitoringOutcome::Skipped { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn live_add_to_monitoring_registers_and_redirects() {
        let payload = live_payload();
        let view = OutputView::from_handoff(Some(payload.clone()));
        assert!(!view.is_demo);
        assert_eq!(view.result, payload.result);
        assert!(view.disclosure().is_none());

        let mut registry = DeviceRegistry::new();
        match view.add_to_monitoring(&mut registry, Utc::now()) {
            MonitoringOutcome::Registered { device, redirect } => {
                assert!(device.id.starts_with("power-transformers-"));
                assert_eq!(device.name, "Power Transformer");
                assert_eq!(redirect, DASHBOARD_PATH);
            }
            other => panic!("expected registration, got {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }
}
