//! Sensor form and the prediction formula.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::manifest::SystemProfile;
use crate::result::{PredictionResult, RiskLevel, SensorWeight};

const BASE_HEALTH: f64 = 85.0;
const HEALTH_SLOPE: f64 = 1.5;
const RUL_FACTOR: f64 = 1.2;
const CONFIDENCE: f64 = 0.87;
const TOP_SENSORS: usize = 4;

/// Entered sensor values for one asset, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorForm {
    values: Vec<(String, String)>,
}

impl SensorForm {
    /// Seed the form with the profile's default readings.
    pub fn for_profile(profile: &SystemProfile) -> Self {
        Self {
            values: profile
                .sensors
                .iter()
                .map(|s| (s.id.to_string(), s.default_value.to_string()))
                .collect(),
        }
    }

    /// Set a reading. Unknown sensor ids are appended after the manifest ones.
    pub fn set(&mut self, sensor_id: &str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(id, _)| id == sensor_id) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((sensor_id.to_string(), value)),
        }
    }

    pub fn get(&self, sensor_id: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(id, _)| id == sensor_id)
            .map(|(_, v)| v.as_str())
    }

    /// The leading reading drives the formula. Unparseable or missing ⇒ 0.
    pub fn first_value(&self) -> f64 {
        self.values
            .first()
            .and_then(|(_, v)| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.values.iter().cloned().collect()
    }

    /// FNV-1a over every id and value, so the seed does not depend on the
    /// toolchain's hasher.
    fn seed(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        self.values
            .iter()
            .flat_map(|(id, value)| {
                id.bytes()
                    .chain(std::iter::once(0))
                    .chain(value.bytes())
                    .chain(std::iter::once(0))
            })
            .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
    }
}

/// Fabricate a result from the entered readings.
///
/// Pure: the same profile and readings always give the same result.
pub fn predict(profile: &SystemProfile, form: &SensorForm) -> PredictionResult {
    let health = (BASE_HEALTH - form.first_value() * HEALTH_SLOPE).clamp(0.0, 100.0);
    let degraded = health < 50.0;

    let mut rng = StdRng::seed_from_u64(form.seed());
    let top_sensors = profile
        .sensors
        .iter()
        .take(TOP_SENSORS)
        .enumerate()
        .map(|(i, s)| SensorWeight {
            name: s.label.to_string(),
            weight: (40.0 - i as f64 * 8.0 + rng.gen_range(0.0..10.0)).max(10.0),
        })
        .collect();

    let action = if degraded {
        profile.default_action.to_string()
    } else {
        format!(
            "Continue normal operation. Next scheduled maintenance in {} days.",
            (health / 2.0).round()
        )
    };

    let result = PredictionResult {
        health_index: health.round() as u32,
        risk_level: RiskLevel::from_health(health),
        rul: (health * RUL_FACTOR).round() as u32,
        precursor_prob: (100.0 - health).round() / 100.0,
        confidence: CONFIDENCE,
        failure_mode: if degraded {
            "Degradation Detected"
        } else {
            "Normal Operation"
        }
        .to_string(),
        action,
        top_sensors,
        drift_detected: health < 40.0,
    };

    tracing::debug!(
        system = profile.id,
        health_index = result.health_index,
        risk = %result.risk_level,
        "prediction fabricated"
    );
    result
}
