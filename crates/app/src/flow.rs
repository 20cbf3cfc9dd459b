//! Prediction run with the demo's simulated pauses.

use std::time::Duration;

use forsee_prediction::{PredictionPayload, SensorForm, SystemInfo, SystemProfile, predict};

#[derive(Debug, Clone)]
pub struct PredictionFlow {
    /// "System handshake" pause before anything happens.
    pub handshake_delay: Duration,
    /// "Thinking" pause before the result is committed.
    pub thinking_delay: Duration,
}

impl Default for PredictionFlow {
    fn default() -> Self {
        Self {
            handshake_delay: Duration::from_millis(800),
            thinking_delay: Duration::from_millis(2500),
        }
    }
}

impl PredictionFlow {
    pub fn instant() -> Self {
        Self {
            handshake_delay: Duration::ZERO,
            thinking_delay: Duration::ZERO,
        }
    }

    /// Wait out both pauses, then fabricate the payload for the results view.
    ///
    /// `slug` is the requested system and becomes the payload's id even when
    /// `profile` is the fallback. Not cancellable: once started it always
    /// completes.
    pub async fn run(
        &self,
        slug: &str,
        profile: &SystemProfile,
        form: &SensorForm,
    ) -> PredictionPayload {
        tracing::debug!(system = slug, profile = profile.id, "prediction handshake");
        tokio::time::sleep(self.handshake_delay).await;
        tokio::time::sleep(self.thinking_delay).await;

        PredictionPayload {
            result: predict(profile, form),
            inputs: form.to_map(),
            system_info: SystemInfo {
                id: slug.to_string(),
                name: profile.title.to_string(),
            },
        }
    }
}
