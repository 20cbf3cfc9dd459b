//! Assets registered for monitoring on the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::result::SystemInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// `<system id>-<registration millis>`, unique per registration.
    pub id: String,
    pub name: String,
    pub added_at: DateTime<Utc>,
}

/// In-memory device collection backing the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, system: &SystemInfo, now: DateTime<Utc>) -> Device {
        let device = Device {
            id: format!("{}-{}", system.id, now.timestamp_millis()),
            name: system.name.clone(),
            added_at: now,
        };
        tracing::info!(device_id = %device.id, name = %device.name, "device added to monitoring");
        self.devices.push(device.clone());
        device
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
