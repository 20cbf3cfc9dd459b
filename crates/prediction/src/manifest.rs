//! Static catalog of supported asset types.

use serde::Serialize;

/// Profile shown when a slug is unknown.
pub const FALLBACK_SLUG: &str = "wind-turbines";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorConfig {
    pub id: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub placeholder: &'static str,
    pub default_value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemProfile {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub sensors: &'static [SensorConfig],
    /// Recommended action once degradation is detected.
    pub default_action: &'static str,
}

const fn sensor(
    id: &'static str,
    label: &'static str,
    unit: &'static str,
    placeholder: &'static str,
    default_value: &'static str,
) -> SensorConfig {
    SensorConfig {
        id,
        label,
        unit,
        placeholder,
        default_value,
    }
}

static CATALOG: [SystemProfile; 10] = [
    SystemProfile {
        id: "power-transformers",
        title: "Power Transformer",
        description: "Critical Grid Infrastructure",
        sensors: &[
            sensor("oilTemp", "Oil Temperature", "°C", "20-100", "85"),
            sensor("windingTemp", "Winding Temperature", "°C", "40-130", "92"),
            sensor("loadCurrent", "Load Current", "A", "0-2000", "1450"),
            sensor("hydrogen", "Hydrogen Gas", "ppm", "0-1000", "120"),
            sensor("partialDischarge", "Partial Discharge", "pC", "0-500", "45"),
        ],
        default_action: "Schedule Oil Analysis & Load Reduction",
    },
    SystemProfile {
        id: "wind-turbines",
        title: "Wind Turbine",
        description: "Renewable Energy Unit",
        sensors: &[
            sensor("gearboxVib", "Gearbox Vibration", "Hz", "0-50", "28"),
            sensor("rotorSpeed", "Rotor Speed", "RPM", "0-20", "14"),
            sensor("genTemp", "Generator Temperature", "°C", "20-120", "98"),
            sensor("acoustic", "Acoustic Emission", "dB", "0-100", "72"),
        ],
        default_action: "Schedule Bearing Replacement Window",
    },
    SystemProfile {
        id: "industrial-motors",
        title: "Industrial Motor",
        description: "HVAC & Manufacturing Driver",
        sensors: &[
            sensor("vibration", "Vibration", "mm/s", "0-25", "8"),
            sensor("statorCurrent", "Stator Current", "A", "0-500", "320"),
            sensor("temperature", "Motor Temperature", "°C", "20-100", "78"),
            sensor("rpm", "RPM", "rpm", "0-3600", "1750"),
        ],
        default_action: "Inspect Bearings & Lubrication",
    },
    SystemProfile {
        id: "icu-monitoring",
        title: "ICU Patient Monitor",
        description: "Critical Care Telemetry",
        sensors: &[
            sensor("ecg", "ECG Variability", "ms", "0-100", "45"),
            sensor("spo2", "SpO2", "%", "70-100", "94"),
            sensor("hr", "Heart Rate", "bpm", "40-200", "112"),
            sensor("resp", "Respiration Rate", "bpm", "10-40", "28"),
        ],
        default_action: "Escalate Monitoring / Clinical Intervention",
    },
    SystemProfile {
        id: "servers",
        title: "Data Center Server",
        description: "High-Performance Compute Node",
        sensors: &[
            sensor("cpuTemp", "CPU Temperature", "°C", "20-100", "88"),
            sensor("gpuTemp", "GPU Temperature", "°C", "20-100", "92"),
            sensor("fanSpeed", "Fan Speed", "RPM", "0-10000", "8500"),
            sensor("power", "Power Draw", "W", "0-2000", "1200"),
        ],
        default_action: "Redistribute Load & Schedule Cooling Maintenance",
    },
    SystemProfile {
        id: "bridges",
        title: "Suspension Bridge",
        description: "Strategic Transport Link",
        sensors: &[
            sensor("strain", "Strain", "µE", "0-1000", "450"),
            sensor("crack", "Crack Width", "mm", "0-5", "1.2"),
        ],
        default_action: "Structural Inspection & Load Restriction",
    },
    SystemProfile {
        id: "cnc-machines",
        title: "CNC Machining Center",
        description: "Precision Manufacturing",
        sensors: &[
            sensor("spindleVib", "Spindle Vib", "mm/s", "0-10", "4.5"),
            sensor("toolWear", "Tool Wear", "%", "0-100", "85"),
        ],
        default_action: "Schedule Tool Change",
    },
    SystemProfile {
        id: "hvac-systems",
        title: "HVAC System",
        description: "Building Climate Control",
        sensors: &[sensor("pressure", "Compressor Pressure", "PSI", "0-500", "420")],
        default_action: "Filter & Coil Cleaning",
    },
    SystemProfile {
        id: "pipelines",
        title: "Oil & Gas Pipeline",
        description: "Critical Transport Infrastructure",
        sensors: &[
            sensor("pressure", "Pressure", "PSI", "0-1000", "850"),
            sensor("acoustic", "Acoustic Leak", "dB", "0-100", "20"),
        ],
        default_action: "Emergency Valve Shutoff & Inspection",
    },
    SystemProfile {
        id: "semiconductor-tools",
        title: "Lithography Scanner",
        description: "Nanofabrication Tool",
        sensors: &[
            sensor("alignment", "Alignment Error", "nm", "0-20", "8"),
            sensor("stageVib", "Stage Vib", "nm", "0-10", "3"),
        ],
        default_action: "Recalibration & Optics Cleaning",
    },
];

/// Every asset type, in catalog order.
pub fn catalog() -> &'static [SystemProfile] {
    &CATALOG
}

pub fn profile(slug: &str) -> Option<&'static SystemProfile> {
    CATALOG.iter().find(|p| p.id == slug)
}

/// Resolve `slug`, falling back to the wind-turbine profile.
pub fn profile_or_default(slug: &str) -> &'static SystemProfile {
    profile(slug).unwrap_or(&CATALOG[1])
}
