// ── Domain-to-wire conversions ──
//
// Bridges validated domain snapshots into `cellwatch_api` payloads.
// Sentinel-valued fields become `None` here, which is what keeps them
// off the wire entirely.

use cellwatch_api::payload::{LocationReport, RegisterDevice, SignalReport};

use crate::config::MonitorConfig;
use crate::model::metrics::{
    CELL_ID_ABSENT, CellMetrics, PCI_ABSENT, SIGNAL_ABSENT, SINR_ABSENT,
};
use crate::model::LocationSample;

// ── Helpers ────────────────────────────────────────────────────────

fn present_i32(value: i32, sentinel: i32) -> Option<i32> {
    (value != sentinel).then_some(value)
}

fn present_i64(value: i64, sentinel: i64) -> Option<i64> {
    (value != sentinel).then_some(value)
}

fn present_f64(value: f64, sentinel: f64) -> Option<f64> {
    (value != sentinel).then_some(value)
}

// ── Conversions ────────────────────────────────────────────────────

/// Build the signal submission body from one cycle's snapshot plus the
/// last known location.
pub fn signal_report(
    metrics: &CellMetrics,
    location: Option<&LocationSample>,
    carrier: Option<String>,
    https_enabled: bool,
) -> SignalReport {
    SignalReport {
        signal_strength_4g: present_i32(metrics.signal_strength_4g, SIGNAL_ABSENT),
        sinr_4g: present_f64(metrics.sinr_4g, SINR_ABSENT),
        cell_id_4g: present_i64(metrics.cell_id_4g, CELL_ID_ABSENT),
        pci_4g: present_i32(metrics.pci_4g, PCI_ABSENT),
        signal_strength_5g: present_i32(metrics.signal_strength_5g, SIGNAL_ABSENT),
        sinr_5g: present_f64(metrics.sinr_5g, SINR_ABSENT),
        cell_id_5g: present_i64(metrics.cell_id_5g, CELL_ID_ABSENT),
        pci_5g: present_i32(metrics.pci_5g, PCI_ABSENT),
        is_5g: metrics.is_5g,
        network_type: metrics.network_type.to_string(),
        carrier,
        https_enabled,
        latitude: location.map(|l| l.latitude),
        longitude: location.map(|l| l.longitude),
        accuracy: location.map(|l| l.accuracy_m),
        timestamp: metrics.captured_at,
    }
}

/// Build the standalone location submission body from a fix.
pub fn location_report(sample: &LocationSample) -> LocationReport {
    LocationReport {
        latitude: sample.latitude,
        longitude: sample.longitude,
        accuracy: sample.accuracy_m,
        speed: sample.speed_mps,
        bearing: sample.bearing_deg,
        timestamp: sample.captured_at,
    }
}

/// Build the registration body sent once per resolution.
pub fn register_payload(config: &MonitorConfig, location: Option<&LocationSample>) -> RegisterDevice {
    RegisterDevice {
        device_id: config.device_id.clone(),
        device_model: config.device_model.clone(),
        platform_version: config.platform_version.clone(),
        app_status: "monitoring".into(),
        https_enabled: config.https,
        latitude: location.map(|l| l.latitude),
        longitude: location.map(|l| l.longitude),
        location_accuracy: location.map(|l| l.accuracy_m),
    }
}
