// ── Wire payloads ──
//
// Request bodies for the reporting protocol. A field the device could
// not measure is *omitted*, never sent as a sentinel -- the server only
// ever sees values that passed validation.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body of `POST /api/devices/register`. Idempotent upsert server-side.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterDevice {
    pub device_id: String,
    pub device_model: String,
    pub platform_version: String,
    pub app_status: String,
    pub https_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_accuracy: Option<f64>,
}

/// Body of `POST /api/devices/{device_id}/signal` -- one validated
/// snapshot merged with the last known location. Fire-and-forget.
#[derive(Debug, Clone, Serialize)]
pub struct SignalReport {
    // 4G/LTE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength_4g: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sinr_4g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_id_4g: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pci_4g: Option<i32>,

    // 5G/NR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength_5g: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sinr_5g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_id_5g: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pci_5g: Option<i32>,

    // Metadata
    pub is_5g: bool,
    pub network_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    pub https_enabled: bool,

    // Location (last known fix, possibly stale)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /api/devices/{device_id}/location`.
#[derive(Debug, Clone, Serialize)]
pub struct LocationReport {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let report = SignalReport {
            signal_strength_4g: Some(-95),
            sinr_4g: None,
            cell_id_4g: None,
            pci_4g: None,
            signal_strength_5g: None,
            sinr_5g: None,
            cell_id_5g: None,
            pci_5g: None,
            is_5g: false,
            network_type: "LTE".into(),
            carrier: None,
            https_enabled: false,
            latitude: None,
            longitude: None,
            accuracy: None,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["signal_strength_4g"], -95);
        assert!(json.get("sinr_4g").is_none());
        assert!(json.get("signal_strength_5g").is_none());
        assert!(json.get("carrier").is_none());
        assert_eq!(json["network_type"], "LTE");
    }
}
