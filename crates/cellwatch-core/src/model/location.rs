// ── Location sample ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One GPS/network fix. Owned by the reporting loop as a latest-value
/// cell: each new fix replaces the previous one, nothing is queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters.
    pub accuracy_m: f64,
    /// Ground speed in m/s, when the provider reports one.
    pub speed_mps: Option<f64>,
    /// Heading in degrees, when the provider reports one.
    pub bearing_deg: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
            speed_mps: None,
            bearing_deg: None,
            captured_at,
        }
    }
}
