//! Capability implementations for driving the pipeline from the CLI.
//!
//! On a handset the radio and location sources are platform bindings;
//! here they are a JSON replay file and a fixed fix, which is enough to
//! exercise discovery, normalization, and reporting end to end.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;

use cellwatch_core::capabilities::{LocationSource, RadioSource};
use cellwatch_core::{LocationSample, RawCellRecord, Technology};

use crate::error::CliError;

/// Replays snapshots of raw cell records, one per pull. The last
/// snapshot repeats once the script runs out.
pub struct ScriptedRadio {
    snapshots: Vec<Vec<RawCellRecord>>,
    cursor: AtomicUsize,
}

impl ScriptedRadio {
    /// Load a script: a JSON array of snapshots, each an array of
    /// tagged records.
    pub fn from_json_file(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path)?;
        let snapshots: Vec<Vec<RawCellRecord>> = serde_json::from_str(&raw)?;
        Ok(Self {
            snapshots,
            cursor: AtomicUsize::new(0),
        })
    }
}

impl RadioSource for ScriptedRadio {
    fn read_cell_records(&self) -> Vec<RawCellRecord> {
        if self.snapshots.is_empty() {
            return Vec::new();
        }
        let index = self
            .cursor
            .fetch_add(1, Ordering::Relaxed)
            .min(self.snapshots.len() - 1);
        self.snapshots[index].clone()
    }

    fn active_network_is_5g(&self) -> bool {
        // The replay has no out-of-band network-type feed; NR presence
        // in the current snapshot stands in for it.
        let index = self
            .cursor
            .load(Ordering::Relaxed)
            .saturating_sub(1)
            .min(self.snapshots.len().saturating_sub(1));
        self.snapshots
            .get(index)
            .is_some_and(|records| {
                records.iter().any(|r| r.technology() == Technology::Nr)
            })
    }
}

/// A fixed location fix, captured at startup.
pub struct FixedLocation {
    sample: LocationSample,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64) -> Self {
        Self {
            sample: LocationSample::new(latitude, longitude, accuracy_m, Utc::now()),
        }
    }
}

impl LocationSource for FixedLocation {
    fn last_known_location(&self) -> Option<LocationSample> {
        Some(self.sample.clone())
    }
}
