// ── Raw radio records ──
//
// What the device radio subsystem hands us before any validation: one
// record per observed cell, tagged by technology. Individual fields may
// be absent depending on platform capability -- absence is `None`, never
// an error. Adding a technology means adding a variant, and every match
// over `RawCellRecord` is exhaustive, so the compiler finds the sites.

use serde::{Deserialize, Serialize};

/// Radio access technology of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    Lte,
    Nr,
    Other,
}

/// One observed cell, as reported by the radio subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tech", rename_all = "lowercase")]
pub enum RawCellRecord {
    Lte(LteRecord),
    Nr(NrRecord),
    /// A technology the pipeline does not model (2G/3G, satellite, ...).
    /// Carried so callers can count it, never selected.
    Other,
}

impl RawCellRecord {
    pub fn technology(&self) -> Technology {
        match self {
            Self::Lte(_) => Technology::Lte,
            Self::Nr(_) => Technology::Nr,
            Self::Other => Technology::Other,
        }
    }

    /// Whether the device is registered to this cell (as opposed to a
    /// neighbor cell merely detected).
    pub fn is_serving(&self) -> bool {
        match self {
            Self::Lte(r) => r.serving,
            Self::Nr(r) => r.serving,
            Self::Other => false,
        }
    }
}

/// Raw 4G/LTE measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LteRecord {
    /// Registered/serving cell flag.
    pub serving: bool,
    /// RSRP in dBm.
    pub rsrp_dbm: Option<i32>,
    /// RSSNR in dB.
    pub rssnr_db: Option<f64>,
    /// E-UTRAN Cell Identity (28-bit).
    pub ci: Option<i64>,
    /// Physical Cell Identity (0-503 for LTE).
    pub pci: Option<i32>,
}

/// Raw 5G/NR measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NrRecord {
    pub serving: bool,
    /// SS-RSRP in dBm.
    pub ss_rsrp_dbm: Option<i32>,
    /// SS-SINR in dB.
    pub ss_sinr_db: Option<f64>,
    /// NR Cell Identity (36-bit).
    pub nci: Option<i64>,
    /// Physical Cell Identity (0-1007 for NR).
    pub pci: Option<i32>,
}

impl LteRecord {
    /// A serving-cell record with only a power reading.
    pub fn serving(rsrp_dbm: i32) -> Self {
        Self {
            serving: true,
            rsrp_dbm: Some(rsrp_dbm),
            rssnr_db: None,
            ci: None,
            pci: None,
        }
    }
}

impl NrRecord {
    pub fn serving(ss_rsrp_dbm: i32) -> Self {
        Self {
            serving: true,
            ss_rsrp_dbm: Some(ss_rsrp_dbm),
            ss_sinr_db: None,
            nci: None,
            pci: None,
        }
    }
}
