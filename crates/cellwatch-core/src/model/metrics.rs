// ── Validated metrics snapshot ──
//
// One reconciled reading per reporting cycle, combining the best serving
// cell per technology. Sentinels mean "not measured", never "measured as
// the sentinel value" -- the validity ranges below guarantee no legal
// reading collides with a sentinel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Sentinel: signal power was not measured.
pub const SIGNAL_ABSENT: i32 = -999;
/// Sentinel: SINR was not measured.
pub const SINR_ABSENT: f64 = -999.0;
/// Sentinel: cell identity was not measured.
pub const CELL_ID_ABSENT: i64 = -1;
/// Sentinel: physical cell identity was not measured.
pub const PCI_ABSENT: i32 = -1;

/// Network technology label attached to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum NetworkType {
    #[strum(serialize = "Unknown")]
    Unknown,
    #[strum(serialize = "LTE")]
    Lte,
    #[strum(serialize = "NR")]
    Nr,
    /// 5G anchored to a 4G control channel -- both technologies report.
    #[strum(serialize = "5G NSA")]
    NrNsa,
}

/// The validated per-cycle snapshot.
///
/// Recomputed every reporting cycle and read once; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    // 4G/LTE
    pub signal_strength_4g: i32,
    pub sinr_4g: f64,
    pub cell_id_4g: i64,
    pub pci_4g: i32,

    // 5G/NR
    pub signal_strength_5g: i32,
    pub sinr_5g: f64,
    pub cell_id_5g: i64,
    pub pci_5g: i32,

    pub is_5g: bool,
    pub network_type: NetworkType,
    pub captured_at: DateTime<Utc>,
}

impl CellMetrics {
    /// An empty/invalid snapshot: every field at its sentinel.
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            signal_strength_4g: SIGNAL_ABSENT,
            sinr_4g: SINR_ABSENT,
            cell_id_4g: CELL_ID_ABSENT,
            pci_4g: PCI_ABSENT,
            signal_strength_5g: SIGNAL_ABSENT,
            sinr_5g: SINR_ABSENT,
            cell_id_5g: CELL_ID_ABSENT,
            pci_5g: PCI_ABSENT,
            is_5g: false,
            network_type: NetworkType::Unknown,
            captured_at,
        }
    }

    /// A snapshot is valid iff at least one signal strength was measured.
    pub fn is_valid(&self) -> bool {
        self.signal_strength_4g != SIGNAL_ABSENT || self.signal_strength_5g != SIGNAL_ABSENT
    }

    pub fn has_4g(&self) -> bool {
        self.signal_strength_4g != SIGNAL_ABSENT
    }

    pub fn has_5g(&self) -> bool {
        self.signal_strength_5g != SIGNAL_ABSENT
    }

    /// Copy with every out-of-range field replaced by its sentinel.
    /// Signal power has no extra validity filter beyond presence.
    pub fn validated(&self) -> Self {
        let mut v = self.clone();
        if !is_valid_sinr(v.sinr_4g) {
            v.sinr_4g = SINR_ABSENT;
        }
        if !is_valid_cell_id_4g(v.cell_id_4g) {
            v.cell_id_4g = CELL_ID_ABSENT;
        }
        if !is_valid_pci(v.pci_4g) {
            v.pci_4g = PCI_ABSENT;
        }
        if !is_valid_sinr(v.sinr_5g) {
            v.sinr_5g = SINR_ABSENT;
        }
        if !is_valid_cell_id_5g(v.cell_id_5g) {
            v.cell_id_5g = CELL_ID_ABSENT;
        }
        if !is_valid_pci(v.pci_5g) {
            v.pci_5g = PCI_ABSENT;
        }
        v
    }
}

// ── Validity ranges ──────────────────────────────────────────────────

/// LTE RSSNR sits around -20..+30 dB, NR SS-SINR around -23..+40 dB;
/// [-30, 50] covers both with headroom.
pub fn is_valid_sinr(sinr: f64) -> bool {
    sinr != SINR_ABSENT && (-30.0..=50.0).contains(&sinr)
}

/// E-UTRAN CI: 28-bit, 1..=268,435,455 (zero is reserved).
pub fn is_valid_cell_id_4g(cell_id: i64) -> bool {
    cell_id > 0 && cell_id <= 268_435_455
}

/// NR NCI: 36-bit, 1..=68,719,476,735.
pub fn is_valid_cell_id_5g(cell_id: i64) -> bool {
    cell_id > 0 && cell_id <= 68_719_476_735
}

/// PCI: 0..=503 for LTE, 0..=1007 for NR; the wider range is accepted
/// for both.
pub fn is_valid_pci(pci: i32) -> bool {
    (0..=1007).contains(&pci)
}
