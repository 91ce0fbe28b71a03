// ── Metrics normalization ──
//
// Reconciles a pull of raw, partially-available cell records into one
// validated snapshot: serving cells only, strongest power per
// technology, out-of-range fields discarded to sentinels. Pure -- the
// capture instant is an argument, so equal inputs give equal outputs no
// matter how often this runs.

use chrono::{DateTime, Utc};

use crate::model::metrics::{
    CELL_ID_ABSENT, CellMetrics, NetworkType, PCI_ABSENT, SIGNAL_ABSENT, SINR_ABSENT,
};
use crate::model::record::{LteRecord, NrRecord, RawCellRecord};

/// Select the best serving cell per technology and combine into one
/// [`CellMetrics`].
///
/// Ties on signal power go to the first-seen record. Records without a
/// power reading can never win. If both technologies produce a winner
/// the snapshot is labeled 5G NSA; the empty snapshot results when
/// neither does.
pub fn normalize(records: &[RawCellRecord], captured_at: DateTime<Utc>) -> CellMetrics {
    let mut best_lte: Option<&LteRecord> = None;
    let mut best_nr: Option<&NrRecord> = None;

    for record in records {
        match record {
            RawCellRecord::Lte(r) if r.serving => {
                if stronger(r.rsrp_dbm, best_lte.and_then(|b| b.rsrp_dbm)) {
                    best_lte = Some(r);
                }
            }
            RawCellRecord::Nr(r) if r.serving => {
                if stronger(r.ss_rsrp_dbm, best_nr.and_then(|b| b.ss_rsrp_dbm)) {
                    best_nr = Some(r);
                }
            }
            RawCellRecord::Lte(_) | RawCellRecord::Nr(_) | RawCellRecord::Other => {}
        }
    }

    let mut metrics = CellMetrics::empty(captured_at);

    if let Some(lte) = best_lte {
        metrics.signal_strength_4g = lte.rsrp_dbm.unwrap_or(SIGNAL_ABSENT);
        metrics.sinr_4g = lte.rssnr_db.unwrap_or(SINR_ABSENT);
        metrics.cell_id_4g = lte.ci.unwrap_or(CELL_ID_ABSENT);
        metrics.pci_4g = lte.pci.unwrap_or(PCI_ABSENT);
    }

    if let Some(nr) = best_nr {
        metrics.signal_strength_5g = nr.ss_rsrp_dbm.unwrap_or(SIGNAL_ABSENT);
        metrics.sinr_5g = nr.ss_sinr_db.unwrap_or(SINR_ABSENT);
        metrics.cell_id_5g = nr.nci.unwrap_or(CELL_ID_ABSENT);
        metrics.pci_5g = nr.pci.unwrap_or(PCI_ABSENT);
    }

    (metrics.network_type, metrics.is_5g) = match (best_lte.is_some(), best_nr.is_some()) {
        (true, true) => (NetworkType::NrNsa, true),
        (false, true) => (NetworkType::Nr, true),
        (true, false) => (NetworkType::Lte, false),
        (false, false) => (NetworkType::Unknown, false),
    };

    metrics.validated()
}

/// `candidate` beats `current` iff it has a reading that is strictly
/// greater (least negative). Strict comparison keeps the first-seen
/// record on ties.
fn stronger(candidate: Option<i32>, current: Option<i32>) -> bool {
    match (candidate, current) {
        (Some(c), Some(cur)) => c > cur,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
