// ── Domain model ──

pub mod location;
pub mod metrics;
pub mod record;

pub use location::LocationSample;
pub use metrics::{CellMetrics, NetworkType};
pub use record::{LteRecord, NrRecord, RawCellRecord, Technology};
