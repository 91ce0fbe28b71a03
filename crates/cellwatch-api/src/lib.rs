// cellwatch-api: HTTP transport for the cellwatch telemetry client
// (endpoint probing + report submission)

pub mod client;
pub mod endpoint;
pub mod error;
pub mod payload;
pub mod probe;
pub mod transport;

pub use client::TelemetryClient;
pub use endpoint::{Endpoint, Scheme};
pub use error::Error;
pub use probe::{ProbeOutcome, probe, probe_detail};
pub use transport::TransportConfig;
