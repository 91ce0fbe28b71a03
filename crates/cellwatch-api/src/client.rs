// Telemetry submission client
//
// Wraps `reqwest::Client` with reporting-route URL construction and
// status checking. One instance exists per resolved endpoint; discovery
// builds it after the winning probe and the monitor clones it into each
// detached submission task.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::payload::{LocationReport, RegisterDevice, SignalReport};
use crate::transport::TransportConfig;

/// HTTP client for the reporting server, bound to one endpoint and one
/// device identity. Cheap to clone.
#[derive(Clone)]
pub struct TelemetryClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    device_id: String,
}

impl TelemetryClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(
        endpoint: Endpoint,
        device_id: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            endpoint,
            device_id: device_id.into(),
        })
    }

    /// Create a client sharing a pre-built `reqwest::Client`.
    ///
    /// Use this when the discovery scan already owns a client; the
    /// submission path then reuses its connection pool.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Endpoint,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint,
            device_id: device_id.into(),
        }
    }

    /// The endpoint this client submits to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The device identity used in submission routes.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    // ── Reporting routes ─────────────────────────────────────────────

    /// Register this device with the server. Idempotent upsert -- safe
    /// to repeat after every re-discovery.
    pub async fn register_device(&self, body: &RegisterDevice) -> Result<(), Error> {
        let url = self.endpoint.with_path("/api/devices/register")?;
        self.post(url, body).await
    }

    /// Submit one signal snapshot. Fire-and-forget at the call site; a
    /// failure here is logged by the caller and the next cycle retries
    /// with fresh data.
    pub async fn submit_signal(&self, body: &SignalReport) -> Result<(), Error> {
        let url = self
            .endpoint
            .with_path(&format!("/api/devices/{}/signal", self.device_id))?;
        self.post(url, body).await
    }

    /// Submit a fresh location fix.
    pub async fn submit_location(&self, body: &LocationReport) -> Result<(), Error> {
        let url = self
            .endpoint
            .with_path(&format!("/api/devices/{}/location", self.device_id))?;
        self.post(url, body).await
    }

    // ── Request helper ───────────────────────────────────────────────

    /// Send a POST with a JSON body, mapping non-2xx statuses to
    /// [`Error::UnexpectedStatus`].
    async fn post(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("POST {}", url);
        let path = url.path().to_owned();

        let resp = self.http.post(url).json(body).send().await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                path,
            })
        }
    }
}
