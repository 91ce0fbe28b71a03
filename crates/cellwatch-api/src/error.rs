use thiserror::Error;

/// Top-level error type for the `cellwatch-api` crate.
///
/// Covers the transport failure modes of the reporting protocol.
/// `cellwatch-core` maps these into domain-level diagnostics; probe
/// failures never surface here at all (a probe answers `false`).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON serialization of a request body failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on a
    /// later cycle (the reporting loop never retries within a cycle).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::UnexpectedStatus { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Returns `true` if the failure was the server rejecting the
    /// request rather than the network losing it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status, .. } if (400..500).contains(status))
    }
}
