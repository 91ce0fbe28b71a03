// ── Core error types ──
//
// User-facing errors from cellwatch-core. Recoverable transport
// failures (probe misses, per-cycle submission failures) never appear
// here -- they are swallowed at their origin and reported as state.
// What remains is genuinely unusual: a client that cannot be built, a
// submission the caller chose to await.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No endpoint resolved -- run discovery first")]
    NotResolved,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Server rejected the request (HTTP {status}) at {path}")]
    Rejected { status: u16, path: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cellwatch_api::Error> for CoreError {
    fn from(err: cellwatch_api::Error) -> Self {
        match err {
            cellwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::Transport {
                        message: e.to_string(),
                    }
                }
            }
            cellwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            cellwatch_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            cellwatch_api::Error::UnexpectedStatus { status, path } => {
                CoreError::Rejected { status, path }
            }
            cellwatch_api::Error::Serialization(e) => CoreError::Internal(e.to_string()),
        }
    }
}
