//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use cellwatch_config::ConfigError;
use cellwatch_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Discovery / network ─────────────────────────────────────────
    #[error("No reporting server found")]
    #[diagnostic(
        code(cellwatch::no_server),
        help(
            "Every discovery strategy was exhausted.\n\
             Check that the server is running and on the same network,\n\
             or pin it with --server <host> / a profile's `server` entry."
        )
    )]
    NoServerFound,

    #[error("{address} is not reachable")]
    #[diagnostic(
        code(cellwatch::unreachable),
        help("A live server answers the health route with 2xx (or 404).")
    )]
    Unreachable { address: String },

    #[error("Connection failed: {message}")]
    #[diagnostic(code(cellwatch::connection_failed))]
    ConnectionFailed { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(code(cellwatch::timeout))]
    Timeout { seconds: u64 },

    // ── Validation ──────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cellwatch::validation))]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found")]
    #[diagnostic(
        code(cellwatch::profile_not_found),
        help("Available profiles: {available}\nCreate one with: cellwatch config init")
    )]
    ProfileNotFound { name: String, available: String },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error")]
    #[diagnostic(code(cellwatch::config))]
    Config(#[source] Box<ConfigError>),

    // ── Internal ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(cellwatch::internal))]
    Internal { message: String },

    // ── IO / serialization ──────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid records file: {0}")]
    #[diagnostic(
        code(cellwatch::records),
        help("Expected a JSON array of snapshots, each an array of tagged cell records.")
    )]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoServerFound | Self::Unreachable { .. } | Self::ConnectionFailed { .. } => {
                exit_code::CONNECTION
            }
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error conversions ────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            other => CliError::Config(Box::new(other)),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotResolved => CliError::NoServerFound,
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Transport { message } => CliError::ConnectionFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Rejected { status, path } => CliError::ConnectionFailed {
                message: format!("server answered HTTP {status} at {path}"),
            },
            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}
