//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use geoclient_config::ConfigError;
use geoclient_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const INVALID_DOCUMENT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(geoclient::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Use --insecure (-k) for self-signed certificates, or read a\n\
             local document with --file."
        )
    )]
    ConnectionFailed { message: String },

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Application context '{id}' not found")]
    #[diagnostic(
        code(geoclient::context_not_found),
        help("Check the application id and the backend --mode.")
    )]
    ContextNotFound { id: String },

    #[error("Layer '{layer_id}' not found in the layer registry")]
    #[diagnostic(
        code(geoclient::layer_not_found),
        help(
            "The layer tree references a layer the registry does not know.\n\
             In static mode, pass the registry with --layers."
        )
    )]
    LayerNotFound { layer_id: String },

    // ── Documents ────────────────────────────────────────────────────
    #[error("Invalid application context: {field}: {reason}")]
    #[diagnostic(code(geoclient::invalid_context))]
    InvalidContext { field: String, reason: String },

    #[error("Cannot read application context: {message}")]
    #[diagnostic(
        code(geoclient::context_unavailable),
        help("Check the --file path and that it holds a JSON document.")
    )]
    ContextUnavailable { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(geoclient::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(geoclient::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: geoclient --base-url <URL> config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(geoclient::no_config),
        help(
            "Pass --base-url or --file, or create a profile with:\n\
             geoclient --base-url <URL> config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(geoclient::config))]
    Config(Box<ConfigError>),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(geoclient::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(geoclient::json), help("Check the file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::ContextNotFound { .. } | Self::LayerNotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidContext { .. } | Self::ContextUnavailable { .. } | Self::Json(_) => {
                exit_code::INVALID_DOCUMENT
            }
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LayerNotFound { layer_id } => CliError::LayerNotFound { layer_id },
            CoreError::ContextNotFound { id } => CliError::ContextNotFound { id },
            CoreError::Transport { message, .. } => CliError::ConnectionFailed { message },
            CoreError::ConfigShape { field, reason } => CliError::InvalidContext { field, reason },
            CoreError::ContextUnavailable { message } => CliError::ContextUnavailable { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
