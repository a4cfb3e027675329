// ── Core error types ──
//
// Parser-facing errors from geoclient-core. Consumers never see HTTP
// status handling or JSON decoding directly: the `From<geoclient_api::Error>`
// impl translates backend failures into the registry taxonomy
// (not-found vs. transport).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Layer not found: {layer_id}")]
    LayerNotFound { layer_id: String },

    #[error("Application context not found: {id}")]
    ContextNotFound { id: String },

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot reach backend: {message}")]
    Transport {
        message: String,
        /// HTTP status code (if the backend answered at all).
        status: Option<u16>,
    },

    // ── Document errors ──────────────────────────────────────────────
    #[error("Invalid application context: {field}: {reason}")]
    ConfigShape { field: String, reason: String },

    #[error("Cannot read application context: {message}")]
    ContextUnavailable { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn shape(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigShape {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for unknown layer or context identifiers.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LayerNotFound { .. } | Self::ContextNotFound { .. }
        )
    }

    /// Returns `true` if retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { status, .. } => status.is_none_or(|s| s >= 500),
            _ => false,
        }
    }
}

// ── Conversion from backend errors ───────────────────────────────────

impl From<geoclient_api::Error> for CoreError {
    fn from(err: geoclient_api::Error) -> Self {
        match err {
            geoclient_api::Error::LayerNotFound { layer_id } => {
                CoreError::LayerNotFound { layer_id }
            }
            geoclient_api::Error::ContextNotFound { id } => CoreError::ContextNotFound { id },
            geoclient_api::Error::NoRegistry => CoreError::Config {
                message: "no layer registry configured for this backend".into(),
            },
            geoclient_api::Error::Transport(ref e) => CoreError::Transport {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            geoclient_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            geoclient_api::Error::Tls(msg) => CoreError::Transport {
                message: format!("TLS error: {msg}"),
                status: None,
            },
            geoclient_api::Error::Api { status, message } => CoreError::Transport {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            geoclient_api::Error::Deserialization { message, body: _ } => CoreError::Transport {
                message: format!("unexpected response: {message}"),
                status: None,
            },
            geoclient_api::Error::Io(e) => CoreError::ContextUnavailable {
                message: e.to_string(),
            },
        }
    }
}
