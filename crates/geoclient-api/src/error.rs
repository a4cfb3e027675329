use thiserror::Error;

/// Top-level error type for the `geoclient-api` crate.
///
/// Covers every failure mode of the backend surfaces: the layer registry,
/// the application-context endpoints, and local context documents.
/// `geoclient-core` maps these into parser-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Lookup ──────────────────────────────────────────────────────
    /// The layer registry has no layer with this identifier (HTTP 404).
    #[error("Layer not found: {layer_id}")]
    LayerNotFound { layer_id: String },

    /// The backend has no application context with this identifier (HTTP 404).
    #[error("Application context not found: {id}")]
    ContextNotFound { id: String },

    /// The backend exposes no layer registry (static documents).
    #[error("No layer registry configured")]
    NoRegistry,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success HTTP status other than 404.
    #[error("Backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Reading a local context document failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::LayerNotFound { .. } | Self::ContextNotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
