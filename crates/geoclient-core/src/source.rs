// ── Context sources ──
//
// Where application-context documents come from: a backend over HTTP
// or a file on disk.

use std::path::PathBuf;

use tracing::debug;

use geoclient_api::{ApplicationContext, BackendClient, read_context_file};

use crate::error::CoreError;

#[derive(Debug, Clone)]
pub enum ContextSource {
    Remote(BackendClient),
    File(PathBuf),
}

impl ContextSource {
    /// Fetch the context document for `id`.
    ///
    /// Fixed-document sources ignore `id`.
    pub async fn fetch(&self, id: &str) -> Result<ApplicationContext, CoreError> {
        match self {
            Self::Remote(client) => Ok(client.fetch_context(id).await?),
            Self::File(path) => {
                debug!(path = %path.display(), "loading context from file");
                read_context_file(path).await.map_err(|e| match e {
                    geoclient_api::Error::Deserialization { message, .. } => {
                        CoreError::ContextUnavailable {
                            message: format!("{}: {message}", path.display()),
                        }
                    }
                    other => other.into(),
                })
            }
        }
    }
}
