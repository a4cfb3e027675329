// Application-context endpoints
//
// Boot and legacy backends serve one document per application id;
// static deployments serve a single fixed document, either over HTTP
// or from disk.

use std::path::Path;

use tracing::debug;

use crate::client::{BackendClient, ContextEndpoint, decode, member_url};
use crate::error::Error;
use crate::types::ApplicationContext;

impl BackendClient {
    /// Fetch the application context for `id`.
    ///
    /// `id` is ignored when the endpoint is a fixed document.
    /// HTTP 404 maps to [`Error::ContextNotFound`].
    pub async fn fetch_context(&self, id: &str) -> Result<ApplicationContext, Error> {
        let url = match &self.endpoints().context {
            ContextEndpoint::Collection(base) => member_url(base, id)?,
            ContextEndpoint::Document(url) => url.clone(),
        };
        debug!(id, "fetching application context");

        self.get_optional(url)
            .await?
            .ok_or_else(|| Error::ContextNotFound { id: id.to_owned() })
    }
}

/// Read an application context from a local JSON file.
pub async fn read_context_file(path: &Path) -> Result<ApplicationContext, Error> {
    debug!(path = %path.display(), "reading application context");
    let body = tokio::fs::read_to_string(path).await?;
    decode(&body)
}
