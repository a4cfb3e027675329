// Message catalogs
//
// i18n documents are plain nested JSON objects served next to the
// application (`resources/i18n/{lng}.json`). They are returned
// undecoded; flattening into lookup keys is the caller's concern.

use std::path::Path;

use tracing::debug;
use url::Url;

use crate::client::{BackendClient, decode};
use crate::error::Error;

impl BackendClient {
    /// Fetch the message catalog at `url`.
    ///
    /// Returns `Ok(None)` when the backend has no catalog there (HTTP 404).
    pub async fn fetch_messages(&self, url: Url) -> Result<Option<serde_json::Value>, Error> {
        debug!(%url, "fetching message catalog");
        self.get_optional(url).await
    }
}

/// Read a message catalog from a local JSON file.
pub async fn read_messages_file(path: &Path) -> Result<serde_json::Value, Error> {
    debug!(path = %path.display(), "reading message catalog");
    let body = tokio::fs::read_to_string(path).await?;
    decode(&body)
}
