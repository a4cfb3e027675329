// Layer registry endpoint
//
// One descriptor per request: `GET {layers}/{id}`. No retries here;
// callers decide whether a failure aborts their work.

use std::path::Path;

use tracing::debug;

use crate::client::{BackendClient, decode, member_url};
use crate::error::Error;
use crate::types::{LayerDescriptor, LayerId};

impl BackendClient {
    /// Fetch the descriptor of a single layer.
    ///
    /// HTTP 404 maps to [`Error::LayerNotFound`].
    pub async fn find_layer(&self, id: &LayerId) -> Result<LayerDescriptor, Error> {
        let base = self.endpoints().layers.as_ref().ok_or(Error::NoRegistry)?;
        let url = member_url(base, &id.to_string())?;
        debug!(layer_id = %id, "resolving layer");

        self.get_optional(url)
            .await?
            .ok_or_else(|| Error::LayerNotFound {
                layer_id: id.to_string(),
            })
    }
}

/// Read a static layer registry: a JSON array of descriptors.
pub async fn read_layers_file(path: &Path) -> Result<Vec<LayerDescriptor>, Error> {
    debug!(path = %path.display(), "reading layer registry");
    let body = tokio::fs::read_to_string(path).await?;
    decode(&body)
}
