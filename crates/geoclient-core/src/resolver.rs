// ── Layer record resolution ──
//
// Maps a `layerId` from the tree onto its full registry descriptor.
// The remote registry lives behind `BackendClient`; static deployments
// and tests use an in-memory table.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use geoclient_api::{BackendClient, LayerDescriptor, LayerId};

use crate::error::CoreError;

/// Lookup of layer descriptors by id.
///
/// Implementations report unknown ids as [`CoreError::LayerNotFound`] and
/// anything else as a transport-class error. They do not retry.
pub trait LayerResolver: Send + Sync {
    fn resolve(
        &self,
        id: &LayerId,
    ) -> impl Future<Output = Result<LayerDescriptor, CoreError>> + Send;
}

impl LayerResolver for BackendClient {
    async fn resolve(&self, id: &LayerId) -> Result<LayerDescriptor, CoreError> {
        Ok(self.find_layer(id).await?)
    }
}

impl<R: LayerResolver> LayerResolver for Arc<R> {
    fn resolve(
        &self,
        id: &LayerId,
    ) -> impl Future<Output = Result<LayerDescriptor, CoreError>> + Send {
        (**self).resolve(id)
    }
}

// ── StaticResolver ───────────────────────────────────────────────

/// In-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    layers: HashMap<LayerId, LayerDescriptor>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index descriptors by their `id`. Descriptors without one are skipped.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = LayerDescriptor>) -> Self {
        let mut resolver = Self::new();
        for descriptor in descriptors {
            match descriptor.id.clone() {
                Some(id) => resolver.insert(id, descriptor),
                None => warn!(layer = %descriptor.name, "descriptor without id skipped"),
            }
        }
        resolver
    }

    pub fn insert(&mut self, id: impl Into<LayerId>, descriptor: LayerDescriptor) {
        self.layers.insert(id.into(), descriptor);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl LayerResolver for StaticResolver {
    async fn resolve(&self, id: &LayerId) -> Result<LayerDescriptor, CoreError> {
        debug!(layer_id = %id, "resolving layer from static registry");
        self.layers
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::LayerNotFound {
                layer_id: id.to_string(),
            })
    }
}

// ── RegistryResolver ─────────────────────────────────────────────

/// The resolver a session is configured with.
#[derive(Debug, Clone)]
pub enum RegistryResolver {
    Remote(BackendClient),
    Static(StaticResolver),
}

impl LayerResolver for RegistryResolver {
    async fn resolve(&self, id: &LayerId) -> Result<LayerDescriptor, CoreError> {
        match self {
            Self::Remote(client) => client.resolve(id).await,
            Self::Static(table) => table.resolve(id).await,
        }
    }
}
