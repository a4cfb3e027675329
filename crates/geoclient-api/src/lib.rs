// geoclient-api: Async client for SHOGun-style GIS backends (context documents + layer registry)

pub mod client;
pub mod context;
pub mod error;
pub mod layers;
pub mod messages;
pub mod transport;
pub mod types;

pub use client::{BackendClient, ContextEndpoint, Endpoints};
pub use context::read_context_file;
pub use error::Error;
pub use layers::read_layers_file;
pub use messages::read_messages_file;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    ActiveModule, ApplicationContext, DEFAULT_TIME_FORMAT, LayerClientConfig, LayerDescriptor,
    LayerId, LayerType, MapViewConfig, Projection, RawTreeNode, SourceConfig,
};
