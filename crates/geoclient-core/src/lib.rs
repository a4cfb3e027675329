// geoclient-core: Application-context parser between geoclient-api and consumers (CLI, renderers).
//
// A context document is validated, its layer tree resolved against the
// layer registry, and the result installed as one immutable `AppState`.

pub mod config;
pub mod convert;
pub mod error;
pub mod layer;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod scales;
pub mod session;
pub mod source;
pub mod state;
pub mod timefmt;
pub mod toolbar;
pub mod tree;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AppMode, ClientConfig, DEFAULT_LOCALE_PATH, PrintConfig, TlsVerification};
pub use error::CoreError;
pub use layer::{Clock, LayerFactory};
pub use loader::{ContextLoader, LoadOutcome};
pub use resolver::{LayerResolver, RegistryResolver, StaticResolver};
pub use scales::{ProjectionUnit, compute_scales};
pub use session::MapSession;
pub use source::ContextSource;
pub use state::StateBuilder;
pub use toolbar::{
    Catalog, MapToolContext, ModuleType, Tool, ToolBinding, Translate, build_toolbar,
    measure_tools_enabled,
};
pub use tree::{SiblingResolution, TreeBuilder};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AppInfo, AppState, BaselineState, FolderNode, LayerEntry, LayerGroup, LayerKind,
    LayerMetadata, LeafNode, MapView, RenderableLayer, TreeNode, WmsParams, WmsSource,
};
