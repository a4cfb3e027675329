// ── Domain model ──
//
// Canonical types produced by the parser. Wire shapes live in
// `geoclient_api::types`; `crate::convert` validates them into these.

pub mod layer;
pub mod state;
pub mod tree;

pub use layer::{LayerKind, LayerMetadata, RenderableLayer, WmsParams, WmsSource};
pub use state::{AppInfo, AppState, BaselineState, MapView};
pub use tree::{FolderNode, LayerEntry, LayerGroup, LeafNode, TreeNode};
