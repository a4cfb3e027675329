// ── Renderable layer domain types ──
//
// One-to-one with the renderer's tile/image WMS layers. Metadata field
// names serialize exactly as other UI components read them
// (`legendUrl`, `hoverTemplate`, ...).

use serde::Serialize;

/// WMS request parameters sent with every tile or image request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmsParams {
    #[serde(rename = "LAYERS")]
    pub layers: Option<String>,
    #[serde(rename = "TILED", skip_serializing_if = "Option::is_none")]
    pub tiled: Option<bool>,
    #[serde(rename = "TRANSPARENT")]
    pub transparent: bool,
    #[serde(rename = "TIME", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WmsSource {
    pub url: Option<String>,
    pub params: WmsParams,
    pub attribution: Option<String>,
    pub cross_origin: Option<String>,
}

/// Tiled vs. single-image rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "lowercase")]
pub enum LayerKind {
    Tile(WmsSource),
    Image(WmsSource),
}

/// Display metadata stamped on every built layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerMetadata {
    pub name: String,
    pub hoverable: bool,
    pub hover_template: Option<String>,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub legend_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A layer ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableLayer {
    pub kind: LayerKind,
    pub visible: bool,
    pub opacity: f64,
    #[serde(flatten)]
    pub metadata: LayerMetadata,
}

impl RenderableLayer {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn is_tiled(&self) -> bool {
        matches!(self.kind, LayerKind::Tile(_))
    }

    pub fn source(&self) -> &WmsSource {
        match &self.kind {
            LayerKind::Tile(source) | LayerKind::Image(source) => source,
        }
    }
}
