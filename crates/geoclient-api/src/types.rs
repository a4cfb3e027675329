// Backend document types
//
// Models for the application-context document and the layer registry's
// descriptors. Fields use `#[serde(default)]` liberally because both
// backend flavours (boot and legacy) omit fields freely. Every default a
// descriptor field carries is declared here, once, on the schema type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Date pattern applied to time-enabled sources that don't declare one.
pub const DEFAULT_TIME_FORMAT: &str = "YYYY-MM-DD";

// ── Identifiers ──────────────────────────────────────────────────────

/// Reference into the backend layer registry.
///
/// Boot backends use numeric ids; static and legacy documents sometimes
/// use strings. Both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerId {
    Numeric(i64),
    Named(String),
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Named(s) => f.write_str(s),
        }
    }
}

impl From<i64> for LayerId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self::Named(s.to_owned())
    }
}

impl From<String> for LayerId {
    fn from(s: String) -> Self {
        Self::Named(s)
    }
}

// ── Application context ──────────────────────────────────────────────

/// Root application-context document as served by the backend.
///
/// Map-view fields are all optional here; `geoclient-core` validates them
/// and reports missing ones as a shape error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationContext {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client_config: ContextClientConfig,
    #[serde(default)]
    pub tool_config: Vec<ActiveModule>,
    #[serde(default)]
    pub layer_tree: Option<RawTreeNode>,
    /// Catch-all for fields the parser doesn't interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextClientConfig {
    #[serde(default)]
    pub map_view: Option<MapViewConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `clientConfig.mapView` as delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapViewConfig {
    #[serde(default)]
    pub center: Option<Vec<f64>>,
    #[serde(default)]
    pub extent: Option<Vec<f64>>,
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub resolutions: Option<Vec<f64>>,
    #[serde(default)]
    pub zoom: Option<f64>,
}

/// Projection as written in the document: `"EPSG:3857"`, `"3857"` or `3857`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Projection {
    Code(i64),
    Name(String),
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(n) => write!(f, "{n}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

/// One node of the authored layer tree.
///
/// A node with `children` is a folder; anything else is a leaf that must
/// name a `layerId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTreeNode {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub children: Option<Vec<RawTreeNode>>,
    #[serde(default)]
    pub layer_id: Option<LayerId>,
}

/// A toolbar module entry from `toolConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveModule {
    pub xtype: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl ActiveModule {
    pub fn new(xtype: impl Into<String>) -> Self {
        Self {
            xtype: xtype.into(),
            hidden: false,
            properties: serde_json::Map::new(),
        }
    }
}

// ── Layer registry ───────────────────────────────────────────────────

/// Source type tag of a layer descriptor.
///
/// Only `ImageWms` and `TileWms` produce layers; the rest are known to
/// the backend but not rendered by this client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerType {
    ImageWms,
    TileWms,
    Wmts,
    WmsTime,
    Other(String),
}

impl LayerType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ImageWms => "WMS",
            Self::TileWms => "TILEWMS",
            Self::Wmts => "WMTS",
            Self::WmsTime => "WMSTime",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for LayerType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "WMS" => Self::ImageWms,
            "TILEWMS" => Self::TileWms,
            "WMTS" => Self::Wmts,
            "WMSTime" => Self::WmsTime,
            _ => Self::Other(s),
        }
    }
}

impl From<LayerType> for String {
    fn from(t: LayerType) -> Self {
        match t {
            LayerType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer descriptor as returned by `GET {layers}/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    #[serde(default)]
    pub id: Option<LayerId>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    #[serde(default)]
    pub source_config: SourceConfig,
    #[serde(default)]
    pub client_config: LayerClientConfig,
}

/// `sourceConfig` of a layer descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub layer_names: Option<String>,
    #[serde(default)]
    pub cross_origin: Option<String>,
    #[serde(default = "default_true")]
    pub transparent: bool,
    #[serde(default = "default_true")]
    pub request_with_tiled: bool,
    #[serde(default)]
    pub attribution: Option<String>,
    /// Source-level type; `"WMSTime"` marks a time-enabled tiled source.
    #[serde(default, rename = "type")]
    pub source_type: Option<String>,
    #[serde(default)]
    pub legend_url: Option<String>,
    #[serde(default)]
    pub time_format: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            layer_names: None,
            cross_origin: None,
            transparent: default_true(),
            request_with_tiled: default_true(),
            attribution: None,
            source_type: None,
            legend_url: None,
            time_format: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl SourceConfig {
    /// The declared time format, or [`DEFAULT_TIME_FORMAT`].
    pub fn time_format(&self) -> &str {
        self.time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT)
    }

    /// Whether the source requests a `TIME` dimension.
    pub fn is_time_enabled(&self) -> bool {
        self.source_type.as_deref() == Some("WMSTime")
    }
}

/// `clientConfig` of a layer descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerClientConfig {
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub hoverable: bool,
    #[serde(default)]
    pub hover_template: Option<String>,
    #[serde(default)]
    pub cross_origin: Option<String>,
}

impl Default for LayerClientConfig {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            hoverable: false,
            hover_template: None,
            cross_origin: None,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_opacity() -> f64 {
    1.0
}
