// ── Application state ──
//
// The immutable result of parsing one application context. Built once
// per load and installed wholesale; never patched in place.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use geoclient_api::{ActiveModule, ApplicationContext};

use super::tree::LayerGroup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "geoclient".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Validated `clientConfig.mapView`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: [f64; 2],
    pub extent: [f64; 4],
    /// Always of the form `EPSG:<code>`.
    pub projection: String,
    pub resolutions: Vec<f64>,
    pub zoom: f64,
}

/// The defaults every parsed state starts from.
///
/// Supplied by configuration so the builder never reads ambient state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineState {
    #[serde(default)]
    pub app_info: AppInfo,
    #[serde(default)]
    pub active_modules: Vec<ActiveModule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub app_info: AppInfo,
    pub map_view: MapView,
    pub map_layers: LayerGroup,
    pub active_modules: Vec<ActiveModule>,
    pub default_topic: String,
    pub map_scales: Option<Vec<f64>>,
    /// The document this state was built from.
    pub app_context: Arc<ApplicationContext>,
}
