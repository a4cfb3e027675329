// ── Application state builder ──
//
// Assembles one immutable `AppState` from a context document. The
// document is validated before any lookup starts, and a failure at any
// step yields no state at all.

use std::sync::Arc;

use tracing::debug;

use geoclient_api::{ActiveModule, ApplicationContext};

use crate::convert;
use crate::error::CoreError;
use crate::model::{AppState, BaselineState};
use crate::resolver::LayerResolver;
use crate::scales::{self, ProjectionUnit};
use crate::tree::TreeBuilder;

#[derive(Debug, Clone)]
pub struct StateBuilder<R> {
    tree: TreeBuilder<R>,
    baseline: BaselineState,
    unit: ProjectionUnit,
}

impl<R: LayerResolver> StateBuilder<R> {
    pub fn new(tree: TreeBuilder<R>, baseline: BaselineState) -> Self {
        Self {
            tree,
            baseline,
            unit: ProjectionUnit::default(),
        }
    }

    /// Unit of the map projection, used for the scale list.
    #[must_use]
    pub fn with_unit(mut self, unit: ProjectionUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn baseline(&self) -> &BaselineState {
        &self.baseline
    }

    pub fn tree(&self) -> &TreeBuilder<R> {
        &self.tree
    }

    /// Build the application state for `context`.
    pub async fn build_state(
        &self,
        context: impl Into<Arc<ApplicationContext>>,
    ) -> Result<AppState, CoreError> {
        let context = context.into();

        let map_view = convert::map_view(context.client_config.map_view.as_ref())?;
        let root = convert::layer_tree(context.layer_tree.as_ref())?;

        let mut app_info = self.baseline.app_info.clone();
        if let Some(name) = context.name.as_deref().filter(|n| !n.is_empty()) {
            name.clone_into(&mut app_info.name);
        }

        let map_layers = self.tree.build_tree(&root).await?;
        let active_modules = union_modules(&self.baseline.active_modules, &context.tool_config);
        let map_scales = scales::compute_scales(&map_view.resolutions, self.unit);

        debug!(
            app = %app_info.name,
            layers = map_layers.leaf_count(),
            modules = active_modules.len(),
            "application state built"
        );

        Ok(AppState {
            app_info,
            map_view,
            map_layers,
            active_modules,
            default_topic: String::new(),
            map_scales,
            app_context: context,
        })
    }
}

/// Baseline modules first, then each new module once, in document order.
fn union_modules(baseline: &[ActiveModule], incoming: &[ActiveModule]) -> Vec<ActiveModule> {
    let mut out = baseline.to_vec();
    for module in incoming {
        if !out.contains(module) {
            out.push(module.clone());
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::DateTime;
    use geoclient_api::LayerDescriptor;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::layer::LayerFactory;
    use crate::model::{AppInfo, LayerEntry};
    use crate::resolver::StaticResolver;

    // ── Helpers ──────────────────────────────────────────────────────

    fn builder(baseline: BaselineState) -> StateBuilder<StaticResolver> {
        let descriptors: Vec<LayerDescriptor> = serde_json::from_value(json!([
            {
                "id": 1,
                "name": "Rivers",
                "type": "TILEWMS",
                "sourceConfig": {
                    "url": "https://maps.example/wms",
                    "layerNames": "hydro:rivers",
                    "attribution": "© Example"
                },
                "clientConfig": { "opacity": 0.5 }
            },
            {
                "id": 2,
                "name": "Parcels",
                "type": "WMS",
                "sourceConfig": { "layerNames": "cadastre:parcels" }
            }
        ]))
        .unwrap();
        let factory = LayerFactory::with_clock(Arc::new(|| {
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap()
        }));
        let tree = TreeBuilder::new(StaticResolver::from_descriptors(descriptors), factory);
        StateBuilder::new(tree, baseline)
    }

    fn context(value: serde_json::Value) -> ApplicationContext {
        serde_json::from_value(value).unwrap()
    }

    fn single_layer_context() -> ApplicationContext {
        context(json!({
            "name": "Demo",
            "clientConfig": {
                "mapView": {
                    "center": [0, 0],
                    "extent": [0, 0, 1, 1],
                    "projection": "3857",
                    "resolutions": [100, 50, 25],
                    "zoom": 0
                }
            },
            "layerTree": {
                "checked": true,
                "children": [ { "layerId": 1, "checked": true } ]
            },
            "toolConfig": []
        }))
    }

    // ── Scenarios ────────────────────────────────────────────────────

    #[tokio::test]
    async fn single_tiled_layer_scenario() {
        let state = builder(BaselineState::default())
            .build_state(single_layer_context())
            .await
            .unwrap();

        assert_eq!(state.app_info.name, "Demo");
        assert_eq!(state.default_topic, "");
        assert_eq!(state.map_view.projection, "EPSG:3857");
        assert_eq!(state.map_view.center, [0.0, 0.0]);
        assert_eq!(state.map_scales, Some(vec![89_300.0, 178_600.0, 357_100.0]));

        assert_eq!(state.map_layers.name, None);
        assert_eq!(state.map_layers.children.len(), 1);
        let LayerEntry::Layer(layer) = &state.map_layers.children[0] else {
            panic!("expected a layer");
        };
        assert!(layer.is_tiled());
        assert!(layer.visible);
        assert!((layer.opacity - 0.5).abs() < f64::EPSILON);
        assert_eq!(layer.source().params.layers.as_deref(), Some("hydro:rivers"));
        assert_eq!(layer.source().params.tiled, Some(true));
        assert!(layer.source().params.transparent);
        assert_eq!(layer.source().attribution.as_deref(), Some("© Example"));
    }

    #[tokio::test]
    async fn keeps_the_source_document() {
        let ctx = Arc::new(single_layer_context());
        let state = builder(BaselineState::default())
            .build_state(Arc::clone(&ctx))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&state.app_context, &ctx));
    }

    #[tokio::test]
    async fn empty_name_keeps_baseline() {
        let mut ctx = single_layer_context();
        ctx.name = Some(String::new());
        let baseline = BaselineState {
            app_info: AppInfo {
                name: "Portal".into(),
                version: "1.0".into(),
            },
            active_modules: vec![],
        };

        let state = builder(baseline).build_state(ctx).await.unwrap();
        assert_eq!(state.app_info.name, "Portal");
        assert_eq!(state.app_info.version, "1.0");
    }

    #[tokio::test]
    async fn prefixed_projection_is_kept() {
        let mut ctx = single_layer_context();
        ctx.client_config.map_view.as_mut().unwrap().projection =
            Some(geoclient_api::Projection::Name("EPSG:25832".into()));
        let state = builder(BaselineState::default())
            .build_state(ctx)
            .await
            .unwrap();
        assert_eq!(state.map_view.projection, "EPSG:25832");
    }

    #[tokio::test]
    async fn modules_are_unioned_without_duplicates() {
        let baseline = BaselineState {
            app_info: AppInfo::default(),
            active_modules: vec![ActiveModule::new("shogun-button-zoomin")],
        };
        let mut ctx = single_layer_context();
        ctx.tool_config = vec![
            ActiveModule::new("shogun-button-zoomout"),
            ActiveModule::new("shogun-button-zoomin"),
            ActiveModule::new("shogun-button-zoomout"),
        ];

        let state = builder(baseline).build_state(ctx).await.unwrap();
        let xtypes: Vec<&str> = state
            .active_modules
            .iter()
            .map(|m| m.xtype.as_str())
            .collect();
        assert_eq!(xtypes, vec!["shogun-button-zoomin", "shogun-button-zoomout"]);
    }

    #[tokio::test]
    async fn empty_resolutions_yield_no_scales() {
        let mut ctx = single_layer_context();
        ctx.client_config.map_view.as_mut().unwrap().resolutions = None;
        let state = builder(BaselineState::default())
            .build_state(ctx)
            .await
            .unwrap();
        assert_eq!(state.map_scales, None);
        assert!(state.map_view.resolutions.is_empty());
    }

    // ── Failures ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_layer_yields_no_state() {
        let mut ctx = single_layer_context();
        ctx.layer_tree = serde_json::from_value(json!({
            "checked": true,
            "children": [ { "layerId": 1, "checked": true }, { "layerId": 404, "checked": true } ]
        }))
        .unwrap();

        let err = builder(BaselineState::default())
            .build_state(ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::LayerNotFound { ref layer_id } if layer_id == "404"));
    }

    #[tokio::test]
    async fn missing_map_view_is_a_shape_error() {
        let mut ctx = single_layer_context();
        ctx.client_config.map_view = None;
        let err = builder(BaselineState::default())
            .build_state(ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ConfigShape { .. }));
    }
}
