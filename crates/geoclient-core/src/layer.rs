// ── Layer factory ──
//
// Turns one registry descriptor into one renderable layer. Only tiled
// and single-image WMS are rendered; other types are reported and
// left as empty slots by the caller.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use geoclient_api::{LayerDescriptor, LayerType, SourceConfig};

use crate::model::{LayerKind, LayerMetadata, RenderableLayer, WmsParams, WmsSource};
use crate::timefmt;

/// Source of "now" for `TIME` parameters.
pub type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

#[derive(Clone)]
pub struct LayerFactory {
    clock: Clock,
}

impl fmt::Debug for LayerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerFactory").finish_non_exhaustive()
    }
}

impl Default for LayerFactory {
    fn default() -> Self {
        Self::with_clock(Arc::new(timefmt::local_now))
    }
}

impl LayerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed or custom clock for `TIME` parameters.
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    /// Build the renderable layer for `descriptor`.
    ///
    /// Returns `None` (after a warning) for types this client does not render.
    pub fn build_layer(&self, descriptor: &LayerDescriptor) -> Option<RenderableLayer> {
        match descriptor.layer_type {
            LayerType::TileWms => Some(self.tile_layer(descriptor)),
            LayerType::ImageWms => Some(image_layer(descriptor)),
            LayerType::Wmts | LayerType::WmsTime | LayerType::Other(_) => {
                warn!(
                    layer = %descriptor.name,
                    layer_type = %descriptor.layer_type,
                    "unsupported layer type, only TILEWMS and WMS layers are rendered"
                );
                None
            }
        }
    }

    fn tile_layer(&self, descriptor: &LayerDescriptor) -> RenderableLayer {
        let source = &descriptor.source_config;
        let time_format = source.time_format();
        let time_enabled = source.is_time_enabled();

        let time = if time_enabled {
            timefmt::format_instant(&(self.clock)(), time_format)
        } else {
            None
        };

        let wms = WmsSource {
            url: source.url.clone(),
            params: WmsParams {
                layers: source.layer_names.clone(),
                tiled: Some(source.request_with_tiled),
                transparent: source.transparent,
                time,
            },
            attribution: source.attribution.clone(),
            cross_origin: source.cross_origin.clone(),
        };

        let layer_type = source
            .source_type
            .clone()
            .unwrap_or_else(|| descriptor.layer_type.to_string());

        let mut metadata = metadata(descriptor, layer_type);
        metadata.time_format = Some(time_format.to_owned());
        if time_enabled {
            metadata.start_date = format_bound(source, source.start_date.as_deref(), "startDate");
            metadata.end_date = format_bound(source, source.end_date.as_deref(), "endDate");
        }

        RenderableLayer {
            kind: LayerKind::Tile(wms),
            visible: true,
            opacity: descriptor.client_config.opacity,
            metadata,
        }
    }
}

fn image_layer(descriptor: &LayerDescriptor) -> RenderableLayer {
    let source = &descriptor.source_config;

    let wms = WmsSource {
        url: source.url.clone(),
        params: WmsParams {
            layers: source.layer_names.clone(),
            tiled: None,
            transparent: true,
            time: None,
        },
        attribution: source.attribution.clone(),
        cross_origin: source
            .cross_origin
            .clone()
            .or_else(|| descriptor.client_config.cross_origin.clone()),
    };

    RenderableLayer {
        kind: LayerKind::Image(wms),
        visible: true,
        opacity: descriptor.client_config.opacity,
        metadata: metadata(descriptor, descriptor.layer_type.to_string()),
    }
}

fn metadata(descriptor: &LayerDescriptor, layer_type: String) -> LayerMetadata {
    LayerMetadata {
        name: descriptor.name.clone(),
        hoverable: descriptor.client_config.hoverable,
        hover_template: descriptor.client_config.hover_template.clone(),
        layer_type,
        legend_url: descriptor.source_config.legend_url.clone(),
        time_format: None,
        start_date: None,
        end_date: None,
    }
}

/// Format a date bound; absent bounds stay absent.
fn format_bound(source: &SourceConfig, raw: Option<&str>, field: &str) -> Option<String> {
    let raw = raw?;
    let Some(date) = timefmt::parse_date(raw) else {
        warn!(field, value = raw, "unparseable date bound ignored");
        return None;
    };
    timefmt::format_instant(&date, source.time_format())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixed_factory() -> LayerFactory {
        LayerFactory::with_clock(Arc::new(|| {
            DateTime::parse_from_rfc3339("2024-02-29T10:15:00+00:00").unwrap()
        }))
    }

    fn descriptor(value: serde_json::Value) -> LayerDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn tile_layer_params_and_metadata() {
        let d = descriptor(json!({
            "name": "Rivers",
            "type": "TILEWMS",
            "sourceConfig": {
                "url": "https://maps.example/wms",
                "layerNames": "hydro:rivers",
                "attribution": "© Example",
                "crossOrigin": "anonymous",
                "legendUrl": "https://maps.example/legend.png"
            },
            "clientConfig": { "opacity": 0.75, "hoverable": true, "hoverTemplate": "{{name}}" }
        }));

        let layer = fixed_factory().build_layer(&d).unwrap();

        assert!(layer.is_tiled());
        assert!(layer.visible);
        assert!((layer.opacity - 0.75).abs() < f64::EPSILON);
        let source = layer.source();
        assert_eq!(source.url.as_deref(), Some("https://maps.example/wms"));
        assert_eq!(
            source.params,
            WmsParams {
                layers: Some("hydro:rivers".into()),
                tiled: Some(true),
                transparent: true,
                time: None,
            }
        );
        assert_eq!(source.cross_origin.as_deref(), Some("anonymous"));
        assert_eq!(layer.metadata.name, "Rivers");
        assert!(layer.metadata.hoverable);
        assert_eq!(layer.metadata.layer_type, "TILEWMS");
        assert_eq!(
            layer.metadata.legend_url.as_deref(),
            Some("https://maps.example/legend.png")
        );
        assert_eq!(layer.metadata.time_format.as_deref(), Some("YYYY-MM-DD"));
        assert_eq!(layer.metadata.start_date, None);
    }

    #[test]
    fn tile_layer_honours_explicit_flags() {
        let d = descriptor(json!({
            "name": "Base",
            "type": "TILEWMS",
            "sourceConfig": { "transparent": false, "requestWithTiled": false }
        }));

        let layer = fixed_factory().build_layer(&d).unwrap();
        assert_eq!(layer.source().params.tiled, Some(false));
        assert!(!layer.source().params.transparent);
    }

    #[test]
    fn time_enabled_tile_layer_stamps_time_and_bounds() {
        let d = descriptor(json!({
            "name": "Precipitation",
            "type": "TILEWMS",
            "sourceConfig": {
                "type": "WMSTime",
                "layerNames": "weather:rain",
                "timeFormat": "DD.MM.YYYY",
                "startDate": "2020-01-15",
                "endDate": null
            }
        }));

        let layer = fixed_factory().build_layer(&d).unwrap();

        assert_eq!(layer.source().params.time.as_deref(), Some("29.02.2024"));
        assert_eq!(layer.metadata.layer_type, "WMSTime");
        assert_eq!(layer.metadata.time_format.as_deref(), Some("DD.MM.YYYY"));
        assert_eq!(layer.metadata.start_date.as_deref(), Some("15.01.2020"));
        assert_eq!(layer.metadata.end_date, None);
    }

    #[test]
    fn time_enabled_default_format() {
        let d = descriptor(json!({
            "name": "Snow",
            "type": "TILEWMS",
            "sourceConfig": { "type": "WMSTime", "endDate": "2021-12-31T00:00:00Z" }
        }));

        let layer = fixed_factory().build_layer(&d).unwrap();
        assert_eq!(layer.source().params.time.as_deref(), Some("2024-02-29"));
        assert_eq!(layer.metadata.start_date, None);
        assert_eq!(layer.metadata.end_date.as_deref(), Some("2021-12-31"));
    }

    #[test]
    fn image_layer_forces_transparency() {
        let d = descriptor(json!({
            "name": "Parcels",
            "type": "WMS",
            "sourceConfig": {
                "url": "https://maps.example/wms",
                "layerNames": "cadastre:parcels",
                "transparent": false
            },
            "clientConfig": { "crossOrigin": "use-credentials" }
        }));

        let layer = fixed_factory().build_layer(&d).unwrap();

        assert!(!layer.is_tiled());
        assert!(layer.source().params.transparent);
        assert_eq!(layer.source().params.tiled, None);
        assert_eq!(layer.source().cross_origin.as_deref(), Some("use-credentials"));
        assert_eq!(layer.metadata.layer_type, "WMS");
        assert_eq!(layer.metadata.time_format, None);
    }

    #[test]
    fn unsupported_types_yield_none() {
        for tag in ["WMTS", "WMSTime", "VectorTile", "TileWMS", "ImageWMS"] {
            let d = descriptor(json!({ "name": "x", "type": tag }));
            assert!(fixed_factory().build_layer(&d).is_none(), "{tag} should be skipped");
        }
    }

    #[test]
    fn serialized_metadata_uses_renderer_field_names() {
        let d = descriptor(json!({
            "name": "Roads",
            "type": "WMS",
            "sourceConfig": { "legendUrl": "l.png" },
            "clientConfig": { "hoverTemplate": "t" }
        }));
        let layer = fixed_factory().build_layer(&d).unwrap();
        let value = serde_json::to_value(&layer).unwrap();

        assert_eq!(value["name"], json!("Roads"));
        assert_eq!(value["legendUrl"], json!("l.png"));
        assert_eq!(value["hoverTemplate"], json!("t"));
        assert_eq!(value["type"], json!("WMS"));
        assert_eq!(value["kind"]["kind"], json!("image"));
        assert_eq!(value["kind"]["source"]["params"]["TRANSPARENT"], json!(true));
    }
}
