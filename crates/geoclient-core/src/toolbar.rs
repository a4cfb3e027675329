// ── Toolbar assembly ──
//
// Routes active modules onto the fixed set of map tools. Each tool
// category owns one key; a later module of the same category replaces
// an earlier one. The result is ordered by key, not by document order.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::Serialize;
use strum::EnumString;
use tracing::debug;

use geoclient_api::ActiveModule;

use crate::config::PrintConfig;
use crate::model::AppState;

const MEASURE_PANEL_XTYPES: &[&str] = &[
    "show-measure-tools-panel",
    "shogun-button-showmeasuretoolspanel",
];

// ── Module types ─────────────────────────────────────────────────

/// Toolbar-relevant module types, keyed by `xtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
pub enum ModuleType {
    #[strum(serialize = "basigx-button-zoomin", serialize = "shogun-button-zoomin")]
    ZoomIn,
    #[strum(serialize = "basigx-button-zoomout", serialize = "shogun-button-zoomout")]
    ZoomOut,
    #[strum(serialize = "shogun-button-zoomtoextent")]
    ZoomToExtent,
    #[strum(serialize = "shogun-button-print")]
    Print,
    #[strum(serialize = "basigx-button-hsi", serialize = "shogun-button-hsi")]
    FeatureInfo,
    #[strum(serialize = "shogun-button-measure-menu")]
    Measure,
}

impl ModuleType {
    /// Stable presentation key of the tool category.
    pub fn key(self) -> &'static str {
        match self {
            Self::ZoomIn => "1",
            Self::ZoomOut => "2",
            Self::ZoomToExtent => "3",
            Self::Print => "4",
            Self::FeatureInfo => "5",
            Self::Measure => "6",
        }
    }
}

// ── Tools ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tool", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Tool {
    Zoom {
        delta: i8,
        icon: &'static str,
        tooltip: String,
    },
    ZoomToExtent {
        center: [f64; 2],
        zoom: f64,
        icon: &'static str,
    },
    Print {
        print_scales: Vec<f64>,
        config: Option<PrintConfig>,
        icon: &'static str,
        tooltip: String,
    },
    FeatureInfo {
        get_info_by_click: bool,
        tooltip: String,
    },
    Measure {
        measure_type: String,
        show_measure_info_on_clicked_points: bool,
        tooltip: String,
    },
    MeasureMenu {
        measure_types: Vec<String>,
        tooltip: String,
    },
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zoom { delta, .. } if *delta < 0 => "zoom out",
            Self::Zoom { .. } => "zoom in",
            Self::ZoomToExtent { .. } => "zoom to extent",
            Self::Print { .. } => "print",
            Self::FeatureInfo { .. } => "feature info",
            Self::Measure { .. } => "measure",
            Self::MeasureMenu { .. } => "measure menu",
        }
    }

    /// A print tool without a print service renders as an empty slot.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, Self::Print { config: None, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolBinding {
    pub key: &'static str,
    #[serde(flatten)]
    pub tool: Tool,
}

/// Map facts the tools are parameterised with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapToolContext {
    pub center: [f64; 2],
    pub zoom: f64,
    pub print_scales: Vec<f64>,
    /// Feature info switches to click mode on touch devices.
    pub mobile: bool,
}

impl MapToolContext {
    pub fn from_state(state: &AppState, mobile: bool) -> Self {
        Self {
            center: state.map_view.center,
            zoom: state.map_view.zoom,
            print_scales: state.map_scales.clone().unwrap_or_default(),
            mobile,
        }
    }
}

// ── Translation ──────────────────────────────────────────────────

/// Lookup of user-facing strings by message key.
pub trait Translate {
    fn translate(&self, key: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Message catalog loaded from an i18n JSON document.
///
/// Nested objects are flattened into dotted keys; unknown keys translate
/// to themselves.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn from_json(document: &serde_json::Value) -> Self {
        let mut messages = HashMap::new();
        flatten_messages(document, String::new(), &mut messages);
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn flatten_messages(value: &serde_json::Value, prefix: String, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_messages(child, path, out);
            }
        }
        serde_json::Value::String(text) => {
            out.insert(prefix, text.clone());
        }
        _ => {}
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

// ── Assembly ─────────────────────────────────────────────────────

/// Build the toolbar for `modules`, ordered by key.
pub fn build_toolbar(
    modules: &[ActiveModule],
    map: &MapToolContext,
    translate: &dyn Translate,
    print: Option<&PrintConfig>,
) -> Vec<ToolBinding> {
    let mut slots: BTreeMap<&'static str, Tool> = BTreeMap::new();

    for module in modules.iter().filter(|m| !m.hidden) {
        let Ok(module_type) = ModuleType::from_str(&module.xtype) else {
            debug!(xtype = %module.xtype, "no toolbar tool for module");
            continue;
        };
        let tool = build_tool(module_type, module, map, translate, print);
        slots.insert(module_type.key(), tool);
    }

    slots
        .into_iter()
        .map(|(key, tool)| ToolBinding { key, tool })
        .collect()
}

fn build_tool(
    module_type: ModuleType,
    module: &ActiveModule,
    map: &MapToolContext,
    translate: &dyn Translate,
    print: Option<&PrintConfig>,
) -> Tool {
    match module_type {
        ModuleType::ZoomIn => Tool::Zoom {
            delta: 1,
            icon: "fas fa-plus",
            tooltip: translate.translate("ZoomIn.tooltip"),
        },
        ModuleType::ZoomOut => Tool::Zoom {
            delta: -1,
            icon: "fas fa-minus",
            tooltip: translate.translate("ZoomOut.tooltip"),
        },
        ModuleType::ZoomToExtent => Tool::ZoomToExtent {
            center: map.center,
            zoom: map.zoom,
            icon: "fas fa-expand",
        },
        ModuleType::Print => Tool::Print {
            print_scales: map.print_scales.clone(),
            config: print.cloned(),
            icon: "fas fa-print",
            tooltip: translate.translate("PrintPanel.windowTitle"),
        },
        ModuleType::FeatureInfo => Tool::FeatureInfo {
            get_info_by_click: map.mobile,
            tooltip: translate.translate("FeatureInfo.tooltip"),
        },
        ModuleType::Measure => {
            let tooltip = translate.translate("FeatureInfo.tooltip");
            let mut types = measure_types(module);
            if types.len() == 1 {
                Tool::Measure {
                    measure_type: types.remove(0),
                    show_measure_info_on_clicked_points: true,
                    tooltip,
                }
            } else {
                Tool::MeasureMenu {
                    measure_types: types,
                    tooltip,
                }
            }
        }
    }
}

fn measure_types(module: &ActiveModule) -> Vec<String> {
    module
        .properties
        .get("measureTypes")
        .and_then(serde_json::Value::as_array)
        .map(|types| {
            types
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the measure tools panel is switched on.
pub fn measure_tools_enabled(modules: &[ActiveModule]) -> bool {
    modules
        .iter()
        .any(|m| MEASURE_PANEL_XTYPES.contains(&m.xtype.as_str()))
}
