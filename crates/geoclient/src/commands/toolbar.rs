//! `toolbar` command: the map tools derived from the active modules.

use tabled::Tabled;

use geoclient_core::{Catalog, MapSession, Tool, ToolBinding};

use crate::cli::{GlobalOpts, OutputFormat, ToolbarArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Tool")]
    tool: &'static str,
    #[tabled(rename = "Tooltip")]
    tooltip: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&ToolBinding> for ToolRow {
    fn from(b: &ToolBinding) -> Self {
        Self {
            key: b.key,
            tool: b.tool.label(),
            tooltip: output::or_dash(tooltip(&b.tool)),
            detail: detail(&b.tool),
        }
    }
}

fn tooltip(tool: &Tool) -> Option<&str> {
    match tool {
        Tool::Zoom { tooltip, .. }
        | Tool::Print { tooltip, .. }
        | Tool::FeatureInfo { tooltip, .. }
        | Tool::Measure { tooltip, .. }
        | Tool::MeasureMenu { tooltip, .. } => Some(tooltip.as_str()),
        Tool::ZoomToExtent { .. } => None,
    }
}

fn detail(tool: &Tool) -> String {
    match tool {
        Tool::Zoom { delta, .. } => format!("{delta:+}"),
        Tool::ZoomToExtent { center, zoom, .. } => {
            format!("{}, {} @ {zoom}", center[0], center[1])
        }
        Tool::Print {
            print_scales,
            config,
            ..
        } => match config {
            Some(config) => format!("{} scales via {}", print_scales.len(), config.print_action),
            None => "no print service".into(),
        },
        Tool::FeatureInfo {
            get_info_by_click: true,
            ..
        } => "click".into(),
        Tool::FeatureInfo { .. } => "hover".into(),
        Tool::Measure { measure_type, .. } => measure_type.clone(),
        Tool::MeasureMenu { measure_types, .. } if measure_types.is_empty() => "-".into(),
        Tool::MeasureMenu { measure_types, .. } => measure_types.join(", "),
    }
}

pub async fn handle(
    session: &MapSession,
    args: &ToolbarArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::load_state(session, &args.app).await?;

    let catalog = if let Some(ref path) = args.locale {
        Catalog::from_json(&util::read_json_file(path)?)
    } else if let Some(ref lang) = args.lang {
        session.catalog(lang).await?
    } else {
        Catalog::default()
    };

    let bindings = session.toolbar(&catalog, args.mobile)?;
    let mut out = output::render_list(
        &global.output,
        &bindings,
        |b| ToolRow::from(b),
        |b| format!("{}\t{}", b.key, b.tool.label()),
    );

    if matches!(global.output, OutputFormat::Table) && session.measure_tools_enabled()? {
        out.push_str("\nMeasure tools panel enabled");
    }
    output::print_output(&out, global.quiet);
    Ok(())
}
