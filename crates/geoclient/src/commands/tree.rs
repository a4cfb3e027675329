//! `tree` command: the resolved layer tree, nested or flat.

use std::fmt::Write;

use owo_colors::OwoColorize;
use tabled::Tabled;

use geoclient_core::{LayerEntry, LayerGroup, LayerKind, MapSession, RenderableLayer};

use crate::cli::{GlobalOpts, TreeArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Type")]
    layer_type: String,
    #[tabled(rename = "Visible")]
    visible: bool,
    #[tabled(rename = "Opacity")]
    opacity: f64,
    #[tabled(rename = "WMS Layers")]
    wms_layers: String,
    #[tabled(rename = "Time")]
    time: String,
}

impl From<&&RenderableLayer> for LayerRow {
    fn from(layer: &&RenderableLayer) -> Self {
        let source = layer.source();
        Self {
            name: layer.name().to_owned(),
            kind: kind_label(&layer.kind),
            layer_type: layer.metadata.layer_type.clone(),
            visible: layer.visible,
            opacity: layer.opacity,
            wms_layers: output::or_dash(source.params.layers.as_deref()),
            time: output::or_dash(source.params.time.as_deref()),
        }
    }
}

fn kind_label(kind: &LayerKind) -> &'static str {
    match kind {
        LayerKind::Tile(_) => "tile",
        LayerKind::Image(_) => "image",
    }
}

// ── Nested rendering ────────────────────────────────────────────────

fn render_tree(root: &LayerGroup, color: bool) -> String {
    let mut out = String::new();
    write_group(&mut out, root, 0, color);
    out.trim_end().to_owned()
}

fn write_group(out: &mut String, group: &LayerGroup, depth: usize, color: bool) {
    let indent = "  ".repeat(depth);
    for entry in &group.children {
        match entry {
            LayerEntry::Group(child) => {
                let name = child.name.as_deref().unwrap_or("(unnamed)");
                let label = if color {
                    name.bold().to_string()
                } else {
                    name.to_owned()
                };
                let _ = writeln!(out, "{indent}{label}/{}", hidden_suffix(child.visible));
                write_group(out, child, depth + 1, color);
            }
            LayerEntry::Layer(layer) => {
                let _ = writeln!(
                    out,
                    "{indent}{} [{}]{}",
                    layer.name(),
                    kind_label(&layer.kind),
                    hidden_suffix(layer.visible)
                );
            }
            LayerEntry::Unsupported { layer_type } => {
                let line = format!("{indent}<unsupported {layer_type}>");
                if color {
                    let _ = writeln!(out, "{}", line.dimmed());
                } else {
                    let _ = writeln!(out, "{line}");
                }
            }
        }
    }
}

fn hidden_suffix(visible: bool) -> &'static str {
    if visible { "" } else { " (hidden)" }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &MapSession,
    args: &TreeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let state = util::load_state(session, &args.app).await?;

    let out = if args.flat {
        let layers = state.map_layers.layers();
        output::render_list(
            &global.output,
            &layers,
            |l| LayerRow::from(l),
            |l| l.name().to_owned(),
        )
    } else {
        let color = output::should_color(&global.color);
        output::render_single(
            &global.output,
            &state.map_layers,
            |g| render_tree(g, color),
            |g| render_tree(g, false),
        )
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
