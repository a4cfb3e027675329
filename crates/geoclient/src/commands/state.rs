//! `state` command: the application state a context resolves to.

use std::fmt::Write;

use geoclient_core::{AppState, MapSession};

use crate::cli::{AppArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(state: &AppState) -> String {
    let view = &state.map_view;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Application:  {} ({})",
        state.app_info.name, state.app_info.version
    );
    let _ = writeln!(out, "Projection:   {}", view.projection);
    let _ = writeln!(out, "Center:       {}, {}", view.center[0], view.center[1]);
    let _ = writeln!(out, "Zoom:         {}", view.zoom);
    let _ = writeln!(
        out,
        "Extent:       {}, {}, {}, {}",
        view.extent[0], view.extent[1], view.extent[2], view.extent[3]
    );
    let _ = writeln!(
        out,
        "Layers:       {} ({} renderable)",
        state.map_layers.leaf_count(),
        state.map_layers.layers().len()
    );
    let scales = state.map_scales.as_deref().map_or_else(
        || "-".into(),
        |scales| {
            scales
                .iter()
                .map(|s| util::format_scale(*s))
                .collect::<Vec<_>>()
                .join(", ")
        },
    );
    let _ = writeln!(out, "Scales:       {scales}");
    let _ = write!(out, "Modules:");
    if state.active_modules.is_empty() {
        let _ = write!(out, "      -");
    }
    for module in &state.active_modules {
        let _ = write!(out, "\n  {}", module.xtype);
        if module.hidden {
            let _ = write!(out, " (hidden)");
        }
    }
    out
}

pub async fn handle(
    session: &MapSession,
    args: &AppArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let state = util::load_state(session, args).await?;
    let out = output::render_single(&global.output, state.as_ref(), detail, |s| {
        s.app_info.name.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
