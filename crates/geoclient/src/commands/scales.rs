//! `scales` command: resolutions to display scales, offline.

use serde::Serialize;
use tabled::Tabled;

use geoclient_core::{ProjectionUnit, compute_scales};

use crate::cli::{GlobalOpts, ScalesArgs};
use crate::config::parse_unit;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct ScaleEntry {
    resolution: f64,
    scale: f64,
}

#[derive(Tabled)]
struct ScaleRow {
    #[tabled(rename = "Resolution")]
    resolution: f64,
    #[tabled(rename = "Scale")]
    scale: String,
}

impl From<&ScaleEntry> for ScaleRow {
    fn from(e: &ScaleEntry) -> Self {
        Self {
            resolution: e.resolution,
            scale: util::format_scale(e.scale),
        }
    }
}

pub fn handle(args: &ScalesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let unit = match global.unit {
        Some(ref raw) => parse_unit(raw)?,
        None => ProjectionUnit::default(),
    };

    // Scales come back most zoomed-in first.
    let scales = compute_scales(&args.resolutions, unit).unwrap_or_default();
    let entries: Vec<ScaleEntry> = args
        .resolutions
        .iter()
        .rev()
        .zip(scales)
        .map(|(&resolution, scale)| ScaleEntry { resolution, scale })
        .collect();

    let out = output::render_list(&global.output, &entries, |e| ScaleRow::from(e), |e| {
        e.scale.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
