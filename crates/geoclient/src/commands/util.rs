//! Shared helpers for command handlers.

use std::path::Path;
use std::sync::Arc;

use geoclient_core::{AppMode, AppState, ClientConfig, MapSession};

use crate::cli::AppArgs;
use crate::error::CliError;

/// Id used for fixed documents, which ignore it.
const STATIC_APP_ID: &str = "static";

/// The application id to load. Fixed documents need none.
pub fn app_id(args: &AppArgs, config: &ClientConfig) -> Result<String, CliError> {
    if let Some(ref id) = args.app {
        return Ok(id.clone());
    }
    if config.static_context.is_some() || config.mode == AppMode::Static {
        return Ok(STATIC_APP_ID.into());
    }
    Err(CliError::Validation {
        field: "app".into(),
        reason: "an application id is required unless the context is read with --file \
                 or --mode static"
            .into(),
    })
}

/// Load the requested application and return the installed state.
pub async fn load_state(session: &MapSession, args: &AppArgs) -> Result<Arc<AppState>, CliError> {
    let id = app_id(args, session.config())?;
    tracing::debug!(app = %id, "loading application");
    let outcome = session.load(&id).await?;
    outcome
        .installed()
        .cloned()
        .ok_or_else(|| CliError::Internal("load was superseded".into()))
}

/// Read and parse a local JSON file.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Format a scale denominator as `1:n`.
pub fn format_scale(scale: f64) -> String {
    format!("1:{scale}")
}
