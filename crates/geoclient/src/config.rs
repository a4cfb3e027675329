//! CLI configuration: thin wrapper around `geoclient_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --mode, --file, ...).

use std::time::Duration;

use geoclient_core::{ClientConfig, SiblingResolution, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use geoclient_config::{
    Config, Profile, config_path, load_config_or_default, parse_mode, parse_unit,
    profile_to_client_config, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let mut client = if let Some(profile) = cfg.profiles.get(&name) {
        profile_to_client_config(profile, &cfg.defaults)?
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            available: available_profiles(&cfg),
            name,
        });
    } else if global.base_url.is_some() || global.file.is_some() {
        // No profile: flags alone describe the backend.
        let base = global.base_url.as_deref().unwrap_or("http://localhost:8080/");
        profile_to_client_config(&Profile::new(base), &cfg.defaults)?
    } else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    apply_overrides(&mut client, global)?;
    Ok(client)
}

/// Apply flag overrides on top of a profile-derived config.
pub fn apply_overrides(client: &mut ClientConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref raw) = global.base_url {
        client.base_url = raw.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    if let Some(mode) = global.mode {
        client.mode = parse_mode(mode.as_str())?;
    }
    if let Some(ref file) = global.file {
        client.static_context = Some(file.clone());
    }
    if let Some(ref layers) = global.layers {
        client.static_layers = Some(layers.clone());
    }
    if let Some(ref unit) = global.unit {
        client.projection_unit = parse_unit(unit)?;
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    if global.concurrent {
        client.siblings = SiblingResolution::Concurrent;
    }
    Ok(())
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
