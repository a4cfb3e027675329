//! Config subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Profiles listing ────────────────────────────────────────────────

#[derive(Serialize)]
struct ProfileEntry {
    name: String,
    default: bool,
    base_url: String,
    mode: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Base URL")]
    base_url: String,
    #[tabled(rename = "Mode")]
    mode: String,
}

impl From<&ProfileEntry> for ProfileRow {
    fn from(p: &ProfileEntry) -> Self {
        Self {
            marker: if p.default { "*" } else { "" },
            name: p.name.clone(),
            base_url: p.base_url.clone(),
            mode: p.mode.clone(),
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn to_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unserializable config: {e}"))
}

/// Build a profile from the global flags.
fn profile_from_flags(global: &GlobalOpts) -> Result<Profile, CliError> {
    let Some(base_url) = global.base_url.clone().or_else(|| {
        global
            .file
            .as_ref()
            .map(|_| "http://localhost:8080/".to_owned())
    }) else {
        return Err(CliError::Validation {
            field: "base-url".into(),
            reason: "config init needs --base-url (or --file for a local document)".into(),
        });
    };

    let mut profile = Profile::new(base_url);
    if let Some(mode) = global.mode {
        profile.mode = mode.as_str().into();
    }
    profile.static_context.clone_from(&global.file);
    profile.static_layers.clone_from(&global.layers);
    profile.projection_unit.clone_from(&global.unit);
    if global.insecure {
        profile.insecure = Some(true);
    }
    profile.timeout = global.timeout;
    Ok(profile)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let mut cfg = config::load_config_or_default();
            let name = global.profile.clone().unwrap_or_else(|| "default".into());
            let profile = profile_from_flags(global)?;

            // Reject profiles that would fail on first use.
            config::profile_to_client_config(&profile, &cfg.defaults)?;

            cfg.profiles.insert(name.clone(), profile);
            if cfg
                .default_profile
                .as_ref()
                .is_none_or(|d| !cfg.profiles.contains_key(d))
            {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!(
                    "Profile '{name}' saved to {}",
                    config::config_path().display()
                );
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, to_toml, to_toml);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = config::active_profile_name(global, &cfg);
            let entries: Vec<ProfileEntry> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileEntry {
                    name: name.clone(),
                    default: *name == default,
                    base_url: p.base_url.clone(),
                    mode: p.mode.clone(),
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &entries,
                |p| ProfileRow::from(p),
                |p| p.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { ref name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(name) {
                return Err(CliError::ProfileNotFound {
                    name: name.clone(),
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
