//! Shared configuration for the geoclient CLI.
//!
//! TOML backend profiles, figment layering (defaults, file, environment)
//! and translation to `geoclient_core::ClientConfig`. The CLI adds
//! flag-aware overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use geoclient_api::ActiveModule;
use geoclient_core::{
    AppInfo, AppMode, BaselineState, ClientConfig, DEFAULT_LOCALE_PATH, ProjectionUnit,
    SiblingResolution, TlsVerification,
};

/// Prefix of environment overrides (`GEOCLIENT_DEFAULTS_TIMEOUT=60`).
pub const ENV_PREFIX: &str = "GEOCLIENT_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Resolve a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Resolve sibling layers concurrently.
    #[serde(default)]
    pub concurrent: bool,

    /// Application name used when a context carries none.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Modules every application starts with.
    #[serde(default)]
    pub default_modules: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            concurrent: false,
            app_name: default_app_name(),
            default_modules: Vec::new(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_app_name() -> String {
    AppInfo::default().name
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Application base URL (e.g., "https://gis.example/portal/").
    pub base_url: String,

    /// Backend flavour: "boot", "shogun2", or "static".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Local context document (overrides fetching from `base_url`).
    pub static_context: Option<PathBuf>,

    /// Local layer registry for static mode.
    pub static_layers: Option<PathBuf>,

    /// Message catalog template; `{{lng}}` is replaced by the language.
    #[serde(default = "default_locale_path")]
    pub locale_path: String,

    /// Projection unit for scale computation ("m", "ft", "us-ft", "degrees").
    pub projection_unit: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

fn default_mode() -> String {
    AppMode::default().to_string()
}
fn default_locale_path() -> String {
    DEFAULT_LOCALE_PATH.into()
}

impl Profile {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            mode: default_mode(),
            static_context: None,
            static_layers: None,
            locale_path: default_locale_path(),
            projection_unit: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "geoclient", "geoclient").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("geoclient");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to ClientConfig ─────────────────────────────────────

pub fn parse_mode(raw: &str) -> Result<AppMode, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "mode".into(),
        reason: format!("expected 'boot', 'shogun2', or 'static', got '{raw}'"),
    })
}

pub fn parse_unit(raw: &str) -> Result<ProjectionUnit, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "projection_unit".into(),
        reason: format!("expected 'm', 'ft', 'us-ft', 'degrees', or 'radians', got '{raw}'"),
    })
}

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let mode = parse_mode(&profile.mode)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let projection_unit = profile
        .projection_unit
        .as_deref()
        .map(parse_unit)
        .transpose()?
        .unwrap_or_default();

    let baseline = BaselineState {
        app_info: AppInfo {
            name: defaults.app_name.clone(),
            ..AppInfo::default()
        },
        active_modules: defaults
            .default_modules
            .iter()
            .map(ActiveModule::new)
            .collect(),
    };

    Ok(ClientConfig {
        base_url,
        mode,
        static_context: profile.static_context.clone(),
        static_layers: profile.static_layers.clone(),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        siblings: if defaults.concurrent {
            SiblingResolution::Concurrent
        } else {
            SiblingResolution::Sequential
        },
        baseline,
        projection_unit,
        locale_path: profile.locale_path.clone(),
    })
}
