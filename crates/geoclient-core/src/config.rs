// ── Runtime client configuration ──
//
// Describes which backend to talk to and how. Built by the CLI from
// the on-disk config; core never reads files or environment itself.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use geoclient_api::{Endpoints, TlsMode, TransportConfig};

use crate::error::CoreError;
use crate::model::BaselineState;
use crate::scales::ProjectionUnit;
use crate::tree::SiblingResolution;

// ── AppMode ──────────────────────────────────────────────────────

/// Backend flavour, selected once at startup.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppMode {
    /// SHOGun boot: `applications/{id}` and `layers/{id}`.
    #[default]
    Boot,
    /// SHOGun2: `rest/projectapps/{id}` and `rest/layers/{id}`.
    Shogun2,
    /// A fixed context document without a layer registry.
    Static,
}

impl AppMode {
    pub fn context_path(self) -> &'static str {
        match self {
            Self::Boot => "applications/",
            Self::Shogun2 => "rest/projectapps/",
            Self::Static => "resources/appContext.json",
        }
    }

    pub fn layer_path(self) -> Option<&'static str> {
        match self {
            Self::Boot => Some("layers/"),
            Self::Shogun2 => Some("rest/layers/"),
            Self::Static => None,
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

// ── PrintConfig ──────────────────────────────────────────────────

/// Print service actions of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintConfig {
    pub print_action: Url,
    pub create_url_action: Url,
    pub print_url_action: Url,
    pub result_action: Url,
}

impl PrintConfig {
    /// Derive the print actions from the application base URL.
    pub fn from_base(base: &Url) -> Result<Self, CoreError> {
        let base = base_dir(base);
        let join = |path: &str| {
            base.join(path).map_err(|e| CoreError::Config {
                message: format!("invalid print URL {path}: {e}"),
            })
        };
        Ok(Self {
            print_action: join("print/print")?,
            create_url_action: join("print/createUrl.action")?,
            print_url_action: join("print/doPrint.action")?,
            result_action: join("print/getPrintResult.action")?,
        })
    }
}

fn base_dir(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base
}

/// Default message catalog location, relative to the application.
pub const DEFAULT_LOCALE_PATH: &str = "resources/i18n/{{lng}}.json";

// ── ClientConfig ─────────────────────────────────────────────────

/// Configuration for one map session.
///
/// Built by the CLI and handed in; every default here is the one a
/// freshly initialised config file would carry.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application base URL (e.g., `https://gis.example/portal/`).
    pub base_url: Url,
    pub mode: AppMode,
    /// Local context document, read instead of `base_url` when set.
    pub static_context: Option<PathBuf>,
    /// Local layer registry (JSON array of descriptors) for static mode.
    pub static_layers: Option<PathBuf>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub siblings: SiblingResolution,
    pub baseline: BaselineState,
    pub projection_unit: ProjectionUnit,
    /// Message catalog template; `{{lng}}` is replaced by the language.
    pub locale_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8080/").expect("default base URL is valid"),
            mode: AppMode::default(),
            static_context: None,
            static_layers: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            siblings: SiblingResolution::default(),
            baseline: BaselineState::default(),
            projection_unit: ProjectionUnit::default(),
            locale_path: DEFAULT_LOCALE_PATH.into(),
        }
    }
}

impl ClientConfig {
    /// Backend endpoints for the configured mode.
    pub fn endpoints(&self) -> Result<Endpoints, CoreError> {
        Ok(Endpoints::from_base(
            &self.base_url,
            self.mode.context_path(),
            self.mode.layer_path(),
        )?)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }

    pub fn print_config(&self) -> Result<PrintConfig, CoreError> {
        PrintConfig::from_base(&self.base_url)
    }

    /// Catalog path for `language`, relative to the application.
    pub fn locale_for(&self, language: &str) -> String {
        self.locale_path.replace("{{lng}}", language)
    }

    pub fn locale_url(&self, language: &str) -> Result<Url, CoreError> {
        let relative = self.locale_for(language);
        base_dir(&self.base_url)
            .join(&relative)
            .map_err(|e| CoreError::Config {
                message: format!("invalid locale path {relative}: {e}"),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geoclient_api::ContextEndpoint;

    use super::*;

    fn config(base: &str, mode: AppMode) -> ClientConfig {
        ClientConfig {
            base_url: Url::parse(base).unwrap(),
            mode,
            ..ClientConfig::default()
        }
    }

    #[test]
    fn boot_paths() {
        let endpoints = config("https://gis.example/portal/", AppMode::Boot)
            .endpoints()
            .unwrap();
        assert_eq!(
            endpoints.context,
            ContextEndpoint::Collection(
                Url::parse("https://gis.example/portal/applications/").unwrap()
            )
        );
        assert_eq!(
            endpoints.layers.unwrap().as_str(),
            "https://gis.example/portal/layers/"
        );
    }

    #[test]
    fn shogun2_paths() {
        let endpoints = config("https://gis.example/portal", AppMode::Shogun2)
            .endpoints()
            .unwrap();
        assert_eq!(
            endpoints.context,
            ContextEndpoint::Collection(
                Url::parse("https://gis.example/portal/rest/projectapps/").unwrap()
            )
        );
        assert_eq!(
            endpoints.layers.unwrap().as_str(),
            "https://gis.example/portal/rest/layers/"
        );
    }

    #[test]
    fn static_mode_has_no_registry() {
        let endpoints = config("https://gis.example/", AppMode::Static)
            .endpoints()
            .unwrap();
        assert_eq!(
            endpoints.context,
            ContextEndpoint::Document(
                Url::parse("https://gis.example/resources/appContext.json").unwrap()
            )
        );
        assert!(endpoints.layers.is_none());
    }

    #[test]
    fn print_actions_hang_off_base() {
        let print = config("https://gis.example/portal/", AppMode::Boot)
            .print_config()
            .unwrap();
        assert_eq!(
            print.print_action.as_str(),
            "https://gis.example/portal/print/print"
        );
        assert_eq!(
            print.result_action.as_str(),
            "https://gis.example/portal/print/getPrintResult.action"
        );
    }

    #[test]
    fn locale_url_substitutes_language() {
        let cfg = config("https://gis.example/portal", AppMode::Boot);
        assert_eq!(cfg.locale_for("de"), "resources/i18n/de.json");
        assert_eq!(
            cfg.locale_url("en").unwrap().as_str(),
            "https://gis.example/portal/resources/i18n/en.json"
        );
    }

    #[test]
    fn mode_strings() {
        assert_eq!("shogun2".parse::<AppMode>().unwrap(), AppMode::Shogun2);
        assert_eq!(AppMode::Static.to_string(), "static");
        assert!("legacy".parse::<AppMode>().is_err());
    }
}
