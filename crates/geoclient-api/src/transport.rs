// HTTP transport for the map backend
//
// Context documents, layer descriptors and message catalogs all go through
// one `reqwest::Client`, so TLS trust and the request timeout are decided
// here once per session.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// Sent with every request so backend access logs can tell map clients apart.
const USER_AGENT: &str = concat!("geoclient/", env!("CARGO_PKG_VERSION"));

/// How the backend's certificate is checked.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Platform trust store. Public GIS portals need nothing else.
    #[default]
    System,
    /// Trust an additional PEM root, e.g. an intranet geoportal's CA.
    CustomCa(PathBuf),
    /// Skip verification entirely (`--insecure`).
    DangerAcceptInvalid,
}

/// Transport settings shared by every backend request.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Per-request timeout. A slow registry stalls the whole tree build,
    /// so this bounds each layer lookup as well as the context fetch.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_root(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("cannot set up backend client: {e}")))
    }
}

fn load_root(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA file {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}
