// Backend HTTP client
//
// Wraps `reqwest::Client` with endpoint construction and response
// handling. The registry and context endpoints are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Where a backend serves its documents.
///
/// Collection URLs always end in `/` so identifiers can be joined onto
/// them; a document URL is fetched as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEndpoint {
    /// `GET {url}{id}`: one context per application id.
    Collection(Url),
    /// `GET {url}`: a single fixed document.
    Document(Url),
}

/// Resolved backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub context: ContextEndpoint,
    /// Layer registry collection; `None` when the backend has no registry.
    pub layers: Option<Url>,
}

impl Endpoints {
    /// Build endpoints from a base URL and relative paths.
    ///
    /// `context_path` is treated as a collection if it ends in `/`,
    /// otherwise as a single document.
    pub fn from_base(
        base: &Url,
        context_path: &str,
        layer_path: Option<&str>,
    ) -> Result<Self, Error> {
        let base = normalize_dir(base.clone());
        let context_url = base.join(context_path)?;
        let context = if context_path.ends_with('/') {
            ContextEndpoint::Collection(context_url)
        } else {
            ContextEndpoint::Document(context_url)
        };
        let layers = layer_path
            .map(|p| base.join(p).map(normalize_dir))
            .transpose()?;
        Ok(Self { context, layers })
    }
}

fn normalize_dir(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Address one member of a collection: `id` becomes a single
/// percent-encoded path segment, so `:` or `/` in it stay literal.
pub(crate) fn member_url(collection: &Url, id: &str) -> Result<Url, Error> {
    let mut url = collection.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .push(id);
    Ok(url)
}

/// Raw HTTP client for a SHOGun-style backend.
///
/// All methods return decoded payloads; status handling and
/// not-found mapping happen before the caller sees the response.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl BackendClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(endpoints: Endpoints, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, endpoints })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// The configured endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET and decode a JSON body.
    ///
    /// Returns `Ok(None)` on HTTP 404 so each endpoint can raise its own
    /// not-found variant.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body.chars().take(200).collect()
                },
            });
        }

        let body = resp.text().await?;
        decode(&body).map(Some)
    }
}

/// Decode a JSON body, keeping a preview of it in the error.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_relative_to_base_directory() {
        let base = Url::parse("https://gis.example/client").unwrap();
        let ep = Endpoints::from_base(&base, "applications/", Some("layers")).unwrap();

        assert_eq!(
            ep.context,
            ContextEndpoint::Collection(Url::parse("https://gis.example/client/applications/").unwrap())
        );
        assert_eq!(
            ep.layers.unwrap().as_str(),
            "https://gis.example/client/layers/"
        );
    }

    #[test]
    fn document_endpoint_without_trailing_slash() {
        let base = Url::parse("https://gis.example/").unwrap();
        let ep = Endpoints::from_base(&base, "resources/appContext.json", None).unwrap();

        assert!(matches!(ep.context, ContextEndpoint::Document(_)));
        assert!(ep.layers.is_none());
    }

    #[test]
    fn member_url_encodes_id_as_one_segment() {
        let layers = Url::parse("https://gis.example/client/layers/").unwrap();

        assert_eq!(
            member_url(&layers, "topp:states").unwrap().as_str(),
            "https://gis.example/client/layers/topp:states"
        );
        assert_eq!(
            member_url(&layers, "../applications/1").unwrap().as_str(),
            "https://gis.example/client/layers/..%2Fapplications%2F1"
        );
        assert_eq!(
            member_url(&layers, "7").unwrap().as_str(),
            "https://gis.example/client/layers/7"
        );
    }
}
