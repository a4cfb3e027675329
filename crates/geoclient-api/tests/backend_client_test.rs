#![allow(clippy::unwrap_used)]
// Integration tests for `BackendClient` using wiremock.

use std::io::Write;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use geoclient_api::{
    BackendClient, Endpoints, Error, LayerId, LayerType, Projection, read_context_file,
    read_layers_file, read_messages_file,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BackendClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let endpoints = Endpoints::from_base(&base, "applications/", Some("layers/")).unwrap();
    let client = BackendClient::with_client(reqwest::Client::new(), endpoints);
    (server, client)
}

// ── Layer registry ──────────────────────────────────────────────────

#[tokio::test]
async fn test_find_layer() {
    let (server, client) = setup().await;

    let body = json!({
        "id": 7,
        "name": "Roads",
        "type": "TILEWMS",
        "sourceConfig": {
            "url": "https://maps.example/geoserver/wms",
            "layerNames": "osm:roads",
            "requestWithTiled": false,
            "legendUrl": "https://maps.example/legend/roads.png"
        },
        "clientConfig": { "opacity": 0.5, "hoverable": true, "hoverTemplate": "{{name}}" }
    });

    Mock::given(method("GET"))
        .and(path("/layers/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let layer = client.find_layer(&LayerId::Numeric(7)).await.unwrap();

    assert_eq!(layer.name, "Roads");
    assert_eq!(layer.layer_type, LayerType::TileWms);
    assert_eq!(layer.source_config.layer_names.as_deref(), Some("osm:roads"));
    assert!(!layer.source_config.request_with_tiled);
    assert!(layer.source_config.transparent);
    assert!((layer.client_config.opacity - 0.5).abs() < f64::EPSILON);
    assert_eq!(layer.client_config.hover_template.as_deref(), Some("{{name}}"));
}

#[tokio::test]
async fn test_find_layer_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/layers/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.find_layer(&LayerId::Numeric(999)).await;

    assert!(
        matches!(&result, Err(Error::LayerNotFound { layer_id }) if layer_id == "999"),
        "expected LayerNotFound, got: {result:?}"
    );
    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_find_layer_with_namespaced_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/layers/topp:states"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "States", "type": "WMS" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let layer = client.find_layer(&LayerId::from("topp:states")).await.unwrap();
    assert_eq!(layer.name, "States");
}

#[tokio::test]
async fn test_find_layer_id_stays_inside_registry() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/applications/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "App" })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/layers/..%2Fapplications%2F1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.find_layer(&LayerId::from("../applications/1")).await;

    assert!(
        matches!(&result, Err(Error::LayerNotFound { layer_id }) if layer_id == "../applications/1"),
        "expected LayerNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_find_layer_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/layers/1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.find_layer(&LayerId::Numeric(1)).await.unwrap_err();

    assert!(
        matches!(&err, Error::Api { status: 503, message } if message == "maintenance"),
        "expected Api error, got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_find_layer_bad_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/layers/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client.find_layer(&LayerId::Numeric(3)).await.unwrap_err();

    assert!(
        matches!(&err, Error::Deserialization { body, .. } if body.contains("login")),
        "expected Deserialization error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_find_layer_without_registry() {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let endpoints = Endpoints::from_base(&base, "resources/appContext.json", None).unwrap();
    let client = BackendClient::with_client(reqwest::Client::new(), endpoints);

    let err = client.find_layer(&LayerId::from("roads")).await.unwrap_err();
    assert!(matches!(err, Error::NoRegistry));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Port 9 (discard) on localhost is closed in test environments.
    let base = Url::parse("http://127.0.0.1:9/").unwrap();
    let endpoints = Endpoints::from_base(&base, "applications/", Some("layers/")).unwrap();
    let client = BackendClient::with_client(reqwest::Client::new(), endpoints);

    let err = client.find_layer(&LayerId::Numeric(1)).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
}

// ── Application context ─────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_context() {
    let (server, client) = setup().await;

    let body = json!({
        "name": "Water Management",
        "clientConfig": {
            "mapView": {
                "center": [384000.0, 5710000.0],
                "extent": [0.0, 0.0, 1000000.0, 1000000.0],
                "projection": 25832,
                "resolutions": [560.0, 280.0, 140.0],
                "zoom": 2
            }
        },
        "toolConfig": [
            { "xtype": "shogun-button-zoomin" },
            { "xtype": "shogun-button-measure-menu", "properties": { "measureTypes": ["line"] } }
        ],
        "layerTree": {
            "title": "root",
            "checked": true,
            "children": [ { "layerId": 1, "checked": true } ]
        }
    });

    Mock::given(method("GET"))
        .and(path("/applications/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let ctx = client.fetch_context("12").await.unwrap();

    assert_eq!(ctx.name.as_deref(), Some("Water Management"));
    let view = ctx.client_config.map_view.unwrap();
    assert_eq!(view.projection, Some(Projection::Code(25832)));
    assert_eq!(view.resolutions.unwrap().len(), 3);
    assert_eq!(ctx.tool_config.len(), 2);
    assert!(!ctx.tool_config[0].hidden);

    let tree = ctx.layer_tree.unwrap();
    let children = tree.children.unwrap();
    assert_eq!(children[0].layer_id, Some(LayerId::Numeric(1)));
    assert!(children[0].children.is_none());
}

#[tokio::test]
async fn test_fetch_context_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/applications/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.fetch_context("404").await;
    assert!(
        matches!(result, Err(Error::ContextNotFound { .. })),
        "expected ContextNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_context_with_namespaced_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/applications/portal:hydro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Hydro" })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = client.fetch_context("portal:hydro").await.unwrap();
    assert_eq!(ctx.name.as_deref(), Some("Hydro"));
}

#[tokio::test]
async fn test_read_context_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"name":"Static","layerTree":{{"checked":false,"children":[]}}}}"#
    )
    .unwrap();

    let ctx = read_context_file(file.path()).await.unwrap();

    assert_eq!(ctx.name.as_deref(), Some("Static"));
    assert!(!ctx.layer_tree.unwrap().checked);
}

#[tokio::test]
async fn test_read_layers_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id":1,"name":"A","type":"WMS"}},{{"id":"b","name":"B","type":"TILEWMS"}}]"#
    )
    .unwrap();

    let layers = read_layers_file(file.path()).await.unwrap();

    assert_eq!(layers.len(), 2);
    assert_eq!(layers[1].id, Some(LayerId::from("b")));
    assert_eq!(layers[1].layer_type, LayerType::TileWms);
}

#[tokio::test]
async fn test_read_missing_file_is_io_error() {
    let err = read_context_file(std::path::Path::new("/nonexistent/appContext.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

// ── Message catalogs ────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_messages() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/resources/i18n/de.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "FeatureInfo": { "tooltip": "Abfrage" } })),
        )
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/resources/i18n/de.json", server.uri())).unwrap();
    let messages = client.fetch_messages(url).await.unwrap().unwrap();
    assert_eq!(messages["FeatureInfo"]["tooltip"], "Abfrage");

    let missing = Url::parse(&format!("{}/resources/i18n/fr.json", server.uri())).unwrap();
    assert!(client.fetch_messages(missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_messages_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"Print":{{"tooltip":"Drucken"}}}}"#).unwrap();

    let messages = read_messages_file(file.path()).await.unwrap();
    assert_eq!(messages["Print"]["tooltip"], "Drucken");
}
