//! Manifest, health and routing surface tests.

mod common;

use common::{get_json, StaticFetcher, TestHarness};

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_200() {
    let (_harness, addr) = TestHarness::with_server(StaticFetcher::new()).await;

    let resp = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn manifest_describes_the_addon() {
    let (_harness, addr) = TestHarness::with_server(StaticFetcher::new()).await;
    let (status, json) = get_json(addr, "/manifest.json").await;

    assert_eq!(status, 200);
    assert_eq!(json["id"], "community.aymene69.akwam");
    assert_eq!(json["name"], "Akwam");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(
        json["resources"],
        serde_json::json!(["catalog", "meta", "stream"])
    );
    assert_eq!(json["types"], serde_json::json!(["movie", "series"]));
    assert_eq!(json["idPrefixes"], serde_json::json!(["akwam"]));
    assert_eq!(json["behaviorHints"]["configurable"], false);

    let ids: Vec<_> = json["catalogs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        vec![
            "akwam-movies",
            "akwam-series",
            "akwam-movies-search",
            "akwam-series-search"
        ]
    );
    assert_eq!(json["catalogs"][0]["genres"].as_array().unwrap().len(), 21);
}

#[tokio::test]
async fn manifest_reflects_configured_id() {
    let mut config = akwam_addon::config::Config::default();
    config.addon.id = "org.example.akwam".to_string();
    let (_harness, addr) = TestHarness::with_config(config, StaticFetcher::new())
        .serve()
        .await;

    let (_, json) = get_json(addr, "/manifest.json").await;
    assert_eq!(json["id"], "org.example.akwam");
}

// ---------------------------------------------------------------------------
// Configuration page
// ---------------------------------------------------------------------------

fn no_redirects() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn configure_redirects_to_configured_page() {
    let mut config = akwam_addon::config::Config::default();
    config.addon.configure_url = Some("https://example.com/akwam/configure".to_string());
    let (_harness, addr) = TestHarness::with_config(config, StaticFetcher::new())
        .serve()
        .await;

    let (_, json) = get_json(addr, "/manifest.json").await;
    assert_eq!(json["behaviorHints"]["configurable"], true);

    let client = no_redirects();
    for path in ["/configure", "/eyJsYW5nIjoiYXIifQ/configure"] {
        let resp = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 307, "path {path}");
        assert_eq!(
            resp.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("https://example.com/akwam/configure")
        );
    }

    let resp = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(
        resp.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/configure")
    );
}

#[tokio::test]
async fn configure_without_page_is_not_found() {
    let (_harness, addr) = TestHarness::with_server(StaticFetcher::new()).await;

    let (status, _) = get_json(addr, "/configure").await;
    assert_eq!(status, 404);

    let resp = no_redirects()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/manifest.json")
    );
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn config_prefix_is_accepted_and_ignored() {
    let (_harness, addr) = TestHarness::with_server(StaticFetcher::new()).await;

    let (status, plain) = get_json(addr, "/manifest.json").await;
    assert_eq!(status, 200);
    let (status, prefixed) = get_json(addr, "/eyJsYW5nIjoiYXIifQ/manifest.json").await;
    assert_eq!(status, 200);
    assert_eq!(plain, prefixed);

    let (status, json) = get_json(addr, "/user-config/stream/movie/tt0111161.json").await;
    assert_eq!(status, 200);
    assert_eq!(json, serde_json::json!({ "streams": [] }));
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let (_harness, addr) = TestHarness::with_server(StaticFetcher::new()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/manifest.json"))
        .header("Origin", "https://web.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn unknown_content_type_is_not_found() {
    let (_harness, addr) = TestHarness::with_server(StaticFetcher::new()).await;

    let (status, _) = get_json(addr, "/stream/channel/akwamRHVuZQ.json").await;
    assert_eq!(status, 404);
}
