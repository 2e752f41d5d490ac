//! Integration tests for manifest-driven resolution

use std::io::Write;

use serde_json::json;
use ssr_router::{load_manifest, resolve_urls, Manifest, ManifestError};
use ssr_router_core::RouterError;

fn write_manifest(value: serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file
}

fn urls(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

fn shop_manifest() -> serde_json::Value {
    json!({
        "pages": [
            { "page_id": "/pages/index" },
            { "page_id": "/pages/about" },
            { "page_id": "/pages/product/@id", "route": "/p/:id" },
            { "page_id": "/pages/docs", "route": "/docs/*" },
            { "page_id": "/pages/_error" }
        ],
        "config": { "base_url": "/shop" }
    })
}

#[tokio::test]
async fn test_resolve_from_file() {
    let file = write_manifest(shop_manifest());
    let manifest = load_manifest(file.path()).unwrap();

    let resolved = resolve_urls(
        &manifest,
        &urls(&["/shop/", "/shop/p/42?ref=home", "/shop/docs/guide/routing", "/shop/missing"]),
    )
    .await
    .unwrap();

    assert_eq!(resolved[0].result.page_id.as_deref(), Some("/pages/index"));
    assert_eq!(resolved[1].result.page_id.as_deref(), Some("/pages/product/@id"));
    assert_eq!(resolved[1].result.route_params.get("id").map(String::as_str), Some("42"));
    assert_eq!(
        resolved[2].result.route_params.get("*").map(String::as_str),
        Some("guide/routing")
    );
    assert!(resolved[3].result.page_id.is_none());
}

#[tokio::test]
async fn test_output_shape() {
    let manifest = Manifest::from_json(&shop_manifest().to_string()).unwrap();
    let resolved = resolve_urls(&manifest, &urls(&["/shop/about"])).await.unwrap();

    let value = serde_json::to_value(&resolved).unwrap();
    assert_eq!(value[0]["url"], "/shop/about");
    assert_eq!(value[0]["result"]["_pageId"], "/pages/about");
    assert_eq!(value[0]["result"]["_routingProvidedByOnBeforeRouteHook"], false);
    assert_eq!(value[0]["result"]["_routeMatches"][0]["routeType"], "FILESYSTEM");
}

#[tokio::test]
async fn test_missing_file() {
    let err = load_manifest("/nonexistent/manifest.json").unwrap_err();
    assert!(matches!(err, ManifestError::Io { .. }));
}

#[tokio::test]
async fn test_empty_manifest_has_no_pages() {
    let manifest = Manifest::from_json(&json!({ "pages": [] }).to_string()).unwrap();
    let err = resolve_urls(&manifest, &urls(&["/"])).await.unwrap_err();
    assert!(matches!(err, ManifestError::Router(RouterError::NoPages)));
}

#[tokio::test]
async fn test_route_without_slash() {
    let manifest = Manifest::from_json(
        &json!({ "pages": [{ "page_id": "/pages/about", "route": "about" }] }).to_string(),
    )
    .unwrap();
    let err = resolve_urls(&manifest, &urls(&["/about"])).await.unwrap_err();
    assert!(matches!(
        err,
        ManifestError::Router(RouterError::RouteStringMissingSlash { .. })
    ));
}
