//! In-process HTTP tests for the Crimes API
//!
//! Requests go straight through the router with `tower::ServiceExt::oneshot`,
//! so the full middleware stack runs without binding a socket.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

use crime_core::Dataset;
use crime_types::ResultPage;

use crate::models::{ErrorResponse, RecordResponse, RootResponse};
use crate::state::AppState;
use crate::{build_router, with_middleware};

fn app() -> Router {
    let state = AppState::with_dataset(Dataset::embedded().unwrap());
    build_router(Arc::new(state))
}

async fn get_raw(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

async fn get_json<T: serde::de::DeserializeOwned>(uri: &str) -> (StatusCode, T) {
    let (status, _, body) = get_raw(app(), uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn ids(page: &ResultPage) -> Vec<u64> {
    page.data.iter().filter_map(|r| r.id).collect()
}

#[tokio::test]
async fn test_root_message() {
    let (status, body): (_, RootResponse) = get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.message, "Crimes API running. Use /v1/crimes");
}

#[tokio::test]
async fn test_health() {
    let (status, body): (_, Value) = get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "crime-api");
    assert_eq!(body["records"], 50);
}

#[tokio::test]
async fn test_list_defaults() {
    let (status, page): (_, ResultPage) = get_json("/v1/crimes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.data.len(), 50);
    assert_eq!(page.meta.total, 50);
    assert_eq!(page.meta.page, 1);
    assert_eq!(page.meta.limit, 50);
    assert_eq!(page.meta.total_pages, 1);
    assert_eq!(page.data[0].name, "Acid Attack (IPC 326A)");
}

#[tokio::test]
async fn test_list_wire_shape() {
    let (_, body): (_, Value) = get_json("/v1/crimes?limit=1").await;
    let meta = body["meta"].as_object().unwrap();
    let mut keys: Vec<&str> = meta.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["limit", "page", "total", "totalPages"]);
    assert!(body["data"][0]["cognizable"].is_boolean());
    assert!(body["data"][0]["ingredients"].is_array());
}

#[tokio::test]
async fn test_list_filters_and_sorts() {
    let (status, page): (_, ResultPage) =
        get_json("/v1/crimes?cognizable=true&sortBy=severity_desc&page=1&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&page), vec![1, 4, 5, 7, 8]);
    assert_eq!(page.meta.total, 45);
    assert_eq!(page.meta.total_pages, 9);
}

#[tokio::test]
async fn test_list_text_search_is_url_decoded() {
    let (_, page): (_, ResultPage) = get_json("/v1/crimes?q=IPC%20354&sortBy=severity_asc").await;
    let mut found = ids(&page);
    found.sort_unstable();
    assert_eq!(found, vec![36, 37, 38, 50]);
}

#[tokio::test]
async fn test_list_combined_flags() {
    let (_, page): (_, ResultPage) =
        get_json("/v1/crimes?bailable=yes&compoundable=1&limit=100").await;
    assert!(page.meta.total > 0);
    assert!(page
        .data
        .iter()
        .all(|r| r.bailable.is(true) && r.compoundable.is(true)));
}

#[tokio::test]
async fn test_list_malformed_params_are_normalized() {
    let (status, page): (_, ResultPage) =
        get_json("/v1/crimes?page=abc&limit=-4&cognizable=perhaps&sortBy=random&page=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.meta.page, 1);
    assert_eq!(page.meta.limit, 50);
    assert_eq!(page.meta.total, 50);
}

#[tokio::test]
async fn test_list_page_past_end() {
    let (status, page): (_, ResultPage) = get_json("/v1/crimes?page=6&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.data.is_empty());
    assert_eq!(page.meta.total, 50);
    assert_eq!(page.meta.total_pages, 5);
}

#[tokio::test]
async fn test_get_by_id() {
    let (status, body): (_, RecordResponse) = get_json("/v1/crimes/14").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.data.name, "Theft (IPC 378/379)");
    assert_eq!(body.data.severity, 3);
}

#[tokio::test]
async fn test_get_missing_id() {
    for uri in ["/v1/crimes/999", "/v1/crimes/0", "/v1/crimes/abc", "/v1/crimes/1.5"] {
        let (status, body): (_, ErrorResponse) = get_json(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body.error, "Not found");
    }
}

#[tokio::test]
async fn test_security_and_cors_headers() {
    let request = Request::builder()
        .uri("/v1/crimes?limit=1")
        .header(header::ORIGIN, "https://example.org")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_panic_becomes_generic_500() {
    async fn boom() -> &'static str {
        panic!("secret internal detail")
    }

    let router = with_middleware(Router::new().route("/boom", get(boom)));

    let (status, _, body) = get_raw(router, "/boom").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.error, "Server error");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _, _) = get_raw(app(), "/v2/crimes").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_state_rejects_dataset_without_ids() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, br#"[{"name": "Murder", "severity": 10}]"#).unwrap();

    let err = AppState::new(Some(file.path())).err().unwrap();
    assert!(format!("{err:#}").contains("Record 'Murder' has no positive id"));
}
