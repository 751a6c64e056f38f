// HTTP contract tests for the Genie server
//
// Drives the router in-process with tower's oneshot; no sockets involved.

use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use seedgenie_lib::genie::Synthesizer;
use seedgenie_lib::server::{build_router, AppState, RequestLimits};
use seedgenie_lib::vocab::vocabulary;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

fn app(static_dir: Option<&Path>) -> Router {
    let state = Arc::new(AppState {
        synthesizer: Synthesizer::local_only(vocabulary()),
        vocab: vocabulary(),
        limits: RequestLimits::new(200),
    });
    build_router(state, static_dir)
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://192.168.1.20:3000")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_failure(body: &Value) {
    assert_eq!(body["success"], false);
    assert!(body.get("config").is_none());
    assert!(!body["error"].as_str().unwrap().is_empty());
}

// =============================================================================
// POST /api/generate
// =============================================================================

#[tokio::test]
async fn generate_returns_config() {
    let response = app(None)
        .oneshot(post_json(
            json!({"prompt": "I want a Perkeo seed with Observatory"}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());
    assert_eq!(
        body["config"],
        json!({
            "name": "I want a Perkeo seed with Observatory",
            "deck": "Red Deck",
            "must": [
                {"kind": "joker", "value": "Perkeo", "modifiers": []},
                {"kind": "voucher", "value": "Observatory", "modifiers": []}
            ],
            "should": []
        })
    );
}

#[tokio::test]
async fn generate_empty_prompt_succeeds() {
    let response = app(None)
        .oneshot(post_json(json!({"prompt": ""}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["config"]["deck"], "Red Deck");
    assert_eq!(body["config"]["name"], "Genie Search");
    assert_eq!(body["config"]["must"], json!([]));
    assert_eq!(body["config"]["should"], json!([]));
}

#[tokio::test]
async fn generate_local_mode() {
    let response = app(None)
        .oneshot(post_json(
            json!({"prompt": "Lots of money early", "mode": "local"}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["config"]["should"][0],
        json!({"kind": "other", "value": "economy", "modifiers": [],
               "antePreference": {"min": 1, "max": 2}})
    );
}

#[tokio::test]
async fn generate_missing_prompt_is_400() {
    let response = app(None)
        .oneshot(post_json(json!({"text": "Perkeo"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_failure(&json_body(response).await);
}

#[tokio::test]
async fn generate_non_string_prompt_is_400() {
    let response = app(None)
        .oneshot(post_json(json!({"prompt": ["Perkeo"]}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_failure(&json_body(response).await);
}

#[tokio::test]
async fn generate_invalid_json_is_400() {
    let response = app(None)
        .oneshot(post_json("{\"prompt\": "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_failure(&json_body(response).await);
}

#[tokio::test]
async fn generate_bad_mode_is_400() {
    let response = app(None)
        .oneshot(post_json(
            json!({"prompt": "Perkeo", "mode": "remote"}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_failure(&json_body(response).await);
}

#[tokio::test]
async fn generate_oversized_prompt_is_413() {
    let response = app(None)
        .oneshot(post_json(json!({"prompt": "a".repeat(201)}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_failure(&json_body(response).await);
}

#[tokio::test]
async fn generate_oversized_body_is_413() {
    let padding = "x".repeat(64 * 1024);
    let response = app(None)
        .oneshot(post_json(
            json!({"prompt": "Perkeo", "padding": padding}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_failure(&json_body(response).await);
}

#[tokio::test]
async fn generate_wrong_content_type_is_415() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("Perkeo"))
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_failure(&json_body(response).await);
}

#[tokio::test]
async fn generate_get_is_405() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/generate")
        .body(Body::empty())
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_failure(&json_body(response).await);
}

// =============================================================================
// Pre-flight
// =============================================================================

#[tokio::test]
async fn options_is_204_with_cors_on_any_path() {
    for uri in ["/api/generate", "/", "/anything/else"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT, "uri {}", uri);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .contains("POST"));
        assert!(text_body(response).await.is_empty());
    }
}

// =============================================================================
// Static assets
// =============================================================================

fn static_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html><body>Genie</body></html>").unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src").join("main.js"), "console.log('genie');").unwrap();
    dir
}

#[tokio::test]
async fn serves_index_and_assets() {
    let dir = static_dir();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app(Some(dir.path())).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("Genie"));

    let request = Request::builder()
        .uri("/src/main.js")
        .body(Body::empty())
        .unwrap();
    let response = app(Some(dir.path())).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "console.log('genie');");

    let request = Request::builder()
        .uri("/src/missing.js")
        .body(Body::empty())
        .unwrap();
    let response = app(Some(dir.path())).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_only_mode_without_static_dir() {
    let missing = Path::new("/definitely/not/a/real/dir");
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app(Some(missing)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health and vocabulary
// =============================================================================

#[tokio::test]
async fn health_reports_local_only() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["provider"], Value::Null);
}

#[tokio::test]
async fn vocabulary_lists_identifiers() {
    let request = Request::builder()
        .uri("/api/vocabulary")
        .body(Body::empty())
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["defaultDeck"], "Red Deck");
    assert!(body["decks"].as_array().unwrap().contains(&json!("Plasma Deck")));
    assert!(body["jokers"].as_array().unwrap().contains(&json!("Perkeo")));
    assert!(body["editions"].as_array().unwrap().contains(&json!("negative")));
    assert!(body["other"].as_array().unwrap().contains(&json!("economy")));
}
