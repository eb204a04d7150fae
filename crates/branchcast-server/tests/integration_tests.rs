//! Integration tests for the Server
//!
//! Runs the real fetcher and Gemini provider against local mock servers.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use branchcast_domain::BranchRegistry;
use branchcast_fetcher::{FetcherConfig, HttpArticleFetcher};
use branchcast_generator::{BatchOrchestrator, GeneratorConfig};
use branchcast_llm::GeminiProvider;
use branchcast_server::{build_app, config::ServerConfig, handlers::AppState};
use branchcast_store::SqliteArchive;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // for oneshot
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-1.5-flash";

const ARTICLE_HTML: &str = "<html><head><style>p{}</style></head>\
    <body><h1>Free buses</h1><p>Students ride free from January.</p>\
    <script>track()</script></body></html>";

fn gemini_reply(short_form: &str, long_form: &str) -> Value {
    let text = json!({ "shortForm": short_form, "longForm": long_form }).to_string();
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Article server with a real page and a blank one
async fn article_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/buses"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE_HTML, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news/blank"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body> </body></html>", "text/html"),
        )
        .mount(&server)
        .await;
    server
}

async fn gemini_server(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{}:generateContent", MODEL)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn create_app(gemini: &MockServer) -> Router {
    let store = Arc::new(Mutex::new(SqliteArchive::new(":memory:").unwrap()));
    let llm = GeminiProvider::new("test-key", MODEL)
        .unwrap()
        .with_endpoint(gemini.uri());
    let fetcher = HttpArticleFetcher::new(FetcherConfig::default()).unwrap();
    let registry = BranchRegistry::new(["CABANG - KEPONG", "CABANG - KLANG", "CABANG - AMPANG"]).unwrap();

    let pipeline = BatchOrchestrator::new(fetcher, llm, Arc::clone(&store), registry, GeneratorConfig::default());
    let state = AppState {
        pipeline: Arc::new(pipeline),
        store,
    };

    build_app(state, &ServerConfig::default()).unwrap()
}

fn generate_request(url: &str, stance: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "url": url, "type": stance }).to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_generate_end_to_end() {
    let articles = article_server().await;
    let gemini = gemini_server(200, gemini_reply("Ride free!", "Students ride free. Starting January.")).await;
    let app = create_app(&gemini);

    let url = format!("{}/news/buses", articles.uri());
    let response = app.clone().oneshot(generate_request(&url, "PRO")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = read_json(response).await["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/generations")
        .body(Body::empty())
        .unwrap();
    let records = read_json(app.oneshot(request).await.unwrap()).await;

    assert_eq!(records[0]["id"], id);
    assert_eq!(records[0]["articleUrl"], url);
    let pairs = records[0]["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[2]["branchId"], "CABANG - AMPANG");
    assert_eq!(pairs[2]["shortForm"], "Ride free!");

    // One Gemini call per branch
    assert_eq!(gemini.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_prompts_carry_article_text_only() {
    let articles = article_server().await;
    let gemini = gemini_server(200, gemini_reply("a", "b")).await;
    let app = create_app(&gemini);

    let url = format!("{}/news/buses", articles.uri());
    let response = app.oneshot(generate_request(&url, "ANTI")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let requests = gemini.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("Students ride free from January."));
    assert!(!body.contains("track()"));
    assert!(body.contains("critical and opposing"));
}

#[tokio::test]
async fn test_blank_article_is_bad_request() {
    let articles = article_server().await;
    let gemini = gemini_server(200, gemini_reply("a", "b")).await;
    let app = create_app(&gemini);

    let url = format!("{}/news/blank", articles.uri());
    let response = app.oneshot(generate_request(&url, "PRO")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(gemini.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_model_failure_is_internal_error() {
    let articles = article_server().await;
    let gemini = gemini_server(429, json!({ "error": { "message": "quota" } })).await;
    let app = create_app(&gemini);

    let url = format!("{}/news/buses", articles.uri());
    let response = app.clone().oneshot(generate_request(&url, "PRO")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["error"], "Failed to generate content");

    let request = Request::builder()
        .uri("/generations")
        .body(Body::empty())
        .unwrap();
    let records = read_json(app.oneshot(request).await.unwrap()).await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_over_cap_short_form_aborts_batch() {
    let articles = article_server().await;
    let gemini = gemini_server(200, gemini_reply(&"x".repeat(281), "long")).await;
    let app = create_app(&gemini);

    let url = format!("{}/news/buses", articles.uri());
    let response = app.oneshot(generate_request(&url, "PRO")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(gemini.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let gemini = gemini_server(200, gemini_reply("a", "b")).await;
    let app = create_app(&gemini);

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/generate")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_cors_ignores_unlisted_origin() {
    let gemini = gemini_server(200, gemini_reply("a", "b")).await;
    let app = create_app(&gemini);

    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
