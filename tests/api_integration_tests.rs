//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each inspection endpoint.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dashcache::{api::create_router, AppState, CacheOptions, CacheStore};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(CacheStore::new(CacheOptions::default())))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET / GET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/cache", json!({"key": "chats", "value": [1, 2, 3]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "chats");
    assert!(json["message"].as_str().unwrap().contains("set successfully"));
}

#[tokio::test]
async fn test_get_endpoint_returns_value_and_metadata() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_json(
            "/cache",
            json!({"key": "contacts:42", "value": {"name": "Ada"}, "ttl_ms": 60_000}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(empty("GET", "/cache/contacts:42")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "contacts:42");
    assert_eq!(json["value"], json!({"name": "Ada"}));
    assert_eq!(json["access_count"], 1);
    assert!(json["approx_size_bytes"].as_u64().unwrap() > 0);
    assert!(json["ttl_remaining_ms"].as_u64().unwrap() <= 60_000);
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(empty("GET", "/cache/nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_json("/cache", json!({"key": "groups", "value": []})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty("DELETE", "/cache/groups"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(empty("GET", "/cache/groups")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(empty("DELETE", "/cache/nonexistent"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_endpoint_resets_keys_and_stats() {
    let app = create_test_app();

    for key in ["a", "b", "c"] {
        let _ = app
            .clone()
            .oneshot(put_json("/cache", json!({"key": key, "value": key})))
            .await
            .unwrap();
    }
    let _ = app.clone().oneshot(empty("GET", "/cache/a")).await.unwrap();

    let response = app.clone().oneshot(empty("DELETE", "/cache")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let keys = body_to_json(
        app.clone()
            .oneshot(empty("GET", "/keys"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(keys["count"], 0);

    let stats = body_to_json(app.oneshot(empty("GET", "/stats")).await.unwrap().into_body()).await;
    assert_eq!(stats["hits"], 0);
    assert_eq!(stats["misses"], 0);
    assert_eq!(stats["entry_count"], 0);
}

// == KEYS Endpoint Tests ==

#[tokio::test]
async fn test_keys_endpoint_sorted() {
    let app = create_test_app();

    for key in ["templates", "campaigns", "chats"] {
        let _ = app
            .clone()
            .oneshot(put_json("/cache", json!({"key": key, "value": null})))
            .await
            .unwrap();
    }

    let response = app.oneshot(empty("GET", "/keys")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 3);
    assert_eq!(json["keys"], json!(["campaigns", "chats", "templates"]));
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_json("/cache", json!({"key": "stats_key", "value": "stats_value"})))
        .await
        .unwrap();

    // Two hits, one miss
    for uri in ["/cache/stats_key", "/cache/stats_key", "/cache/nonexistent"] {
        let _ = app.clone().oneshot(empty("GET", uri)).await.unwrap();
    }

    let response = app.oneshot(empty("GET", "/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 2);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["entry_count"], 1);
    assert_eq!(json["max_entries"], 1000);
    assert_eq!(json["hit_rate"].as_f64().unwrap(), 66.67);
    assert!(json["total_approx_size_bytes"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_stats_report_evictions() {
    let app = create_router(AppState::new(CacheStore::new(
        CacheOptions::default().with_max_entries(4),
    )));

    for i in 0..5 {
        let _ = app
            .clone()
            .oneshot(put_json("/cache", json!({"key": format!("k{}", i), "value": i})))
            .await
            .unwrap();
    }

    let json = body_to_json(app.oneshot(empty("GET", "/stats")).await.unwrap().into_body()).await;
    assert_eq!(json["evictions"], 1);
    assert_eq!(json["entry_count"], 4);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(empty("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 400 or 422 for JSON parsing errors
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/cache", json!({"key": "", "value": "test"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_zero_ttl_request() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/cache", json!({"key": "k", "value": 1, "ttl_ms": 0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == TTL Expiration via API Tests ==

#[tokio::test(start_paused = true)]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_json(
            "/cache",
            json!({"key": "ttl_test", "value": "expires_soon", "ttl_ms": 1000}),
        ))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app
        .clone()
        .oneshot(empty("GET", "/cache/ttl_test"))
        .await
        .unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    tokio::time::advance(Duration::from_millis(1000)).await;

    let get_response = app
        .clone()
        .oneshot(empty("GET", "/cache/ttl_test"))
        .await
        .unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);

    let keys = body_to_json(app.oneshot(empty("GET", "/keys")).await.unwrap().into_body()).await;
    assert_eq!(keys["count"], 0);
}

// == End-to-End over TCP ==

#[tokio::test]
async fn test_served_router_over_http() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_test_app()).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let response = client
        .put(format!("{}/cache", base))
        .json(&json!({"key": "templates", "value": ["welcome", "promo"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = client
        .get(format!("{}/cache/templates", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["value"], json!(["welcome", "promo"]));

    let response = client
        .get(format!("{}/cache/missing", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let stats: Value = client
        .get(format!("{}/stats", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
}
