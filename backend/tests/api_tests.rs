//! HTTP API tests driving the router with the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shared::CropSpecification;
use tower::ServiceExt;
use vfarm_server::config::{Config, DatabaseConfig, ServerConfig, StorageBackend, StorageConfig};
use vfarm_server::store::InMemoryFarmStore;
use vfarm_server::{create_app, AppState};

fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout_secs: 1,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
        },
    }
}

fn app() -> Router {
    create_app(AppState {
        store: Arc::new(InMemoryFarmStore::with_crops([CropSpecification::lettuce()])),
        config: Arc::new(test_config()),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_farm(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/farms",
        Some(json!({ "width": 10.0, "height": 5.0, "crop_type": "lettuce" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_backend() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["storage"], "connected");
}

#[tokio::test]
async fn farm_lifecycle_over_http() {
    let app = app();
    let id = create_farm(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/farms/{id}/owners"),
        Some(json!({ "address": "0xabc", "share_size": "60" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owners"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/farms/{id}/owners"),
        Some(json!({ "address": "0xdef", "share_size": "50" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "SHARE_EXCEEDED");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/farms/{id}/readings"),
        Some(json!({
            "soil_ph": 6.5,
            "humidity": 65.0,
            "nutrient_level": 0.8,
            "temperature": 23.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["crop_health"], 100);
    assert_eq!(body["expected_yield"], 225.0);

    let (status, body) = send(&app, "GET", &format!("/api/v1/farms/{id}/readings"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_items"], 1);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/farms/{id}/status"),
        Some(json!({ "status": "harvested" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "harvested");

    let (status, body) = send(&app, "GET", &format!("/api/v1/farms/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_health"], 100);
    assert_eq!(body["iot_data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_dimensions_are_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/farms",
        Some(json!({ "width": 0.0, "height": 5.0, "crop_type": "lettuce" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "dimensions");
}

#[tokio::test]
async fn unknown_crop_is_unprocessable() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/farms",
        Some(json!({ "width": 2.0, "height": 5.0, "crop_type": "saffron" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_CROP");
}

#[tokio::test]
async fn unknown_farm_is_not_found() {
    let app = app();

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/farms/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn crop_catalog_round_trip() {
    let app = app();

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/crops/Basil",
        Some(json!({
            "optimal_ph": 6.2,
            "optimal_humidity": 60.0,
            "optimal_temp": 24.0,
            "nutrient_needs": 1.0,
            "expected_yield_per_m2": 2.0,
            "growth_period_days": 28
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/v1/crops", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["crops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["basil", "lettuce"]);

    let (status, _) = send(&app, "DELETE", "/api/v1/crops/basil", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/v1/crops/basil", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
