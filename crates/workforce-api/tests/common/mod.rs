//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use workforce_api::build_router;
use workforce_api::state::AppState;
use workforce_store::PgDatabase;

/// Build the full app router over a test pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_router(AppState::new(PgDatabase::new(pool)))
}

/// Send a request with an optional JSON body and return status and JSON
/// response (`Null` for an empty body).
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, Some(body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "PUT", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "GET", uri, None).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "DELETE", uri, None).await
}

/// JSON body of a location in `country`.
pub fn location_body(name: &str, country: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "location_type": "office",
        "address": {
            "street": "Aleksanterinkatu 5",
            "postal_code": "00100",
            "city": "Helsinki",
            "country": country
        },
        "facilities": [
            { "kind": "kitchen" },
            { "kind": "hot_desks", "count": 8 }
        ]
    })
}

/// Create a location and return its id.
pub async fn create_location(pool: &PgPool, name: &str, country: &str) -> i64 {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        "/api/v1/locations",
        &location_body(name, country),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_i64().unwrap()
}
