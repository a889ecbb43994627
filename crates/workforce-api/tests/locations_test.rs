//! Integration tests for location aggregate routes.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_and_get_round_trip(pool: PgPool) {
    let id = common::create_location(&pool, "Helsinki HQ", "fi").await;

    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, &format!("/api/v1/locations/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], 1);
    assert_eq!(json["data"]["name"], "Helsinki HQ");
    assert_eq!(json["data"]["address"]["country"], "FI");
    assert_eq!(json["data"]["facilities"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_stale_update_returns_409(pool: PgPool) {
    let id = common::create_location(&pool, "Tampere", "FI").await;
    let uri = format!("/api/v1/locations/{id}");
    let mut data = common::location_body("Tampere Office", "FI");
    data["facilities"] = serde_json::json!([{ "kind": "parking_slots", "count": 2 }]);

    let (status, json) = common::put_json(
        common::build_test_app(pool.clone()),
        &uri,
        &serde_json::json!({ "version": 1, "data": data }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], 2);
    assert_eq!(json["data"]["facilities"].as_array().unwrap().len(), 1);

    let (status, json) = common::put_json(
        common::build_test_app(pool),
        &uri,
        &serde_json::json!({ "version": 1, "data": common::location_body("Tampere", "FI") }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "concurrent_modification");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_name_returns_422(pool: PgPool) {
    common::create_location(&pool, "Oulu", "FI").await;

    let (status, json) = common::post_json(
        common::build_test_app(pool),
        "/api/v1/locations",
        &common::location_body("Oulu", "FI"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "constraint_violation");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_is_idempotent(pool: PgPool) {
    let id = common::create_location(&pool, "Turku", "FI").await;
    let uri = format!("/api/v1/locations/{id}");

    let (first, _) = common::delete(common::build_test_app(pool.clone()), &uri).await;
    let (second, _) = common::delete(common::build_test_app(pool.clone()), &uri).await;
    let (status, json) = common::get_json(common::build_test_app(pool), &uri).await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NO_CONTENT);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_rejects_unknown_sort_property(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/api/v1/locations?sort=size:desc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_sort_property");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_pages_and_sorts(pool: PgPool) {
    for (name, country) in [("B", "SE"), ("A", "NO"), ("C", "DK")] {
        common::create_location(&pool, name, country).await;
    }

    let (status, json) = common::get_json(
        common::build_test_app(pool),
        "/api/v1/locations?limit=2&offset=0&sort=name:desc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    let names: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["C", "B"]);
}
