// SPDX-License-Identifier: MIT

//! Tests for the read endpoints: pull-on-miss and manual refresh.

mod common;

use axum::http::StatusCode;
use httpmock::prelude::*;
use serde_json::json;
use tower::ServiceExt;
use whoop_relay::models::Category;

#[tokio::test]
async fn test_cache_miss_fetches_once_then_serves_from_cache() {
    let server = MockServer::start_async().await;
    let (app, _cache) = common::test_app(common::test_config(&server));

    let cycle_record = json!({"cycle_id": 9, "strain": 11.5});
    let cycle_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/cycle");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"records": [{"cycle_id": 9, "strain": 11.5}, {"cycle_id": 8}]}));
        })
        .await;

    // First read: miss, synchronous upstream fetch, newest record wins
    let response = app
        .clone()
        .oneshot(common::get_request("/api/cycle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await, cycle_record);

    // Second read: cache hit, no further upstream traffic
    let response = app
        .oneshot(common::get_request("/api/cycle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await, cycle_record);

    assert_eq!(cycle_mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_empty_collection_returns_empty_object() {
    let server = MockServer::start_async().await;
    let (app, cache) = common::test_app(common::test_config(&server));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/recovery");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"records": []}));
        })
        .await;

    let response = app
        .oneshot(common::get_request("/api/recovery"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await, json!({}));
    assert!(cache.get(Category::Recovery).is_none());
}

#[tokio::test]
async fn test_upstream_failure_on_miss_degrades_to_empty_object() {
    let server = MockServer::start_async().await;
    let (app, cache) = common::test_app(common::test_config(&server));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/activity/workout");
            then.status(500);
        })
        .await;

    let response = app
        .oneshot(common::get_request("/api/workout"))
        .await
        .unwrap();

    // Failures degrade to "absent", never to an error for the frontend
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await, json!({}));
    assert!(cache.get(Category::Workout).is_none());
}

#[tokio::test]
async fn test_unknown_category_is_404() {
    let server = MockServer::start_async().await;
    let (app, _cache) = common::test_app(common::test_config(&server));

    let response = app
        .oneshot(common::get_request("/api/strain"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_manual_refresh_updates_only_categories_with_records() {
    let server = MockServer::start_async().await;
    let (app, cache) = common::test_app(common::test_config(&server));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/recovery");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"records": [{"recovery_score": 70}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/activity/sleep");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"records": [{"id": "uuid-2"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/activity/workout");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"records": [{"strain": 9.9}]}));
        })
        .await;
    // Fourth category has nothing to report
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cycle");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"records": []}));
        })
        .await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/refresh")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "success");
    assert!(body["timestamp"].is_string());

    // Exactly the three categories with records were overwritten
    assert_eq!(
        cache.get(Category::Recovery),
        Some(json!({"recovery_score": 70}))
    );
    assert_eq!(cache.get(Category::Sleep), Some(json!({"id": "uuid-2"})));
    assert_eq!(cache.get(Category::Workout), Some(json!({"strain": 9.9})));
    assert!(cache.get(Category::Cycle).is_none());
}

#[tokio::test]
async fn test_manual_refresh_reports_upstream_errors() {
    let server = MockServer::start_async().await;
    let (app, _cache) = common::test_app(common::test_config(&server));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/recovery");
            then.status(500).body("boom");
        })
        .await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/refresh")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());
}
