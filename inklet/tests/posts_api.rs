// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

fn labels_of(json: &Value) -> Vec<String> {
    let mut labels: Vec<String> = json
        .get("labels")
        .and_then(Value::as_array)
        .expect("labels array")
        .iter()
        .map(|value| value.as_str().expect("label string").to_string())
        .collect();
    labels.sort();
    labels
}

#[actix_web::test]
async fn create_without_authorization_is_rejected() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "Hello", "content": "<p>Hi</p>"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("error").and_then(Value::as_str),
        Some("Unauthorized")
    );
}

#[actix_web::test]
async fn create_with_wrong_secret_token_is_rejected() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let forged = inklet::iam::sign_token(
        "some-other-secret",
        &inklet::iam::session_claims("admin", 7),
    )
    .expect("forged token");
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", format!("Bearer {}", forged)))
        .set_json(json!({"title": "Hello", "content": "<p>Hi</p>"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_then_get_round_trips_with_labels() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let id = common::create_post_via_api(
        &app,
        &harness,
        json!({
            "title": "Hello",
            "content": "<p>Hi</p>",
            "labels": ["intro", "news"],
        }),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json.get("id").and_then(Value::as_i64), Some(id));
    assert_eq!(json.get("title").and_then(Value::as_str), Some("Hello"));
    assert_eq!(
        json.get("content").and_then(Value::as_str),
        Some("<p>Hi</p>")
    );
    assert_eq!(json.get("type").and_then(Value::as_str), Some("post"));
    assert_eq!(json.get("status").and_then(Value::as_str), Some("publish"));
    assert!(json.get("published").and_then(Value::as_i64).is_some());
    assert_eq!(labels_of(&json), vec!["intro", "news"]);
    assert_eq!(
        json.get("replies").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
}

#[actix_web::test]
async fn create_sanitizes_script_from_content() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let id = common::create_post_via_api(
        &app,
        &harness,
        json!({
            "title": "Unsafe",
            "content": "<p>ok</p><script>alert('x')</script><img src=\"a.png\">",
        }),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let json: Value = test::read_body_json(resp).await;
    let content = json.get("content").and_then(Value::as_str).expect("content");
    assert!(!content.contains("script"));
    assert!(content.contains("<p>ok</p>"));
    assert!(content.contains("<img"));
}

#[actix_web::test]
async fn patch_reconciles_labels_to_target_set() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let id = common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "T", "content": "c", "labels": ["a", "b"]}),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}", id))
        .insert_header(harness.bearer_header())
        .set_json(json!({"labels": ["b", "c"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(labels_of(&json), vec!["b", "c"]);
}

#[actix_web::test]
async fn patch_with_unchanged_labels_is_idempotent() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let id = common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "T", "content": "c", "labels": ["a", "b"]}),
    )
    .await;

    for _ in 0..2 {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}", id))
            .insert_header(harness.bearer_header())
            .set_json(json!({"labels": ["a", "b"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(labels_of(&json), vec!["a", "b"]);
    }

    let labels = inklet::store::labels::current_labels(&harness.pool, id)
        .await
        .expect("labels");
    assert_eq!(labels.len(), 2);
}

#[actix_web::test]
async fn patch_without_labels_field_leaves_labels_unchanged() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let id = common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "T", "content": "c", "labels": ["keep"]}),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}", id))
        .insert_header(harness.bearer_header())
        .set_json(json!({"title": "Renamed"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json.get("title").and_then(Value::as_str), Some("Renamed"));
    assert_eq!(labels_of(&json), vec!["keep"]);
}

#[actix_web::test]
async fn patch_refreshes_updated_timestamp_only() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let id = common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "T", "content": "c", "published": 1000, "updated": 1000}),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}", id))
        .insert_header(harness.bearer_header())
        .set_json(json!({"title": "T2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json.get("published").and_then(Value::as_i64), Some(1000));
    let updated = json.get("updated").and_then(Value::as_i64).expect("updated");
    assert!(updated > 1000);
}

#[actix_web::test]
async fn delete_then_get_returns_not_found() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let id = common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "Gone", "content": "c", "labels": ["x"]}),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", id))
        .insert_header(harness.bearer_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json.get("error").and_then(Value::as_str), Some("Not found"));

    // Cascade removed the labels as well.
    let labels = inklet::store::labels::current_labels(&harness.pool, id)
        .await
        .expect("labels");
    assert!(labels.is_empty());
}

#[actix_web::test]
async fn non_numeric_id_returns_bad_request() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    let req = test::TestRequest::get()
        .uri("/api/posts/not-a-number")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn list_filters_by_type_and_status() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "Published post", "content": "c"}),
    )
    .await;
    common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "Draft post", "content": "c", "status": "draft"}),
    )
    .await;
    common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "About page", "content": "c", "type": "page"}),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/posts?type=post&status=publish")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    let items = json.get("items").and_then(Value::as_array).expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].get("title").and_then(Value::as_str),
        Some("Published post")
    );
}

#[actix_web::test]
async fn list_orders_newest_first() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.bundle())).await;

    common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "Older", "content": "c", "published": 1000}),
    )
    .await;
    common::create_post_via_api(
        &app,
        &harness,
        json!({"title": "Newer", "content": "c", "published": 2000}),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let resp = test::call_service(&app, req).await;
    let json: Value = test::read_body_json(resp).await;
    let titles: Vec<&str> = json
        .get("items")
        .and_then(Value::as_array)
        .expect("items")
        .iter()
        .map(|item| item.get("title").and_then(Value::as_str).expect("title"))
        .collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
}
