//! End-to-end tests for the wardrobe API.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The wardrobe server running (cargo run -p wardrobe-server)
//! - A valid `GOOGLE_VISION_API_KEY` configured for the server
//!
//! Run with: cargo test -p wardrobe-integration-tests -- --ignored

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use wardrobe_integration_tests::{ErrorBody, ListBody, TestContext, UploadBody};

#[tokio::test]
#[ignore = "Requires running wardrobe server"]
async fn test_health() {
    let ctx = TestContext::from_env();
    let resp = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "Requires running wardrobe server and Vision credentials"]
async fn test_upload_then_list_round_trip() {
    let ctx = TestContext::from_env();
    let user_id = TestContext::unique_user_id();

    let resp = ctx
        .upload(Some(TestContext::sample_image()), Some(&user_id))
        .await
        .expect("Failed to upload");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: UploadBody = resp.json().await.expect("Invalid upload body");
    assert!(created.success);
    assert_eq!(created.data.user_id.as_str(), user_id);
    assert!(created.data.image_url.contains("text="));

    let resp = ctx.list(Some(&user_id)).await.expect("Failed to list");
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: ListBody = resp.json().await.expect("Invalid list body");

    assert!(listed.success);
    assert_eq!(listed.count, 1);
    let item = &listed.data[0];
    assert_eq!(item.id, created.data.id);
    assert_eq!(item.item_type, created.data.item_type);
    assert_eq!(item.color, created.data.color);
    assert_eq!(item.tags, created.data.tags);
}

#[tokio::test]
#[ignore = "Requires running wardrobe server"]
async fn test_upload_without_file() {
    let ctx = TestContext::from_env();
    let user_id = TestContext::unique_user_id();

    let resp = ctx.upload(None, Some(&user_id)).await.expect("Failed to upload");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = resp.json().await.expect("Invalid error body");
    assert!(!body.success);
    assert_eq!(body.message, "Please upload an image file.");

    // Nothing was written for this user.
    let listed: ListBody = ctx
        .list(Some(&user_id))
        .await
        .expect("Failed to list")
        .json()
        .await
        .expect("Invalid list body");
    assert_eq!(listed.count, 0);
}

#[tokio::test]
#[ignore = "Requires running wardrobe server"]
async fn test_upload_without_user_id() {
    let ctx = TestContext::from_env();

    let resp = ctx
        .upload(Some(TestContext::sample_image()), None)
        .await
        .expect("Failed to upload");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = resp.json().await.expect("Invalid error body");
    assert_eq!(body.message, "Please provide a userId.");
}

#[tokio::test]
#[ignore = "Requires running wardrobe server"]
async fn test_list_without_user_id() {
    let ctx = TestContext::from_env();

    let resp = ctx.list(None).await.expect("Failed to list");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running wardrobe server"]
async fn test_list_for_unknown_user_is_empty() {
    let ctx = TestContext::from_env();

    let resp = ctx
        .list(Some(&TestContext::unique_user_id()))
        .await
        .expect("Failed to list");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ListBody = resp.json().await.expect("Invalid list body");
    assert!(body.success);
    assert_eq!(body.count, 0);
    assert!(body.data.is_empty());
}

#[tokio::test]
#[ignore = "Requires running wardrobe server and Vision credentials"]
async fn test_user_id_with_reserved_characters_round_trips() {
    let ctx = TestContext::from_env();
    let user_id = format!("{} a&b=c#d", TestContext::unique_user_id());

    let resp = ctx
        .upload(Some(TestContext::sample_image()), Some(&user_id))
        .await
        .expect("Failed to upload");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let listed: ListBody = ctx
        .list(Some(&user_id))
        .await
        .expect("Failed to list")
        .json()
        .await
        .expect("Invalid list body");
    assert_eq!(listed.count, 1);
    assert_eq!(listed.data[0].user_id.as_str(), user_id);
}
