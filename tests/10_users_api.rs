mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn creating_a_user_succeeds() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.register("alice", "abc123").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    assert_eq!(body["username"], "alice");
    assert!(body["id"].is_string());
    assert_eq!(body["tournaments"], serde_json::json!([]));

    // The password hash must never appear on the wire
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());

    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_rejected() -> Result<()> {
    let app = common::spawn_app().await?;

    let first = app.register("alice", "abc123").await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.register("alice", "other-password").await?;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let body: Value = second.json().await?;
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn short_password_is_rejected() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.register("alice", "ab").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Password needs to be at least 3 characters long.");

    Ok(())
}

#[tokio::test]
async fn missing_username_is_rejected() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/api/users"))
        .json(&serde_json::json!({ "password": "abc123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
