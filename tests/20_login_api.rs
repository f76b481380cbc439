mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn login_returns_a_token() -> Result<()> {
    let app = common::spawn_app().await?;
    app.register("alice", "abc123").await?;

    let res = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({ "username": "alice", "password": "abc123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["username"], "alice");
    assert!(!body["token"].as_str().unwrap_or_default().is_empty());

    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected() -> Result<()> {
    let app = common::spawn_app().await?;
    app.register("alice", "abc123").await?;

    let res = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Invalid username or password.");

    Ok(())
}

#[tokio::test]
async fn unknown_user_is_rejected() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({ "username": "nobody", "password": "abc123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
