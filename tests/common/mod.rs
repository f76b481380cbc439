#![allow(dead_code)]

use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};

use tournament_api_rust::app;
use tournament_api_rust::store::memory::MemoryStore;

static ENV: Once = Once::new();

/// An application instance with a fresh in-memory store, served on an
/// ephemeral port in-process. Each test gets its own isolated world.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

pub async fn spawn_app() -> Result<TestApp> {
    // Must run before the config singleton is first touched by a handler
    ENV.call_once(|| {
        std::env::set_var("APP_ENV", "test");
        std::env::set_var("SECRET", "test-signing-secret");
    });

    let app = app(Arc::new(MemoryStore::new()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    Ok(TestApp {
        base_url,
        client: Client::new(),
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let body: Value = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?
            .json()
            .await?;

        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    pub async fn register_and_login(&self, username: &str) -> Result<String> {
        let res = self.register(username, "sekret").await?;
        anyhow::ensure!(res.status() == 201, "registration failed: {}", res.status());
        self.login(username, "sekret").await
    }

    /// Create a tournament and return its response body.
    pub async fn create_tournament(&self, token: &str, name: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/tournaments"))
            .bearer_auth(token)
            .json(&json!({ "name": name }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == 201, "tournament create failed: {}", res.status());
        Ok(res.json().await?)
    }

    /// Create a sub-resource (players / playerpools / teams) under a
    /// tournament and return its response body.
    pub async fn create_child(
        &self,
        token: &str,
        tournament_id: &str,
        collection: &str,
        body: &Value,
    ) -> Result<Value> {
        let res = self
            .client
            .post(self.url(&format!("/api/tournaments/{}/{}", tournament_id, collection)))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        anyhow::ensure!(res.status() == 201, "{} create failed: {}", collection, res.status());
        Ok(res.json().await?)
    }

    pub async fn get_json(&self, token: &str, path: &str) -> Result<Value> {
        let res = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        anyhow::ensure!(res.status() == 200, "GET {} failed: {}", path, res.status());
        Ok(res.json().await?)
    }
}

/// Extract the `id` field of a JSON body.
pub fn id_of(body: &Value) -> String {
    body["id"].as_str().expect("body has no id").to_string()
}

/// Collect a JSON array of id strings.
pub fn id_list(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|v| v.as_str().expect("expected string ids"))
        .collect()
}
