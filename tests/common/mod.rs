#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crm_api_rust::config::AppConfig;
use crm_api_rust::database::{open_store, MemoryStore, Store};
use crm_api_rust::{app, AppState};
use uuid::Uuid;

pub const PASSWORD: &str = "secret1";

/// The real router over a fresh in-memory store, bound to an ephemeral port.
/// Each test gets its own server so no state leaks between tests.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    http: reqwest::Client,
}

pub async fn spawn_server() -> Result<TestServer> {
    let config = AppConfig::from_map(&test_vars(&[("DATABASE_BACKEND", "memory")])).context("test config")?;
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    serve(config, store).await
}

/// The same router over `PgStore`, migrated on connect. `None` when
/// `TEST_DATABASE_URL` is unset so the suite still runs without a database.
/// Servers share the database, so callers register with [`unique_email`].
pub async fn spawn_pg_server() -> Result<Option<TestServer>> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping Postgres-backed test");
        return Ok(None);
    };
    let config = AppConfig::from_map(&test_vars(&[
        ("DATABASE_BACKEND", "postgres"),
        ("DATABASE_URL", url.as_str()),
        ("DATABASE_MAX_CONNECTIONS", "2"),
        ("DATABASE_RUN_MIGRATIONS", "true"),
    ]))
    .context("postgres test config")?;
    let store = open_store(&config.database).await.context("connect to TEST_DATABASE_URL")?;
    serve(config, store).await.map(Some)
}

/// An address no other test run has registered, e.g. `alice-3f2c...@x.com`.
pub fn unique_email(name: &str) -> String {
    format!("{}-{}@x.com", name, Uuid::new_v4().simple())
}

fn test_vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    let mut vars = HashMap::from([("JWT_SECRET".to_string(), "integration-test-secret".to_string())]);
    vars.extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    vars
}

async fn serve(config: AppConfig, store: Arc<dyn Store>) -> Result<TestServer> {
    let state = AppState::new(config, store);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        state,
        http: reqwest::Client::new(),
    })
}

/// Status plus decoded body; empty bodies decode to `Value::Null`.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn send(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<Reply> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body from {}", path))?
        };
        Ok(Reply { status, body })
    }

    pub async fn get(&self, token: &str, path: &str) -> Result<Reply> {
        self.send(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, token: &str, path: &str, body: Value) -> Result<Reply> {
        self.send(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn patch(&self, token: &str, path: &str, body: Value) -> Result<Reply> {
        self.send(Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, token: &str, path: &str) -> Result<Reply> {
        self.send(Method::DELETE, path, Some(token), None).await
    }

    /// Register `email` and return the session token.
    pub async fn signup(&self, email: &str) -> Result<String> {
        let reply = self
            .send(
                Method::POST,
                "/api/auth/signup",
                None,
                Some(json!({ "email": email, "password": PASSWORD, "name": "Test User" })),
            )
            .await?;
        anyhow::ensure!(reply.status == StatusCode::CREATED, "signup failed: {}", reply.body);
        token_of(&reply)
    }

    pub async fn create_client(&self, token: &str, name: &str) -> Result<String> {
        let reply = self
            .post(
                token,
                "/api/clients",
                json!({ "name": name, "email": "contact@example.com", "phone": "555-0100" }),
            )
            .await?;
        anyhow::ensure!(reply.status == StatusCode::CREATED, "create client failed: {}", reply.body);
        id_of(&reply)
    }

    pub async fn create_project(&self, token: &str, client_id: &str, title: &str) -> Result<String> {
        let reply = self
            .post(
                token,
                "/api/projects",
                json!({
                    "title": title,
                    "budget": 1000,
                    "deadline": days_from_now(30),
                    "clientId": client_id,
                }),
            )
            .await?;
        anyhow::ensure!(reply.status == StatusCode::CREATED, "create project failed: {}", reply.body);
        id_of(&reply)
    }

    pub async fn create_reminder(&self, token: &str, body: Value) -> Result<String> {
        let reply = self.post(token, "/api/reminders", body).await?;
        anyhow::ensure!(reply.status == StatusCode::CREATED, "create reminder failed: {}", reply.body);
        id_of(&reply)
    }
}

pub fn token_of(reply: &Reply) -> Result<String> {
    reply.data()["token"]
        .as_str()
        .map(str::to_string)
        .context("response has no token")
}

pub fn id_of(reply: &Reply) -> Result<String> {
    reply.data()["id"]
        .as_str()
        .map(str::to_string)
        .context("response has no id")
}

/// RFC 3339 timestamp `days` from now (negative for the past).
pub fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}
