mod common;

use anyhow::Result;
use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{spawn_server, token_of, PASSWORD};
use crm_api_rust::auth::Claims;

#[tokio::test]
async fn signup_returns_profile_and_token_for_new_user() -> Result<()> {
    let server = spawn_server().await?;

    let reply = server
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1", "name": "A" })),
        )
        .await?;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["success"], true);
    let user = &reply.data()["user"];
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["name"], "A");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let claims = server.state.tokens.verify(&token_of(&reply)?)?;
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.id.to_string(), user["id"].as_str().unwrap_or_default());
    Ok(())
}

#[tokio::test]
async fn signup_with_taken_email_conflicts_regardless_of_password() -> Result<()> {
    let server = spawn_server().await?;
    server.signup("a@x.com").await?;

    let reply = server
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "a@x.com", "password": "different", "name": "B" })),
        )
        .await?;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "CONFLICT");
    assert_eq!(reply.body["error"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn signup_validation_reports_first_failing_field() -> Result<()> {
    let server = spawn_server().await?;

    let reply = server
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "not-an-email", "password": "secret1", "name": "A" })),
        )
        .await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_ERROR");
    assert_eq!(reply.body["field_errors"]["email"], "Invalid email address");

    let reply = server
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "a@x.com", "password": "123", "name": "A" })),
        )
        .await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Password must be at least 6 characters");

    let reply = server
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1" })),
        )
        .await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Name is required");
    Ok(())
}

#[tokio::test]
async fn malformed_json_body_is_rejected_in_envelope() -> Result<()> {
    let server = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(server.url("/api/auth/login"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn login_issues_fresh_token_for_valid_credentials() -> Result<()> {
    let server = spawn_server().await?;
    server.signup("a@x.com").await?;

    let reply = server
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": PASSWORD })),
        )
        .await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.data()["user"]["email"], "a@x.com");
    let token = token_of(&reply)?;
    assert_eq!(server.get(&token, "/api/clients").await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_identical() -> Result<()> {
    let server = spawn_server().await?;
    server.signup("a@x.com").await?;

    let wrong_password = server
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "not-the-password" })),
        )
        .await?;
    let unknown_email = server
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@x.com", "password": PASSWORD })),
        )
        .await?;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["error"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() -> Result<()> {
    let server = spawn_server().await?;

    let missing = server.send(Method::GET, "/api/clients", None, None).await?;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "Please authenticate");

    let garbage = server.get("not.a.token", "/api/dashboard").await?;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let basic = reqwest::Client::new()
        .get(server.url("/api/clients"))
        .header("authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(basic.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup("a@x.com").await?;
    let claims = server.state.tokens.verify(&token)?;

    let now = Utc::now().timestamp();
    let expired = server.state.tokens.sign(&Claims {
        iat: now - 7200,
        exp: now - 3600,
        ..claims
    })?;

    let reply = server.get(&expired, "/api/clients").await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_for_missing_account_is_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.state.tokens.issue(Uuid::new_v4(), "ghost@x.com")?;

    let reply = server.get(&token, "/api/clients").await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "Please authenticate");
    Ok(())
}

#[tokio::test]
async fn public_status_routes_and_unknown_paths() -> Result<()> {
    let server = spawn_server().await?;

    let health = server.send(Method::GET, "/health", None, None).await?;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.data()["status"], "ok");

    let root = server.send(Method::GET, "/", None, None).await?;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["success"], true);

    let response = reqwest::Client::new().get(server.url("/api/nothing-here")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
