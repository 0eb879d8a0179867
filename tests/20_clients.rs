mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{days_from_now, spawn_server};

#[tokio::test]
async fn create_and_list_clients_newest_first() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup("a@x.com").await?;
    let user_id = server.state.tokens.verify(&token)?.id;

    let reply = server
        .post(
            &token,
            "/api/clients",
            json!({ "name": "Acme", "email": "c@acme.com", "phone": "555", "company": "Acme Inc" }),
        )
        .await?;
    assert_eq!(reply.status, StatusCode::CREATED);
    let acme = reply.data();
    assert_eq!(acme["name"], "Acme");
    assert_eq!(acme["company"], "Acme Inc");
    assert_eq!(acme["notes"], Value::Null);
    assert_eq!(acme["userId"], user_id.to_string());
    assert!(acme["createdAt"].is_string());

    let globex = server.create_client(&token, "Globex").await?;

    let list = server.get(&token, "/api/clients").await?;
    assert_eq!(list.status, StatusCode::OK);
    let names: Vec<&str> = list
        .data()
        .as_array()
        .map(|rows| rows.iter().filter_map(|c| c["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Globex", "Acme"]);
    assert_eq!(list.data()[0]["id"], globex);
    Ok(())
}

#[tokio::test]
async fn client_validation_errors() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup("a@x.com").await?;

    let reply = server
        .post(&token, "/api/clients", json!({ "name": "Acme", "email": "c@acme.com" }))
        .await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Phone number is required");
    assert_eq!(reply.body["field_errors"]["phone"], "Phone number is required");

    let reply = server
        .post(&token, "/api/clients", json!({ "name": "Acme", "email": "nope", "phone": "555" }))
        .await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Invalid email address");

    let reply = server
        .post(&token, "/api/clients", json!({ "email": "c@acme.com", "phone": "555" }))
        .await?;
    assert_eq!(reply.body["error"], "Name is required");
    Ok(())
}

#[tokio::test]
async fn client_detail_includes_projects_and_reminders() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup("a@x.com").await?;
    let client_id = server.create_client(&token, "Acme").await?;
    let project_id = server.create_project(&token, &client_id, "Site").await?;
    server
        .create_reminder(
            &token,
            json!({ "title": "Call", "dueDate": days_from_now(2), "clientId": client_id }),
        )
        .await?;

    let reply = server.get(&token, &format!("/api/clients/{}", client_id)).await?;
    assert_eq!(reply.status, StatusCode::OK);
    let detail = reply.data();
    assert_eq!(detail["id"], client_id);
    assert_eq!(detail["projects"][0]["id"], project_id);
    assert_eq!(detail["reminders"][0]["title"], "Call");
    Ok(())
}

#[tokio::test]
async fn patch_changes_only_present_fields() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup("a@x.com").await?;
    let client_id = server.create_client(&token, "Acme").await?;
    let path = format!("/api/clients/{}", client_id);

    let reply = server.patch(&token, &path, json!({ "phone": "555-9999" })).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.data()["phone"], "555-9999");
    assert_eq!(reply.data()["name"], "Acme");

    // null is the same as absent
    let reply = server.patch(&token, &path, json!({ "name": null, "notes": "VIP" })).await?;
    assert_eq!(reply.data()["name"], "Acme");
    assert_eq!(reply.data()["notes"], "VIP");

    let reply = server.patch(&token, &path, json!({ "email": "broken" })).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = server.patch(&token, &path, json!({ "name": "   " })).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Name is required");
    Ok(())
}

#[tokio::test]
async fn delete_removes_client_and_dependents() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup("a@x.com").await?;
    let client_id = server.create_client(&token, "Acme").await?;
    let project_id = server.create_project(&token, &client_id, "Site").await?;
    let reminder_id = server
        .create_reminder(
            &token,
            json!({ "title": "Ship", "dueDate": days_from_now(1), "projectId": project_id }),
        )
        .await?;

    let reply = server.delete(&token, &format!("/api/clients/{}", client_id)).await?;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(reply.body, Value::Null);

    let reply = server.get(&token, &format!("/api/clients/{}", client_id)).await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Client not found");

    let project = server.get(&token, &format!("/api/projects/{}", project_id)).await?;
    assert_eq!(project.status, StatusCode::NOT_FOUND);
    let reminder = server.get(&token, &format!("/api/reminders/{}", reminder_id)).await?;
    assert_eq!(reminder.status, StatusCode::NOT_FOUND);

    let again = server.delete(&token, &format!("/api/clients/{}", client_id)).await?;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_uuid_ids_are_not_found() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup("a@x.com").await?;

    let reply = server.get(&token, "/api/clients/123").await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "NOT_FOUND");

    let reply = server.patch(&token, "/api/clients/abc", json!({ "name": "X" })).await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    Ok(())
}
