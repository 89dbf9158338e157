//! Integration tests — account CRUD and role gating.

mod common;

use axum::http::StatusCode;
use common::{PASSWORD, authed, body_json, spawn_app};
use coursekit_core::models::account::Role;

#[tokio::test]
async fn student_cannot_create_users() {
    let app = spawn_app();
    app.seed("Student", "student@example.com", Role::Student).await;
    let (access, _) = app.login("student@example.com").await;

    let resp = app
        .send(authed(
            "POST",
            "/api/users",
            &access,
            Some(serde_json::json!({"name": "Other", "email": "other@example.com", "password": PASSWORD})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["message"], "Insufficient permissions");
}

#[tokio::test]
async fn write_routes_require_authentication_first() {
    let app = spawn_app();
    let resp = app
        .send(
            axum::http::Request::delete("/api/users/anything")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn instructor_manages_users() {
    let app = spawn_app();
    app.seed("Instructor", "instructor@example.com", Role::Instructor).await;
    let (access, _) = app.login("instructor@example.com").await;

    // Create
    let resp = app
        .send(authed(
            "POST",
            "/api/users",
            &access,
            Some(serde_json::json!({
                "name": "  Grace Hopper ",
                "email": "Grace@Example.com",
                "password": PASSWORD,
                "role": "instructor"
            })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["name"], "Grace Hopper");
    assert_eq!(created["email"], "grace@example.com");
    assert_eq!(created["role"], "instructor");
    assert!(created.get("passwordHash").is_none());
    assert!(created.get("password_hash").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    // Update
    let resp = app
        .send(authed(
            "PATCH",
            &format!("/api/users/{id}"),
            &access,
            Some(serde_json::json!({"role": "student", "name": "Grace B. Hopper"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["role"], "student");
    assert_eq!(updated["name"], "Grace B. Hopper");
    assert_eq!(updated["email"], "grace@example.com");

    // Read
    let resp = app
        .send(authed("GET", &format!("/api/users/{id}"), &access, None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["role"], "student");

    // Delete
    let resp = app
        .send(authed("DELETE", &format!("/api/users/{id}"), &access, None))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .send(authed("GET", &format!("/api/users/{id}"), &access, None))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "User not found");
}

#[tokio::test]
async fn missing_user_is_not_found_for_every_verb() {
    let app = spawn_app();
    app.seed("Instructor", "instructor@example.com", Role::Instructor).await;
    let (access, _) = app.login("instructor@example.com").await;

    for (method, body) in [
        ("GET", None),
        ("PATCH", Some(serde_json::json!({"name": "Nobody"}))),
        ("DELETE", None),
    ] {
        let resp = app
            .send(authed(method, "/api/users/not-a-real-id", &access, body))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method}");
    }
}

#[tokio::test]
async fn list_users_paginates_newest_first() {
    let app = spawn_app();
    app.seed("Instructor", "instructor@example.com", Role::Instructor).await;
    for i in 0..4 {
        app.seed(&format!("Student {i}"), &format!("s{i}@example.com"), Role::Student)
            .await;
    }
    let (access, _) = app.login("instructor@example.com").await;

    let resp = app
        .send(authed("GET", "/api/users?page=1&limit=2", &access, None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 3);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["email"], "s3@example.com");
    assert_eq!(items[1]["email"], "s2@example.com");

    let resp = app
        .send(authed("GET", "/api/users?page=3&limit=2", &access, None))
        .await;
    let body = body_json(resp).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["email"], "instructor@example.com");
}

#[tokio::test]
async fn students_can_read_users() {
    let app = spawn_app();
    app.seed("Student", "student@example.com", Role::Student).await;
    let (access, _) = app.login("student@example.com").await;

    let resp = app.send(authed("GET", "/api/users", &access, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["total"], 1);
}

#[tokio::test]
async fn duplicate_email_on_update_conflicts() {
    let app = spawn_app();
    app.seed("Instructor", "instructor@example.com", Role::Instructor).await;
    let other = app.seed("Student", "student@example.com", Role::Student).await;
    let (access, _) = app.login("instructor@example.com").await;

    let resp = app
        .send(authed(
            "PATCH",
            &format!("/api/users/{other}"),
            &access,
            Some(serde_json::json!({"email": "instructor@example.com"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let app = spawn_app();
    app.seed("Instructor", "instructor@example.com", Role::Instructor).await;
    let (access, _) = app.login("instructor@example.com").await;

    let resp = app
        .send(authed(
            "POST",
            "/api/users",
            &access,
            Some(serde_json::json!({
                "name": "Root",
                "email": "root@example.com",
                "password": PASSWORD,
                "role": "admin"
            })),
        ))
        .await;
    assert!(resp.status().is_client_error());
}
