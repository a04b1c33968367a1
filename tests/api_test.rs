//! HTTP-level tests for the router.
//!
//! The router runs over the real services backed by the in-memory store, so
//! no database is needed. Requests go through `tower::ServiceExt::oneshot`.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        Method, Request, StatusCode,
    },
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{Harness, MASTER_EMAIL, MASTER_PASSWORD};
use service_report::api::{create_router, state::HttpSettings, AppState};

fn app(h: Harness) -> (Router, common::MemoryStore) {
    let store = h.store.clone();
    let http = HttpSettings {
        cookie_secure: false,
        cookie_domain: None,
        frontend_url: "http://localhost:5173".into(),
    };
    let state = AppState::new(Arc::new(h.services), None, http);
    (create_router(state), store)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json, cookie)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body, _) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

fn report_body() -> Value {
    json!({
        "customer": { "name": "Jane Doe", "address": "123 St", "contact": "555-0100" },
        "device": { "name": "X-Ray Unit", "serial": "SN-42", "location": "Room 3" },
        "complaint": "No image output"
    })
}

#[tokio::test]
async fn test_health_without_database() {
    let (app, _) = app(Harness::new());
    let (status, body, _) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"]["status"], "not_configured");
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let (app, _) = app(Harness::new());
    let (status, body, cookie) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": MASTER_EMAIL, "password": MASTER_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["role"], "MASTER_ADMIN");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let cookie = cookie.expect("session cookie");
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=900"));
}

#[tokio::test]
async fn test_login_failure_is_uniform() {
    let (app, _) = app(Harness::new());

    let (wrong_status, wrong_body, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": MASTER_EMAIL, "password": "wrong-password" })),
    )
    .await;
    let (unknown_status, unknown_body, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "nobody@corp.com", "password": "whatever" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_malformed_login_is_validation_error() {
    let (app, _) = app(Harness::new());
    let (status, body, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "not-an-email", "password": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let (app, _) = app(Harness::new());

    let (status, _, _) = send(&app, Method::GET, "/api/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, Method::GET, "/api/v1/reports", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let (app, _) = app(Harness::new());
    let token = login(&app, MASTER_EMAIL, MASTER_PASSWORD).await;

    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header(COOKIE, format!("access_token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (app, _) = app(Harness::new());
    let (status, body, cookie) = send(&app, Method::POST, "/api/v1/auth/logout", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out");
    assert!(cookie.unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_end_to_end_dispatch_flow() {
    let (app, store) = app(Harness::new());
    let master = login(&app, MASTER_EMAIL, MASTER_PASSWORD).await;

    // Master provisions an admin
    let (status, admin, _) = send(
        &app,
        Method::POST,
        "/api/v1/admins",
        Some(&master),
        Some(json!({ "full_name": "Ani", "email": "ani@corp.com", "password": "AdminPass1!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(admin["data"]["role"], "ADMIN");
    let admin_token = login(&app, "ani@corp.com", "AdminPass1!").await;

    // Master may not create technicians directly
    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/v1/teknisi",
        Some(&master),
        Some(json!({ "full_name": "X", "email": "x@corp.com", "password": "Password1!" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin provisions a technician
    let (status, teknisi, _) = send(
        &app,
        Method::POST,
        "/api/v1/teknisi",
        Some(&admin_token),
        Some(json!({ "full_name": "Budi", "email": "budi@corp.com", "password": "TeknisiPass1!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let teknisi_id = teknisi["data"]["id"].as_i64().unwrap();
    let teknisi_token = login(&app, "budi@corp.com", "TeknisiPass1!").await;

    // Admin opens a report and assigns it
    let (status, report, _) = send(
        &app,
        Method::POST,
        "/api/v1/reports",
        Some(&admin_token),
        Some(report_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["data"]["status"], "open");
    let report_id = report["data"]["id"].as_i64().unwrap();

    let (status, assigned, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/reports/{}/assign", report_id),
        Some(&admin_token),
        Some(json!({ "teknisi_id": teknisi_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["data"]["teknisi_id"], teknisi_id);

    // Skipping straight to done is refused
    let progress_uri = format!("/api/v1/teknisi/reports/{}/progress", report_id);
    let (status, body, _) = send(
        &app,
        Method::PATCH,
        &progress_uri,
        Some(&teknisi_token),
        Some(json!({ "status": "done", "job_summary": "x", "action_taken": "y" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    for (next, summary) in [("progress", "diagnosed"), ("done", "repaired")] {
        let (status, body, _) = send(
            &app,
            Method::PATCH,
            &progress_uri,
            Some(&teknisi_token),
            Some(json!({ "status": next, "job_summary": summary, "action_taken": "work" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["status"], next);
    }

    // Technician sees it in their list
    let (status, mine, _) = send(&app, Method::GET, "/api/v1/teknisi/reports", Some(&teknisi_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    // Detail carries the full history
    let (status, detail, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/reports/{}", report_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["data"]["logs"].as_array().unwrap().len(), 2);
    assert!(!detail["data"]["completed_at"].is_null());
    assert_eq!(store.log_count(report_id), 2);

    // Status filter
    let (status, done, _) = send(&app, Method::GET, "/api/v1/reports?status=done", Some(&master), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["data"].as_array().unwrap().len(), 1);

    let (status, _, _) = send(&app, Method::GET, "/api/v1/reports?status=bogus", Some(&master), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_resets_technician_password() {
    let h = Harness::new();
    let mailer = h.mailer.clone();
    let (app, _) = app(h);
    let master = login(&app, MASTER_EMAIL, MASTER_PASSWORD).await;

    send(
        &app,
        Method::POST,
        "/api/v1/admins",
        Some(&master),
        Some(json!({ "full_name": "Ani", "email": "ani@corp.com", "password": "AdminPass1!" })),
    )
    .await;
    let admin = login(&app, "ani@corp.com", "AdminPass1!").await;
    let (_, teknisi, _) = send(
        &app,
        Method::POST,
        "/api/v1/teknisi",
        Some(&admin),
        Some(json!({ "full_name": "Budi", "email": "budi@corp.com", "password": "TeknisiPass1!" })),
    )
    .await;
    let teknisi_id = teknisi["data"]["id"].as_i64().unwrap();

    // Master skipping a level is a role-flow violation
    let (status, body, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/teknisi/{}/reset-password", teknisi_id),
        Some(&master),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "INVALID_ROLE_FLOW");

    let (status, body, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/teknisi/{}/reset-password", teknisi_id),
        Some(&admin),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let temporary = body["data"]["temporary_password"].as_str().unwrap().to_string();
    assert_eq!(mailer.sent().len(), 1);

    login(&app, "budi@corp.com", &temporary).await;
}

#[tokio::test]
async fn test_partner_directory_crud() {
    let (app, _) = app(Harness::new());
    let master = login(&app, MASTER_EMAIL, MASTER_PASSWORD).await;

    let (status, created, _) = send(
        &app,
        Method::POST,
        "/api/v1/partners",
        Some(&master),
        Some(json!({
            "province_code": "32",
            "province_name": "Jawa Barat",
            "hospital_name": "RS Harapan Sehat",
            "address": "Jl. Merdeka 10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["maintenance_count"], 0);
    let id = created["data"]["id"].as_i64().unwrap();

    let (_, listed, _) = send(&app, Method::GET, "/api/v1/partners?province_code=32", Some(&master), None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let (_, other, _) = send(&app, Method::GET, "/api/v1/partners?province_code=31", Some(&master), None).await;
    assert!(other["data"].as_array().unwrap().is_empty());

    let uri = format!("/api/v1/partners/{}", id);
    let (status, _, _) = send(&app, Method::DELETE, &uri, Some(&master), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, Method::DELETE, &uri, Some(&master), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = app(Harness::new());
    let (status, body, _) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/reports"].is_object());
}
