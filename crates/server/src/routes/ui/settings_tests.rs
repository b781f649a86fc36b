// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use serde_json::json;

use crate::test_helpers::TestApp;

#[tokio::test]
async fn settings_require_login() {
    let app = TestApp::new();

    let res = app.get("/settings/", None).await;

    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/login/?next=/settings/"));
}

#[tokio::test]
async fn show_current_settings() {
    let app = TestApp::new();
    app.add_user("alice", false);

    let res = app.get("/settings/", Some("alice")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["notifications_email"], "");
}

#[tokio::test]
async fn update_stores_notifications_email() {
    let app = TestApp::new();
    app.add_user("alice", false);

    let res = app
        .post("/settings/", Some("alice"), json!({ "notifications_email": " alice@example.com " }))
        .await;

    assert_eq!(res.location(), Some("/"));
    assert_eq!(res.body["message"], "Settings saved successfully");
    let shown = app.get("/settings/", Some("alice")).await;
    assert_eq!(shown.body["notifications_email"], "alice@example.com");
}

#[tokio::test]
async fn update_rejects_bad_email() {
    let app = TestApp::new();
    app.add_user("alice", false);

    let invalid = app.post("/settings/", Some("alice"), json!({ "notifications_email": "alice" })).await;
    let missing = app.post("/settings/", Some("alice"), json!({})).await;

    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["errors"]["notifications_email"][0], "Enter a valid email address.");
    assert_eq!(missing.body["errors"]["notifications_email"][0], "This field is required.");
}
