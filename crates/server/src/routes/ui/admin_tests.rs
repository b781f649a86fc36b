// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::{Method, StatusCode};
use js_core::ProjectRole;
use serde_json::json;

use crate::test_helpers::TestApp;

fn setup() -> TestApp {
    let app = TestApp::new();
    app.add_user("admin", true);
    app.add_user("alice", false);
    app
}

#[tokio::test]
async fn staff_only() {
    let app = setup();

    for path in ["/backends/", "/backends/1/", "/orgs/"] {
        let anonymous = app.get(path, None).await;
        let member = app.get(path, Some("alice")).await;
        assert_eq!(anonymous.status, StatusCode::FOUND, "{path}");
        assert_eq!(member.location(), Some(format!("/login/?next={path}").as_str()), "{path}");
    }
}

#[tokio::test]
async fn backends_show_their_tokens() {
    let app = setup();

    let res = app.get("/backends/", Some("admin")).await;

    let backends = res.body.as_array().unwrap();
    assert_eq!(backends.len(), 3);
    assert_eq!(backends[0]["name"], "tpp");
    assert_eq!(backends[0]["auth_token"], app.backend_token("tpp"));
    assert_eq!(backends[0]["last_seen"], "never");
}

#[tokio::test]
async fn unknown_backend_is_not_found() {
    let app = setup();
    let detail = app.get("/backends/99/", Some("admin")).await;
    let rotate = app.post("/backends/99/rotate-token/", Some("admin"), json!({})).await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);
    assert_eq!(rotate.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rotating_a_token_revokes_the_old_one() {
    let app = setup();
    let old = app.backend_token("tpp");

    let res = app.post("/backends/1/rotate-token/", Some("admin"), json!({})).await;

    assert_eq!(res.location(), Some("/backends/1/"));
    let new = app.backend_token("tpp");
    assert_ne!(old, new);
    let rejected = app.api(Method::GET, "/api/job-requests/", Some(&old), None).await;
    let accepted = app.api(Method::GET, "/api/job-requests/", Some(&new), None).await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
    assert_eq!(accepted.status, StatusCode::OK);
}

#[tokio::test]
async fn create_org_slugifies_the_name() {
    let app = setup();

    let res = app.post("/orgs/", Some("admin"), json!({ "name": "University of Oxford" })).await;

    assert_eq!(res.location(), Some("/orgs/university-of-oxford/"));
    let org = app.get("/orgs/university-of-oxford/", Some("admin")).await;
    assert_eq!(org.body["name"], "University of Oxford");
    assert_eq!(org.body["projects"], json!([]));
}

#[tokio::test]
async fn create_org_rejects_clashing_and_empty_slugs() {
    let app = setup();
    app.post("/orgs/", Some("admin"), json!({ "name": "Oxford" })).await;

    let clash = app.post("/orgs/", Some("admin"), json!({ "name": "OXFORD!" })).await;
    let symbols = app.post("/orgs/", Some("admin"), json!({ "name": "!!!" })).await;
    let blank = app.post("/orgs/", Some("admin"), json!({ "name": "" })).await;

    assert_eq!(clash.status, StatusCode::BAD_REQUEST);
    assert_eq!(clash.body["errors"]["name"][0], "An organisation with this name already exists.");
    assert_eq!(symbols.body["errors"]["name"][0], "Name must contain at least one letter or digit.");
    assert_eq!(blank.body["errors"]["name"][0], "This field is required.");
}

#[tokio::test]
async fn create_project_under_an_org() {
    let app = setup();
    app.post("/orgs/", Some("admin"), json!({ "name": "Oxford" })).await;
    let form = json!({ "name": "Covid Vaccines", "project_lead": "Dr Smith", "email": "lead@example.com" });

    let res = app.post("/orgs/oxford/new-project/", Some("admin"), form.clone()).await;
    let again = app.post("/orgs/oxford/new-project/", Some("admin"), form.clone()).await;
    let orphan = app.post("/orgs/nowhere/new-project/", Some("admin"), form).await;

    assert_eq!(res.location(), Some("/orgs/oxford/covid-vaccines/"));
    assert_eq!(
        again.body["errors"]["name"][0],
        "A project with this name already exists in this organisation."
    );
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);
    let org = app.get("/orgs/oxford/", Some("admin")).await;
    assert_eq!(org.body["projects"][0]["slug"], "covid-vaccines");
    assert_eq!(org.body["projects"][0]["project_lead"], "Dr Smith");
}

#[tokio::test]
async fn create_project_validates_the_form() {
    let app = setup();
    app.post("/orgs/", Some("admin"), json!({ "name": "Oxford" })).await;

    let res = app
        .post("/orgs/oxford/new-project/", Some("admin"), json!({ "name": "Trial", "email": "nope" }))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"]["project_lead"][0], "This field is required.");
    assert_eq!(res.body["errors"]["email"][0], "Enter a valid email address.");
}

#[tokio::test]
async fn membership_sets_roles() {
    let app = setup();
    let admin = app.state.store.read(|s| s.user_by_username("admin").cloned()).unwrap();
    let (_, project) = app.add_project("oxford", "trial", admin.id);
    app.add_project_workspace("trial-data", project.id, admin.id);
    let form = json!({ "username": "alice", "roles": ["project_developer", "project_developer"] });

    let res = app.post("/orgs/oxford/trial/members/", Some("admin"), form).await;

    assert_eq!(res.location(), Some("/orgs/oxford/trial/"));
    let detail = app.get("/orgs/oxford/trial/", Some("admin")).await;
    assert_eq!(detail.body["memberships"], json!([{ "username": "alice", "roles": ["project_developer"] }]));
    assert_eq!(detail.body["workspaces"][0]["name"], "trial-data");
    let alice = app.state.store.read(|s| s.user_by_username("alice").cloned()).unwrap();
    let roles = app.state.store.read(|s| {
        s.memberships_for_project(&project).iter().find(|m| m.user == alice.id).map(|m| m.roles.clone())
    });
    assert_eq!(roles, Some(vec![ProjectRole::ProjectDeveloper]));
}

#[tokio::test]
async fn membership_needs_a_known_user_and_role() {
    let app = setup();
    let admin = app.state.store.read(|s| s.user_by_username("admin").cloned()).unwrap();
    app.add_project("oxford", "trial", admin.id);

    let stranger =
        app.post("/orgs/oxford/trial/members/", Some("admin"), json!({ "username": "bob" })).await;
    let bad_role = app
        .post("/orgs/oxford/trial/members/", Some("admin"), json!({ "username": "alice", "roles": ["boss"] }))
        .await;

    assert_eq!(stranger.status, StatusCode::BAD_REQUEST);
    assert_eq!(stranger.body["errors"]["username"][0], "Unknown user \"bob\"");
    assert_eq!(
        bad_role.body["errors"]["roles"][0],
        "Select a valid choice. boss is not one of the available choices."
    );
}
