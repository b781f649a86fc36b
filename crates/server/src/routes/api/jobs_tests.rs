// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::{Method, StatusCode};
use js_core::{JobRequest, JobStatus};
use serde_json::json;

use crate::test_helpers::TestApp;

const NOW: &str = "2026-01-01T00:00:00.000Z";

fn setup() -> (TestApp, JobRequest, String) {
    let app = TestApp::new();
    let alice = app.add_user("alice", false);
    let workspace = app.add_workspace("study", alice.id);
    let request = app.add_job_request(&workspace, "tpp", &["generate_cohort"], alice.id);
    let token = app.backend_token("tpp");
    (app, request, token)
}

#[tokio::test]
async fn create_requires_backend_token() {
    let (app, request, _) = setup();
    let body = json!({ "job_request_id": request.id.get(), "action": "generate_cohort" });

    let missing = app.api(Method::POST, "/api/jobs/", None, Some(body.clone())).await;
    let wrong = app.api(Method::POST, "/api/jobs/", Some("nope"), Some(body)).await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert!(app.state.store.read(|s| s.jobs.is_empty()));
}

#[tokio::test]
async fn create_job_for_own_request() {
    let (app, request, token) = setup();

    let res = app
        .api(
            Method::POST,
            "/api/jobs/",
            Some(&token),
            Some(json!({
                "job_request_id": request.id.get(),
                "action": "generate_cohort",
                "identifier": "abcdefghjkmnpqrs",
                "status": "pending",
                "status_message": "Waiting",
            })),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["identifier"], "abcdefghjkmnpqrs");
    assert_eq!(res.body["status"], "pending");
    assert_eq!(res.body["status_message"], "Waiting");
    assert_eq!(res.body["backend"], "tpp");
    assert_eq!(res.body["workspace"]["name"], "study");
    assert_eq!(res.body["url"], "http://testserver/api/jobs/1/");
    assert!(res.body["started_at"].is_null());
}

#[tokio::test]
async fn create_generates_identifier_when_absent() {
    let (app, request, token) = setup();
    let body = json!({ "job_request_id": request.id.get(), "action": "generate_cohort" });

    let res = app.api(Method::POST, "/api/jobs/", Some(&token), Some(body)).await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["identifier"].as_str().map(str::len), Some(16));
    assert_eq!(res.body["status"], "");
}

#[tokio::test]
async fn create_stamps_completion_for_terminal_status() {
    let (app, request, token) = setup();
    let body = json!({
        "job_request_id": request.id.get(),
        "action": "generate_cohort",
        "status": "succeeded",
    });

    let res = app.api(Method::POST, "/api/jobs/", Some(&token), Some(body)).await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["completed_at"], NOW);
}

#[tokio::test]
async fn create_rejects_other_backends_request() {
    let (app, request, _) = setup();
    let emis = app.backend_token("emis");
    let body = json!({ "job_request_id": request.id.get(), "action": "generate_cohort" });

    let res = app.api(Method::POST, "/api/jobs/", Some(&emis), Some(body)).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"]["job_request_id"][0], "Invalid pk \"1\" - object does not exist.");
}

#[tokio::test]
async fn create_rejects_mismatched_workspace() {
    let (app, request, token) = setup();
    let body = json!({
        "job_request_id": request.id.get(),
        "action": "generate_cohort",
        "workspace_id": 99,
    });

    let res = app.api(Method::POST, "/api/jobs/", Some(&token), Some(body)).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"]["workspace_id"][0], "Does not match the job request's workspace");
}

#[tokio::test]
async fn create_rejects_duplicate_identifier() {
    let (app, request, token) = setup();
    let body = json!({
        "job_request_id": request.id.get(),
        "action": "generate_cohort",
        "identifier": "samesame",
    });

    let first = app.api(Method::POST, "/api/jobs/", Some(&token), Some(body.clone())).await;
    let second = app.api(Method::POST, "/api/jobs/", Some(&token), Some(body)).await;

    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert!(second.body["errors"]["identifier"].is_array());
}

#[tokio::test]
async fn create_reports_missing_fields() {
    let (app, _, token) = setup();

    let res = app.api(Method::POST, "/api/jobs/", Some(&token), Some(json!({}))).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"]["job_request_id"][0], "This field is required.");
    assert_eq!(res.body["errors"]["action"][0], "This field is required.");
}

#[tokio::test]
async fn update_moves_job_forward() {
    let (app, request, token) = setup();
    let job = app.add_job(request.id, "generate_cohort", JobStatus::Pending);
    let path = format!("/api/jobs/{}/", job.id);

    let res = app.api(Method::PATCH, &path, Some(&token), Some(json!({ "status": "running" }))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "running");
    assert_eq!(res.body["started_at"], NOW);
    assert_eq!(app.job(job.id).status, JobStatus::Running);
}

#[tokio::test]
async fn update_cannot_leave_terminal_status() {
    let (app, request, token) = setup();
    let job = app.add_job(request.id, "generate_cohort", JobStatus::Succeeded);
    let path = format!("/api/jobs/{}/", job.id);

    let res = app.api(Method::PATCH, &path, Some(&token), Some(json!({ "status": "running" }))).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"]["status"][0], "Cannot change a succeeded job to running");
    assert_eq!(app.job(job.id).status, JobStatus::Succeeded);
}

#[tokio::test]
async fn outputs_can_only_be_set_once() {
    let (app, request, token) = setup();
    let job = app.add_job(request.id, "generate_cohort", JobStatus::Running);
    let path = format!("/api/jobs/{}/", job.id);
    let outputs = json!({
        "status": "succeeded",
        "outputs": [{ "name": "cohort.csv", "location": "output/cohort.csv", "privacy_level": "high" }],
    });

    let first = app.api(Method::PATCH, &path, Some(&token), Some(outputs.clone())).await;
    let second = app.api(Method::PATCH, &path, Some(&token), Some(outputs)).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["outputs"][0]["name"], "cohort.csv");
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["errors"]["non_field_errors"][0], "You can only set outputs for a job once");
}

#[tokio::test]
async fn update_rejects_workspace_change() {
    let (app, request, token) = setup();
    let job = app.add_job(request.id, "generate_cohort", JobStatus::Pending);
    let path = format!("/api/jobs/{}/", job.id);

    let res = app.api(Method::PATCH, &path, Some(&token), Some(json!({ "workspace_id": 2 }))).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"]["non_field_errors"][0], "You cannot change a job's workspace");
}

#[tokio::test]
async fn other_backends_jobs_are_not_found() {
    let (app, request, _) = setup();
    let job = app.add_job(request.id, "generate_cohort", JobStatus::Pending);
    let emis = app.backend_token("emis");
    let path = format!("/api/jobs/{}/", job.id);

    let res = app.api(Method::PATCH, &path, Some(&emis), Some(json!({ "status": "running" }))).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(app.job(job.id).status, JobStatus::Pending);
}

#[tokio::test]
async fn list_pages_newest_first() {
    let (app, request, _) = setup();
    for _ in 0..3 {
        app.add_job(request.id, "generate_cohort", JobStatus::Pending);
    }

    let first = app.api(Method::GET, "/api/jobs/?page_size=2", None, None).await;
    let ids: Vec<_> = first.body["results"].as_array().unwrap().iter().map(|j| j["id"].clone()).collect();
    assert_eq!(ids, vec![json!(3), json!(2)]);
    assert_eq!(first.body["next"], "2");

    let second = app.api(Method::GET, "/api/jobs/?page_size=2&cursor=2", None, None).await;
    assert_eq!(second.body["results"].as_array().unwrap().len(), 1);
    assert!(second.body["next"].is_null());
}

#[tokio::test]
async fn list_filters_by_job_request() {
    let (app, request, _) = setup();
    let alice = app.state.store.read(|s| s.user_by_username("alice").cloned()).unwrap();
    let workspace = app.state.store.read(|s| s.workspace_by_name("study").cloned()).unwrap();
    let other = app.add_job_request(&workspace, "tpp", &["analyse"], alice.id);
    app.add_job(request.id, "generate_cohort", JobStatus::Pending);
    app.add_job(other.id, "analyse", JobStatus::Pending);

    let path = format!("/api/jobs/?job_request_id={}", other.id);
    let res = app.api(Method::GET, &path, None, None).await;

    let results = res.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["action"], "analyse");
}

#[tokio::test]
async fn detail_is_public() {
    let (app, request, _) = setup();
    let job = app.add_job(request.id, "generate_cohort", JobStatus::Running);

    let found = app.api(Method::GET, &format!("/api/jobs/{}/", job.id), None, None).await;
    let missing = app.api(Method::GET, "/api/jobs/999/", None, None).await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["identifier"], job.identifier);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
