//! Job lifecycle specs
//!
//! A researcher requests actions, the backend picks the request up, creates
//! jobs for it and reports progress until everything has finished.

use crate::prelude::*;

#[tokio::test]
async fn requested_actions_run_to_completion() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");

    let request = request_actions(&app, &["generate_cohort", "run_model"]).await;

    let queue = tpp.poll().await;
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["id"], request);
    assert_eq!(queue[0]["sha"], "5ca1ab1e");
    assert_eq!(queue[0]["workspace"]["name"], "study");
    assert_eq!(queue[0]["requested_actions"], json!(["generate_cohort", "run_model"]));
    assert_eq!(request_page(&app, request).await["job_request"]["status"], "pending");

    let cohort = tpp.create_job(request, "generate_cohort").await;
    let model = tpp.create_job(request, "run_model").await;
    assert_eq!(tpp.report(cohort, "running").await.status, StatusCode::OK);
    assert_eq!(request_page(&app, request).await["job_request"]["status"], "running");

    tpp.report(cohort, "succeeded").await;
    tpp.report(model, "running").await;
    tpp.report(model, "succeeded").await;

    let page = request_page(&app, request).await;
    assert_eq!(page["job_request"]["status"], "succeeded");
    assert_eq!(page["can_cancel"], false);
    let jobs = page["job_request"]["jobs"].as_array().unwrap();
    assert!(jobs.iter().all(|job| job["completed_at"].is_string()));
}

#[tokio::test]
async fn workspace_page_tracks_latest_action_status() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");

    let first = request_actions(&app, &["generate_cohort"]).await;
    let job = tpp.create_job(first, "generate_cohort").await;
    tpp.report(job, "failed").await;
    let second = request_actions(&app, &["generate_cohort"]).await;
    let retry = tpp.create_job(second, "generate_cohort").await;
    tpp.report(retry, "running").await;

    let page = app.get("/workspaces/study/", Some("alice")).await;

    let statuses: Vec<_> =
        page.body["actions"].as_array().unwrap().iter().map(|a| a["status"].clone()).collect();
    assert_eq!(statuses, vec![json!("running"), json!("-"), json!("-")]);
    let logs = app.get("/workspaces/study/logs/", None).await;
    let ids: Vec<_> = logs.body["results"].as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(second), json!(first)]);
}

#[tokio::test]
async fn backends_only_see_their_own_queue() {
    let app = study_server();
    app.add_user("admin", true);
    request_actions(&app, &["run_all"]).await;
    app.post("/workspaces/study/", Some("admin"), json!({ "requested_actions": ["run_all"], "backend": "emis" }))
        .await;

    let tpp = Backend::new(&app, "tpp").poll().await;
    let emis = Backend::new(&app, "emis").poll().await;

    assert_eq!(tpp.len(), 1);
    assert_eq!(emis.len(), 1);
    assert_eq!(emis[0]["backend"], "emis");
    assert_eq!(emis[0]["created_by"], "admin");
}

#[tokio::test]
async fn finished_jobs_cannot_be_reopened() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort"]).await;
    let job = tpp.create_job(request, "generate_cohort").await;
    tpp.report(job, "succeeded").await;

    let res = tpp.report(job, "running").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(request_page(&app, request).await["job_request"]["status"], "succeeded");
}
