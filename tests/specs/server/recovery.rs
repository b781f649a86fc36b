//! Recovery specs
//!
//! Everything recorded before a shutdown or a crash is there after the
//! next startup.

use crate::prelude::*;

async fn busy_server() -> (TestApp, u64, u64) {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort", "run_model"]).await;
    let job = tpp.create_job(request, "generate_cohort").await;
    tpp.report(job, "running").await;
    app.post(&format!("/job-requests/{request}/cancel/"), Some("alice"), json!({})).await;
    (app, request, job)
}

#[tokio::test]
async fn clean_restart_keeps_everything() {
    let (app, request, job) = busy_server().await;
    let token = app.backend_token("tpp");

    let app = app.restart(true);

    assert_eq!(app.backend_token("tpp"), token);
    let queue = Backend::new(&app, "tpp").poll().await;
    assert_eq!(queue[0]["id"], request);
    assert_eq!(queue[0]["cancelled_actions"], json!(["generate_cohort"]));
    let res = app.api(Method::GET, &format!("/api/jobs/{job}/"), None, None).await;
    assert_eq!(res.body["status"], "running");
}

#[tokio::test]
async fn crash_replays_the_log() {
    let (app, request, job) = busy_server().await;

    let app = app.restart(false);

    let page = request_page(&app, request).await;
    assert_eq!(page["job_request"]["status"], "running");
    assert_eq!(page["job_request"]["jobs"][0]["id"], job);
    let settings = app.get("/settings/", Some("alice")).await;
    assert_eq!(settings.body["username"], "alice");
}

#[tokio::test]
async fn ids_keep_counting_after_restart() {
    let (app, request, _) = busy_server().await;

    let app = app.restart(false);
    let next = request_actions(&app, &["run_model"]).await;

    assert_eq!(next, request + 1);
}
