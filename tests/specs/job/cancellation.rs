//! Cancellation specs
//!
//! Researchers record cancellations; backends read them from the queue and
//! report the jobs they stopped.

use crate::prelude::*;

#[tokio::test]
async fn backend_sees_cancelled_actions_on_next_poll() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort", "run_model"]).await;
    let cohort = tpp.create_job(request, "generate_cohort").await;
    let model = tpp.create_job(request, "run_model").await;
    tpp.report(cohort, "running").await;

    let res = app.post(&format!("/job-requests/{request}/cancel/"), Some("alice"), json!({})).await;
    assert_eq!(res.status, StatusCode::FOUND);

    let queue = tpp.poll().await;
    assert_eq!(queue[0]["cancelled_actions"], json!(["generate_cohort", "run_model"]));

    tpp.report(cohort, "cancelled").await;
    tpp.report(model, "cancelled").await;
    let page = request_page(&app, request).await;
    assert_eq!(page["job_request"]["status"], "cancelled");
    assert_eq!(page["can_cancel"], false);
}

#[tokio::test]
async fn cancelling_one_job_leaves_the_rest_running() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort", "run_model"]).await;
    let cohort = tpp.create_job(request, "generate_cohort").await;
    tpp.create_job(request, "run_model").await;
    tpp.report(cohort, "running").await;
    let identifier = app.api(Method::GET, &format!("/api/jobs/{cohort}/"), None, None).await.body
        ["identifier"]
        .as_str()
        .unwrap()
        .to_string();

    app.post(&format!("/jobs/{identifier}/cancel/"), Some("alice"), json!({})).await;

    let queue = tpp.poll().await;
    assert_eq!(queue[0]["cancelled_actions"], json!(["generate_cohort"]));
    assert_eq!(request_page(&app, request).await["job_request"]["status"], "running");
}

#[tokio::test]
async fn finished_requests_ignore_cancellation() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort"]).await;
    let job = tpp.create_job(request, "generate_cohort").await;
    tpp.report(job, "succeeded").await;

    app.post(&format!("/job-requests/{request}/cancel/"), Some("alice"), json!({})).await;

    let queue = tpp.poll().await;
    assert_eq!(queue[0]["cancelled_actions"], json!([]));
    assert_eq!(request_page(&app, request).await["job_request"]["status"], "succeeded");
}
