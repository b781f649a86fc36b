//! Zombify specs
//!
//! Staff can fail jobs a backend has lost track of.

use crate::prelude::*;

#[tokio::test]
async fn staff_fail_a_stuck_request() {
    let app = study_server();
    app.add_user("admin", true);
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort", "run_model"]).await;
    let cohort = tpp.create_job(request, "generate_cohort").await;
    let model = tpp.create_job(request, "run_model").await;
    tpp.report(cohort, "succeeded").await;
    tpp.report(model, "running").await;

    let res = app.post(&format!("/job-requests/{request}/zombify/"), Some("admin"), json!({})).await;
    assert_eq!(res.status, StatusCode::FOUND);

    let lost = app.api(Method::GET, &format!("/api/jobs/{model}/"), None, None).await;
    assert_eq!(lost.body["status"], "failed");
    assert_eq!(lost.body["status_message"], "Job manually zombified");
    let done = app.api(Method::GET, &format!("/api/jobs/{cohort}/"), None, None).await;
    assert_eq!(done.body["status"], "succeeded");
    assert_eq!(request_page(&app, request).await["job_request"]["status"], "failed");

    // The backend cannot bring it back to life.
    assert_eq!(tpp.report(model, "succeeded").await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn researchers_cannot_zombify() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort"]).await;
    let job = tpp.create_job(request, "generate_cohort").await;
    tpp.report(job, "running").await;

    app.post(&format!("/job-requests/{request}/zombify/"), Some("alice"), json!({})).await;

    let res = app.api(Method::GET, &format!("/api/jobs/{job}/"), None, None).await;
    assert_eq!(res.body["status"], "running");
}
