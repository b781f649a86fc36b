//! Backend token specs

use crate::prelude::*;

#[tokio::test]
async fn api_writes_need_a_valid_token() {
    let app = study_server();
    let request = request_actions(&app, &["generate_cohort"]).await;
    let body = json!({ "job_request_id": request, "action": "generate_cohort" });

    let missing = app.api(Method::POST, "/api/jobs/", None, Some(body.clone())).await;
    let wrong = app.api(Method::POST, "/api/jobs/", Some("not-a-token"), Some(body)).await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], "Invalid or missing backend token.");
}

#[tokio::test]
async fn rotated_token_locks_out_the_old_one() {
    let app = study_server();
    app.add_user("admin", true);
    let old = app.backend_token("tpp");
    let id = app.state.store.read(|s| s.backend_by_name("tpp").map(|b| b.id)).unwrap();

    let res = app.post(&format!("/backends/{id}/rotate-token/"), Some("admin"), json!({})).await;
    assert_eq!(res.status, StatusCode::FOUND);

    let rejected = app.api(Method::GET, "/api/job-requests/", Some(&old), None).await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
    assert!(Backend::new(&app, "tpp").poll().await.is_empty());
}

#[tokio::test]
async fn one_backend_cannot_touch_anothers_jobs() {
    let app = study_server();
    let request = request_actions(&app, &["generate_cohort"]).await;
    let job = Backend::new(&app, "tpp").create_job(request, "generate_cohort").await;

    let emis = Backend::new(&app, "emis");
    let res = emis.report(job, "failed").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let body = json!({ "job_request_id": request, "action": "run_model" });
    let token = app.backend_token("emis");
    let create = app.api(Method::POST, "/api/jobs/", Some(&token), Some(body)).await;
    assert_eq!(create.status, StatusCode::BAD_REQUEST);
}
