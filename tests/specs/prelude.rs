//! Shared setup for the specs

pub use axum::http::{Method, StatusCode};
pub use js_server::test_helpers::{TestApp, TestResponse};
pub use serde_json::{json, Value};

pub const REPO: &str = "https://github.com/opensafely/study";

pub const PROJECT_YAML: &str = r#"
version: "3.0"
actions:
  generate_cohort:
    run: cohortextractor:latest generate_cohort
  run_model:
    run: stata-mp:latest analysis/model.do
    needs: [generate_cohort]
"#;

/// A server with one org member, an admin, and the `study` repo on the
/// repo host.
pub fn study_server() -> TestApp {
    let app = TestApp::new();
    app.membership.add_member("alice");
    app.repo_host.add_repo("study", REPO, &["main"]);
    app.repo_host.set_pipeline(REPO, PROJECT_YAML);
    app.repo_host.set_sha(REPO, "main", "5ca1ab1e");
    app
}

/// Create the `study` workspace and request `actions` in it as alice.
/// Returns the new request's id.
pub async fn request_actions(app: &TestApp, actions: &[&str]) -> u64 {
    if app.state.store.read(|s| s.workspace_by_name("study").is_none()) {
        let form = json!({ "name": "study", "repo": REPO, "branch": "main", "db": "full" });
        let created = app.post("/workspaces/", Some("alice"), form).await;
        assert_eq!(created.status, StatusCode::FOUND, "{:?}", created.body);
    }
    let run = app.post("/workspaces/study/", Some("alice"), json!({ "requested_actions": actions })).await;
    assert_eq!(run.location(), Some("/workspaces/study/logs/"), "{:?}", run.body);
    app.state.store.read(|s| s.job_requests.keys().max().map(|id| id.get())).unwrap()
}

/// A backend talking to the REST API with its current token.
pub struct Backend<'a> {
    pub app: &'a TestApp,
    pub name: &'static str,
}

impl<'a> Backend<'a> {
    pub fn new(app: &'a TestApp, name: &'static str) -> Self {
        Self { app, name }
    }

    fn token(&self) -> String {
        self.app.backend_token(self.name)
    }

    pub async fn poll(&self) -> Vec<Value> {
        let res = self.app.api(Method::GET, "/api/job-requests/", Some(&self.token()), None).await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
        res.body["results"].as_array().cloned().unwrap_or_default()
    }

    pub async fn create_job(&self, request: u64, action: &str) -> u64 {
        let body = json!({ "job_request_id": request, "action": action, "status": "pending" });
        let res = self.app.api(Method::POST, "/api/jobs/", Some(&self.token()), Some(body)).await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
        res.body["id"].as_u64().unwrap()
    }

    pub async fn report(&self, job: u64, status: &str) -> TestResponse {
        let path = format!("/api/jobs/{job}/");
        self.app.api(Method::PATCH, &path, Some(&self.token()), Some(json!({ "status": status }))).await
    }
}

/// The request as the UI detail page shows it.
pub async fn request_page(app: &TestApp, id: u64) -> Value {
    let res = app.get(&format!("/job-requests/{id}/"), Some("alice")).await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    res.body
}
