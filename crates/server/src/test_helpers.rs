// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process server harness for handler and end-to-end tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use js_adapters::{FakeMembership, FakeRepoHost};
use js_core::test_support::{
    job_created_event, job_updated_event, user_created_event, workspace_created_event,
};
use js_core::{
    Clock, Event, FakeClock, Job, JobRequest, JobRequestId, JobStatus, Org, Project, ProjectId,
    ProjectRole, User, UserId, Workspace,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::app::{AppState, Deps};
use crate::config::Config;
use crate::lifecycle::{startup, Server};
use crate::routes::router;

/// Fakes for every collaborator.
pub struct TestDeps;

impl Deps for TestDeps {
    type Membership = FakeMembership;
    type RepoHost = FakeRepoHost;
    type Clock = FakeClock;
}

/// A started server over a temporary state directory, driven through its
/// router without a socket.
pub struct TestApp {
    pub state: AppState<TestDeps>,
    pub membership: FakeMembership,
    pub repo_host: FakeRepoHost,
    pub clock: FakeClock,
    pub server: Server,
    _dir: TempDir,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body; `Null` when the body is empty.
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(f: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            state_dir: dir.path().to_path_buf(),
            admin_users: vec!["admin".to_string()],
            login_url: "/login/".to_string(),
            base_url: "http://testserver".to_string(),
            ..Config::default()
        };
        f(&mut config);

        let clock = FakeClock::new();
        let server = startup(&config, &clock).unwrap();
        let membership = FakeMembership::new();
        let repo_host = FakeRepoHost::new();
        let state = AppState::new(
            config,
            server.store.clone(),
            membership.clone(),
            repo_host.clone(),
            clock.clone(),
        );
        Self { state, membership, repo_host, clock, server, _dir: dir }
    }

    /// Shut down cleanly, or crash when `clean` is false, and start again
    /// over the same state directory with the same fakes.
    pub fn restart(self, clean: bool) -> Self {
        let Self { state, membership, repo_host, clock, server, _dir } = self;
        if clean {
            server.shutdown();
        }
        let config = (*state.config).clone();
        drop(state);
        drop(server);

        let server = startup(&config, &clock).unwrap();
        let state = AppState::new(
            config,
            server.store.clone(),
            membership.clone(),
            repo_host.clone(),
            clock.clone(),
        );
        Self { state, membership, repo_host, clock, server, _dir }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        TestResponse { status, headers, body }
    }

    fn build(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, String)],
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn user_headers(&self, user: Option<&str>) -> Vec<(&str, String)> {
        match user {
            Some(name) => vec![(self.state.config.user_header.as_str(), name.to_string())],
            None => Vec::new(),
        }
    }

    /// GET a UI path, as `user` when given.
    pub async fn get(&self, path: &str, user: Option<&str>) -> TestResponse {
        let headers = self.user_headers(user);
        self.send(self.build(Method::GET, path, &headers, None)).await
    }

    /// POST a UI form as JSON, as `user` when given.
    pub async fn post(&self, path: &str, user: Option<&str>, body: Value) -> TestResponse {
        let headers = self.user_headers(user);
        self.send(self.build(Method::POST, path, &headers, Some(body))).await
    }

    /// Call the REST API with an optional backend token.
    pub async fn api(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let headers: Vec<(&str, String)> = match token {
            Some(token) => vec![(header::AUTHORIZATION.as_str(), format!("Bearer {token}"))],
            None => Vec::new(),
        };
        self.send(self.build(method, path, &headers, body)).await
    }

    // ── State setup ──

    pub fn emit(&self, events: Vec<Event>) {
        self.state.store.emit(events).unwrap();
    }

    pub fn backend_token(&self, name: &str) -> String {
        self.state.store.read(|s| s.backend_by_name(name).map(|b| b.auth_token.clone())).unwrap()
    }

    pub fn add_user(&self, username: &str, is_superuser: bool) -> User {
        let id = self.state.store.read(|s| s.next_user_id());
        self.emit(vec![user_created_event(id.get(), username, is_superuser)]);
        self.state.store.read(|s| s.users.get(&id).cloned()).unwrap()
    }

    pub fn add_workspace(&self, name: &str, created_by: UserId) -> Workspace {
        let id = self.state.store.read(|s| s.next_workspace_id());
        self.emit(vec![workspace_created_event(id.get(), name, created_by.get())]);
        self.state.store.read(|s| s.workspaces.get(&id).cloned()).unwrap()
    }

    /// A workspace that belongs to `project`.
    pub fn add_project_workspace(&self, name: &str, project: ProjectId, created_by: UserId) -> Workspace {
        let id = self.state.store.read(|s| s.next_workspace_id());
        self.emit(vec![Event::WorkspaceCreated {
            id,
            name: name.to_string(),
            repo: format!("https://github.com/opensafely/{name}"),
            branch: "main".to_string(),
            db: "full".to_string(),
            project: Some(project),
            created_by,
            created_at_ms: self.clock.epoch_ms(),
            should_notify: false,
        }]);
        self.state.store.read(|s| s.workspaces.get(&id).cloned()).unwrap()
    }

    /// An org and a project in it, both named by slug.
    pub fn add_project(&self, org: &str, project: &str, created_by: UserId) -> (Org, Project) {
        let org_id = self.state.store.read(|s| s.next_org_id());
        let project_id = self.state.store.read(|s| s.next_project_id());
        let now = self.clock.epoch_ms();
        self.emit(vec![
            Event::OrgCreated {
                id: org_id,
                name: org.to_string(),
                slug: org.to_string(),
                created_by,
                created_at_ms: now,
            },
            Event::ProjectCreated {
                id: project_id,
                org: org_id,
                name: project.to_string(),
                slug: project.to_string(),
                project_lead: "Lead".to_string(),
                email: "lead@example.com".to_string(),
                created_by,
                created_at_ms: now,
            },
        ]);
        self.state
            .store
            .read(|s| Some((s.orgs.get(&org_id)?.clone(), s.projects.get(&project_id)?.clone())))
            .unwrap()
    }

    pub fn set_roles(&self, project: ProjectId, user: UserId, roles: &[ProjectRole]) {
        self.emit(vec![Event::MembershipSet { project, user, roles: roles.to_vec() }]);
    }

    pub fn add_job_request(
        &self,
        workspace: &Workspace,
        backend: &str,
        actions: &[&str],
        created_by: UserId,
    ) -> JobRequest {
        let id = self.state.store.read(|s| s.next_job_request_id());
        self.emit(vec![Event::JobRequestCreated {
            id,
            identifier: format!("request{:08}", id.get()),
            workspace: workspace.id,
            backend: backend.to_string(),
            created_by,
            sha: "abc123".to_string(),
            requested_actions: actions.iter().map(|a| a.to_string()).collect(),
            force_run_dependencies: false,
            will_notify: false,
            created_at_ms: self.clock.epoch_ms() + id.get(),
        }]);
        self.state.store.read(|s| s.job_requests.get(&id).cloned()).unwrap()
    }

    /// A job with timestamps consistent with `status`.
    pub fn add_job(&self, request: JobRequestId, action: &str, status: JobStatus) -> Job {
        let id = self.state.store.read(|s| s.next_job_id());
        let mut events =
            vec![job_created_event(id.get(), request.get(), action, JobStatus::Unscheduled)];
        if status != JobStatus::Unscheduled {
            events.push(job_updated_event(id.get(), status, self.clock.epoch_ms()));
        }
        self.emit(events);
        self.state.store.read(|s| s.jobs.get(&id).cloned()).unwrap()
    }

    pub fn job_request(&self, id: JobRequestId) -> JobRequest {
        self.state.store.read(|s| s.job_requests.get(&id).cloned()).unwrap()
    }

    pub fn job(&self, id: js_core::JobId) -> Job {
        self.state.store.read(|s| s.jobs.get(&id).cloned()).unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
