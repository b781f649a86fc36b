// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payloads for the UI paths. Each is the data a page would render.

use js_core::{
    Backend, BackendHealth, Job, JobRequest, Org, Project, ProjectMembership, ProjectRole, QueueCounts,
    RequestStatus, User, Workspace,
};
use serde::{Deserialize, Serialize};

use crate::links;
use crate::response::{JobRequestResponse, JobResponse, WorkspaceResponse};
use crate::time;

/// Body sent with a form-post redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectBody {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLink {
    pub name: String,
    pub url: String,
    pub repo_name: String,
    pub is_archived: bool,
}

impl From<&Workspace> for WorkspaceLink {
    fn from(workspace: &Workspace) -> Self {
        Self {
            name: workspace.name.clone(),
            url: links::workspace(&workspace.name),
            repo_name: workspace.repo_name().to_string(),
            is_archived: workspace.is_archived,
        }
    }
}

/// One line of a job request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequestRow {
    pub id: u64,
    pub url: String,
    pub identifier: String,
    pub workspace: String,
    pub backend: String,
    pub created_by: String,
    pub requested_actions: Vec<String>,
    pub status: RequestStatus,
    #[serde(with = "time::ms")]
    pub created_at: u64,
}

impl JobRequestRow {
    pub fn new(request: &JobRequest, status: RequestStatus, workspace: &str, created_by: &str) -> Self {
        Self {
            id: request.id.get(),
            url: links::job_request(request.id),
            identifier: request.identifier.clone(),
            workspace: workspace.to_string(),
            backend: request.backend.clone(),
            created_by: created_by.to_string(),
            requested_actions: request.requested_actions.clone(),
            status,
            created_at: request.created_at_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexView {
    pub job_requests: Vec<JobRequestRow>,
    pub workspaces: Vec<WorkspaceLink>,
    pub can_run_jobs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequestListView {
    pub results: Vec<JobRequestRow>,
    #[serde(default)]
    pub next: Option<String>,
    pub statuses: Vec<RequestStatus>,
    pub backends: Vec<String>,
    pub workspaces: Vec<String>,
    pub users: Vec<String>,
    /// Staff may look up a request by identifier.
    pub can_lookup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetailView {
    pub job: JobResponse,
    pub job_request_url: String,
    pub can_cancel: bool,
    pub can_zombify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequestDetailView {
    pub job_request: JobRequestResponse,
    pub can_cancel: bool,
    pub can_zombify: bool,
}

/// An action from the pipeline with its most recent status, or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub name: String,
    pub needs: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDetailView {
    pub workspace: WorkspaceResponse,
    pub branch: String,
    pub repo_name: String,
    pub actions: Vec<ActionView>,
    #[serde(default)]
    pub actions_error: Option<String>,
    pub can_run_jobs: bool,
    /// Present for superusers, who may pick where jobs run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backends: Option<Vec<String>>,
    pub logs_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLogView {
    pub workspace: WorkspaceLink,
    pub results: Vec<JobRequestRow>,
    #[serde(default)]
    pub next: Option<String>,
    pub can_run_jobs: bool,
}

/// Outputs a researcher can pick from to release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceReleaseView {
    pub workspace: WorkspaceLink,
    pub outputs: Vec<ReleaseOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOutput {
    pub action: String,
    pub job_url: String,
    pub name: String,
    pub location: String,
    pub privacy_level: String,
}

impl ReleaseOutput {
    pub fn from_job(job: &Job) -> Vec<Self> {
        job.outputs
            .iter()
            .map(|output| Self {
                action: job.action.clone(),
                job_url: links::job(&job.identifier),
                name: output.name.clone(),
                location: output.location.clone(),
                privacy_level: output.privacy_level.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoView {
    pub name: String,
    pub url: String,
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceCreateView {
    pub repos_with_branches: Vec<RepoView>,
}

// ── Status dashboard ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatusView {
    /// Display name.
    pub name: String,
    pub slug: String,
    pub last_seen: String,
    pub queue: QueueCounts,
    pub show_warning: bool,
}

impl BackendStatusView {
    pub fn new(backend: &Backend, health: BackendHealth) -> Self {
        Self {
            name: backend.display_name.clone(),
            slug: backend.name.clone(),
            last_seen: time::last_seen(health.last_seen_ms),
            queue: health.queue,
            show_warning: health.show_warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub backends: Vec<BackendStatusView>,
}

// ── Administration ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendView {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub auth_token: String,
    pub url: String,
    pub last_seen: String,
}

impl BackendView {
    pub fn new(backend: &Backend, last_seen_ms: Option<u64>) -> Self {
        Self {
            id: backend.id.get(),
            name: backend.name.clone(),
            display_name: backend.display_name.clone(),
            auth_token: backend.auth_token.clone(),
            url: links::backend(backend.id),
            last_seen: time::last_seen(last_seen_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipView {
    pub username: String,
    pub roles: Vec<ProjectRole>,
}

impl MembershipView {
    pub fn new(membership: &ProjectMembership, username: &str) -> Self {
        Self { username: username.to_string(), roles: membership.roles.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    pub name: String,
    pub slug: String,
    pub url: String,
    pub project_lead: String,
    pub email: String,
    #[serde(default)]
    pub memberships: Vec<MembershipView>,
    #[serde(default)]
    pub workspaces: Vec<WorkspaceLink>,
}

impl ProjectView {
    pub fn new(org: &Org, project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            slug: project.slug.clone(),
            url: links::project(&org.slug, &project.slug),
            project_lead: project.project_lead.clone(),
            email: project.email.clone(),
            memberships: Vec::new(),
            workspaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgView {
    pub name: String,
    pub slug: String,
    pub url: String,
    #[serde(default)]
    pub projects: Vec<ProjectView>,
}

impl OrgView {
    pub fn new(org: &Org) -> Self {
        Self {
            name: org.name.clone(),
            slug: org.slug.clone(),
            url: links::org(&org.slug),
            projects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsView {
    pub username: String,
    pub email: String,
    pub notifications_email: String,
}

impl From<&User> for SettingsView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            notifications_email: user.notifications_email.clone(),
        }
    }
}
