// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST API resources.

use js_core::{Job, JobOutput, JobRequest, JobStatus, RequestStatus, Workspace};
use serde::{Deserialize, Serialize};

use crate::links::Links;
use crate::time;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceResponse {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub repo: String,
    pub branch: String,
    pub db: String,
    /// Username of the creator.
    pub created_by: String,
    #[serde(with = "time::ms")]
    pub created_at: u64,
    pub is_archived: bool,
    pub should_notify: bool,
    #[serde(default)]
    pub project: Option<u64>,
}

impl WorkspaceResponse {
    pub fn new(workspace: &Workspace, created_by: &str, links: &Links) -> Self {
        Self {
            id: workspace.id.get(),
            url: links.api_workspace(workspace.id),
            name: workspace.name.clone(),
            repo: workspace.repo.clone(),
            branch: workspace.branch.clone(),
            db: workspace.db.clone(),
            created_by: created_by.to_string(),
            created_at: workspace.created_at_ms,
            is_archived: workspace.is_archived,
            should_notify: workspace.should_notify,
            project: workspace.project.map(|p| p.get()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: u64,
    pub url: String,
    pub identifier: String,
    pub job_request_id: u64,
    pub backend: String,
    pub action: String,
    pub status: JobStatus,
    pub status_message: String,
    pub outputs: Vec<JobOutput>,
    /// Read-only; set through the job request.
    pub workspace: WorkspaceResponse,
    #[serde(with = "time::ms")]
    pub created_at: u64,
    #[serde(with = "time::ms")]
    pub updated_at: u64,
    #[serde(default, with = "time::opt_ms")]
    pub started_at: Option<u64>,
    #[serde(default, with = "time::opt_ms")]
    pub completed_at: Option<u64>,
}

impl JobResponse {
    pub fn new(job: &Job, request: &JobRequest, workspace: WorkspaceResponse, links: &Links) -> Self {
        Self {
            id: job.id.get(),
            url: links.api_job(job.id),
            identifier: job.identifier.clone(),
            job_request_id: job.job_request.get(),
            backend: request.backend.clone(),
            action: job.action.clone(),
            status: job.status,
            status_message: job.status_message.clone(),
            outputs: job.outputs.clone(),
            workspace,
            created_at: job.created_at_ms,
            updated_at: job.updated_at_ms,
            started_at: job.started_at_ms,
            completed_at: job.completed_at_ms,
        }
    }
}

/// A job as listed under its request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: u64,
    pub url: String,
    pub identifier: String,
    pub action: String,
    pub status: JobStatus,
    pub status_message: String,
    #[serde(default, with = "time::opt_ms")]
    pub started_at: Option<u64>,
    #[serde(default, with = "time::opt_ms")]
    pub completed_at: Option<u64>,
}

impl JobSummary {
    pub fn new(job: &Job, links: &Links) -> Self {
        Self {
            id: job.id.get(),
            url: links.api_job(job.id),
            identifier: job.identifier.clone(),
            action: job.action.clone(),
            status: job.status,
            status_message: job.status_message.clone(),
            started_at: job.started_at_ms,
            completed_at: job.completed_at_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequestResponse {
    pub id: u64,
    pub url: String,
    pub identifier: String,
    pub backend: String,
    pub workspace: WorkspaceResponse,
    pub created_by: String,
    pub sha: String,
    pub requested_actions: Vec<String>,
    pub cancelled_actions: Vec<String>,
    pub force_run_dependencies: bool,
    pub will_notify: bool,
    pub status: RequestStatus,
    #[serde(with = "time::ms")]
    pub created_at: u64,
    pub jobs: Vec<JobSummary>,
}

impl JobRequestResponse {
    pub fn new(
        request: &JobRequest,
        jobs: &[&Job],
        workspace: WorkspaceResponse,
        created_by: &str,
        links: &Links,
    ) -> Self {
        Self {
            id: request.id.get(),
            url: links.api_job_request(request.id),
            identifier: request.identifier.clone(),
            backend: request.backend.clone(),
            workspace,
            created_by: created_by.to_string(),
            sha: request.sha.clone(),
            requested_actions: request.requested_actions.clone(),
            cancelled_actions: request.cancelled_actions.clone(),
            force_run_dependencies: request.force_run_dependencies,
            will_notify: request.will_notify,
            status: request.status(jobs),
            created_at: request.created_at_ms,
            jobs: jobs.iter().map(|job| JobSummary::new(job, links)).collect(),
        }
    }
}

/// One page of a list endpoint. `next` is the cursor for the following page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
