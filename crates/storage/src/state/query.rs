// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-side lookups over materialized state.

use std::collections::HashMap;

use js_core::filter::paginate;
use js_core::workspace::normalize_name;
use js_core::{
    Backend, Cursor, Job, JobRequest, JobRequestFilter, JobRequestId, JobStatus, Org, Page,
    Project, ProjectMembership, QueueCounts, RequestRow, RequestStatus, User, UserId, Workspace,
    WorkspaceId,
};

use super::MaterializedState;

impl MaterializedState {
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn workspace_by_name(&self, name: &str) -> Option<&Workspace> {
        let name = normalize_name(name);
        self.workspaces.values().find(|w| w.name == name)
    }

    pub fn backend_by_name(&self, name: &str) -> Option<&Backend> {
        self.backends.values().find(|b| b.name == name)
    }

    pub fn backend_by_token(&self, token: &str) -> Option<&Backend> {
        self.backends.values().find(|b| b.authenticates(token))
    }

    pub fn org_by_slug(&self, slug: &str) -> Option<&Org> {
        self.orgs.values().find(|o| o.slug == slug)
    }

    pub fn project_by_slug(&self, org: &Org, slug: &str) -> Option<&Project> {
        self.projects.values().find(|p| p.org == org.id && p.slug == slug)
    }

    pub fn projects_for_org(&self, org: &Org) -> Vec<&Project> {
        self.projects.values().filter(|p| p.org == org.id).collect()
    }

    pub fn memberships_for_user(&self, user: UserId) -> Vec<&ProjectMembership> {
        self.memberships.iter().filter(|m| m.user == user).collect()
    }

    pub fn memberships_for_project(&self, project: &Project) -> Vec<&ProjectMembership> {
        self.memberships.iter().filter(|m| m.project == project.id).collect()
    }

    pub fn job_request_by_identifier(&self, identifier: &str) -> Option<&JobRequest> {
        let identifier = identifier.trim();
        self.job_requests.values().find(|r| r.identifier == identifier)
    }

    pub fn job_by_identifier(&self, identifier: &str) -> Option<&Job> {
        self.jobs.values().find(|j| j.identifier == identifier)
    }

    /// Jobs of one request, in id order.
    pub fn jobs_for_request(&self, id: JobRequestId) -> Vec<&Job> {
        self.jobs.values().filter(|j| j.job_request == id).collect()
    }

    pub fn request_status(&self, request: &JobRequest) -> RequestStatus {
        request.status(&self.jobs_for_request(request.id))
    }

    /// Workspace that owns a job, via its request.
    pub fn workspace_for_job(&self, job: &Job) -> Option<&Workspace> {
        let request = self.job_requests.get(&job.job_request)?;
        self.workspaces.get(&request.workspace)
    }

    /// Every job request joined with its jobs, workspace name, and creator.
    pub fn request_rows(&self) -> Vec<RequestRow<'_>> {
        let mut jobs_by_request: HashMap<JobRequestId, Vec<&Job>> = HashMap::new();
        for job in self.jobs.values() {
            jobs_by_request.entry(job.job_request).or_default().push(job);
        }
        self.job_requests
            .values()
            .map(|request| RequestRow {
                request,
                jobs: jobs_by_request.remove(&request.id).unwrap_or_default(),
                workspace: self
                    .workspaces
                    .get(&request.workspace)
                    .map(|w| w.name.as_str())
                    .unwrap_or_default(),
                username: self
                    .users
                    .get(&request.created_by)
                    .map(|u| u.username.as_str())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Filtered, newest-first page of job requests.
    pub fn search_job_requests(
        &self,
        filter: &JobRequestFilter,
        after: Option<Cursor>,
        page_size: usize,
    ) -> Page<RequestRow<'_>> {
        let rows = self.request_rows().into_iter().filter(|row| filter.matches(row)).collect();
        paginate(rows, after, page_size)
    }

    /// Status of the most recent job for `action` in a workspace.
    pub fn latest_action_status(&self, workspace: WorkspaceId, action: &str) -> Option<JobStatus> {
        self.jobs
            .values()
            .filter(|job| job.action == action)
            .filter(|job| {
                self.job_requests.get(&job.job_request).is_some_and(|r| r.workspace == workspace)
            })
            .max_by_key(|job| (job.created_at_ms, job.id))
            .map(|job| job.status)
    }

    /// The most recent succeeded job with outputs for each action in a
    /// workspace, ordered by action name.
    pub fn releasable_jobs(&self, workspace: WorkspaceId) -> Vec<&Job> {
        let mut latest: HashMap<&str, &Job> = HashMap::new();
        for job in self.jobs.values() {
            if job.status != JobStatus::Succeeded || job.outputs.is_empty() {
                continue;
            }
            if !self.job_requests.get(&job.job_request).is_some_and(|r| r.workspace == workspace) {
                continue;
            }
            let entry = latest.entry(job.action.as_str()).or_insert(job);
            if (job.created_at_ms, job.id) > (entry.created_at_ms, entry.id) {
                *entry = job;
            }
        }
        let mut jobs: Vec<&Job> = latest.into_values().collect();
        jobs.sort_by(|a, b| a.action.cmp(&b.action));
        jobs
    }

    /// Unfinished requests for a backend, split by whether it created jobs.
    pub fn queue_counts(&self, backend: &str) -> QueueCounts {
        let mut counts = QueueCounts::default();
        for row in self.request_rows() {
            if row.request.backend != backend || row.status().is_finished() {
                continue;
            }
            if row.jobs.is_empty() {
                counts.unacked += 1;
            } else {
                counts.acked += 1;
            }
        }
        counts
    }

    /// Workspaces that are not archived, by name.
    pub fn active_workspaces(&self) -> Vec<&Workspace> {
        let mut workspaces: Vec<&Workspace> =
            self.workspaces.values().filter(|w| !w.is_archived).collect();
        workspaces.sort_by(|a, b| a.name.cmp(&b.name));
        workspaces
    }
}
