// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Paths and absolute URLs for every addressable resource.
//!
//! UI paths are site-relative and used for redirects. API resources carry
//! absolute URLs built from the configured base URL.

use js_core::{BackendId, JobId, JobRequestId, WorkspaceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    base_url: String,
}

impl Links {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── API ──

    pub fn api_job(&self, id: JobId) -> String {
        self.absolute(&format!("/api/jobs/{id}/"))
    }

    pub fn api_job_request(&self, id: JobRequestId) -> String {
        self.absolute(&format!("/api/job-requests/{id}/"))
    }

    pub fn api_workspace(&self, id: WorkspaceId) -> String {
        self.absolute(&format!("/api/workspaces/{id}/"))
    }
}

// ── UI paths ──

pub fn home() -> String {
    "/".to_string()
}

pub fn job(identifier: &str) -> String {
    format!("/jobs/{identifier}/")
}

pub fn job_request(id: JobRequestId) -> String {
    format!("/job-requests/{id}/")
}

pub fn workspace(name: &str) -> String {
    format!("/workspaces/{name}/")
}

pub fn workspace_logs(name: &str) -> String {
    format!("/workspaces/{name}/logs/")
}

pub fn workspace_release(name: &str) -> String {
    format!("/workspaces/{name}/release/")
}

pub fn backend(id: BackendId) -> String {
    format!("/backends/{id}/")
}

pub fn org(slug: &str) -> String {
    format!("/orgs/{slug}/")
}

pub fn project(org_slug: &str, project_slug: &str) -> String {
    format!("/orgs/{org_slug}/{project_slug}/")
}

pub fn project_workspace(org_slug: &str, project_slug: &str, name: &str) -> String {
    format!("/orgs/{org_slug}/{project_slug}/{name}/")
}

/// Login redirect that returns to `next` afterwards.
pub fn login(login_url: &str, next: &str) -> String {
    format!("{login_url}?next={next}")
}
