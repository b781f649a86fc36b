// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events recorded in the write-ahead log.
//!
//! Every state change is one of these facts. State is rebuilt by applying
//! them in order, so each must carry every value it sets (ids, timestamps,
//! tokens) rather than computing them on apply.

use crate::backend::BackendId;
use crate::job::{JobId, JobOutput, JobProgress, JobStatus};
use crate::job_request::JobRequestId;
use crate::org::{OrgId, ProjectId, ProjectRole};
use crate::user::UserId;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};

/// Serializes with `{"type": "entity:verb", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- users --
    #[serde(rename = "user:created")]
    UserCreated {
        id: UserId,
        username: String,
        #[serde(default)]
        email: String,
        is_superuser: bool,
        created_at_ms: u64,
    },

    #[serde(rename = "user:settings")]
    UserSettingsUpdated { id: UserId, notifications_email: String },

    #[serde(rename = "user:workspace_selected")]
    UserWorkspaceSelected { id: UserId, workspace: WorkspaceId },

    // -- orgs and projects --
    #[serde(rename = "org:created")]
    OrgCreated { id: OrgId, name: String, slug: String, created_by: UserId, created_at_ms: u64 },

    #[serde(rename = "project:created")]
    ProjectCreated {
        id: ProjectId,
        org: OrgId,
        name: String,
        slug: String,
        project_lead: String,
        email: String,
        created_by: UserId,
        created_at_ms: u64,
    },

    /// Replaces the user's roles on the project.
    #[serde(rename = "project:membership")]
    MembershipSet { project: ProjectId, user: UserId, roles: Vec<ProjectRole> },

    // -- workspaces --
    #[serde(rename = "workspace:created")]
    WorkspaceCreated {
        id: WorkspaceId,
        name: String,
        repo: String,
        branch: String,
        db: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project: Option<ProjectId>,
        created_by: UserId,
        created_at_ms: u64,
        #[serde(default)]
        should_notify: bool,
    },

    #[serde(rename = "workspace:archived")]
    WorkspaceArchiveSet { id: WorkspaceId, archived: bool },

    #[serde(rename = "workspace:notifications")]
    WorkspaceNotificationsSet { id: WorkspaceId, enabled: bool },

    // -- backends --
    #[serde(rename = "backend:created")]
    BackendCreated {
        id: BackendId,
        name: String,
        display_name: String,
        auth_token: String,
        created_at_ms: u64,
    },

    #[serde(rename = "backend:token_rotated")]
    BackendTokenRotated { id: BackendId, auth_token: String },

    #[serde(rename = "backend:seen")]
    BackendSeen {
        id: BackendId,
        at_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    // -- job requests --
    #[serde(rename = "job_request:created")]
    JobRequestCreated {
        id: JobRequestId,
        identifier: String,
        workspace: WorkspaceId,
        backend: String,
        created_by: UserId,
        sha: String,
        requested_actions: Vec<String>,
        force_run_dependencies: bool,
        will_notify: bool,
        created_at_ms: u64,
    },

    /// Appends to `cancelled_actions`; already-present actions are skipped.
    #[serde(rename = "job_request:cancelled")]
    JobRequestCancelled { id: JobRequestId, actions: Vec<String> },

    // -- jobs --
    #[serde(rename = "job:created")]
    JobCreated {
        id: JobId,
        identifier: String,
        job_request: JobRequestId,
        action: String,
        #[serde(default)]
        status: JobStatus,
        #[serde(default)]
        status_message: String,
        created_at_ms: u64,
    },

    #[serde(rename = "job:updated")]
    JobUpdated { id: JobId, progress: JobProgress, at_ms: u64 },

    /// Ignored when the job already has outputs.
    #[serde(rename = "job:outputs")]
    JobOutputsSet { id: JobId, outputs: Vec<JobOutput> },

    #[serde(rename = "job:zombified")]
    JobZombified { id: JobId, at_ms: u64 },
}

impl Event {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserCreated { .. } => "user:created",
            Event::UserSettingsUpdated { .. } => "user:settings",
            Event::UserWorkspaceSelected { .. } => "user:workspace_selected",
            Event::OrgCreated { .. } => "org:created",
            Event::ProjectCreated { .. } => "project:created",
            Event::MembershipSet { .. } => "project:membership",
            Event::WorkspaceCreated { .. } => "workspace:created",
            Event::WorkspaceArchiveSet { .. } => "workspace:archived",
            Event::WorkspaceNotificationsSet { .. } => "workspace:notifications",
            Event::BackendCreated { .. } => "backend:created",
            Event::BackendTokenRotated { .. } => "backend:token_rotated",
            Event::BackendSeen { .. } => "backend:seen",
            Event::JobRequestCreated { .. } => "job_request:created",
            Event::JobRequestCancelled { .. } => "job_request:cancelled",
            Event::JobCreated { .. } => "job:created",
            Event::JobUpdated { .. } => "job:updated",
            Event::JobOutputsSet { .. } => "job:outputs",
            Event::JobZombified { .. } => "job:zombified",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
