// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

mod backends;
mod helpers;
mod job_requests;
mod jobs;
mod orgs;
mod query;
mod users;
mod workspaces;

use js_core::{
    Backend, BackendId, BackendStats, Event, Job, JobId, JobRequest, JobRequestId, Org, OrgId,
    Project, ProjectId, ProjectMembership, User, UserId, Workspace, WorkspaceId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Materialized state built from WAL operations
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedState {
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    #[serde(default)]
    pub orgs: BTreeMap<OrgId, Org>,
    #[serde(default)]
    pub projects: BTreeMap<ProjectId, Project>,
    #[serde(default)]
    pub memberships: Vec<ProjectMembership>,
    #[serde(default)]
    pub workspaces: BTreeMap<WorkspaceId, Workspace>,
    #[serde(default)]
    pub backends: BTreeMap<BackendId, Backend>,
    /// Heartbeats, keyed by backend.
    #[serde(default)]
    pub stats: BTreeMap<BackendId, BackendStats>,
    #[serde(default)]
    pub job_requests: BTreeMap<JobRequestId, JobRequest>,
    #[serde(default)]
    pub jobs: BTreeMap<JobId, Job>,
}

impl MaterializedState {
    pub fn next_user_id(&self) -> UserId {
        helpers::next_key(&self.users)
    }

    pub fn next_org_id(&self) -> OrgId {
        helpers::next_key(&self.orgs)
    }

    pub fn next_project_id(&self) -> ProjectId {
        helpers::next_key(&self.projects)
    }

    pub fn next_workspace_id(&self) -> WorkspaceId {
        helpers::next_key(&self.workspaces)
    }

    pub fn next_backend_id(&self) -> BackendId {
        helpers::next_key(&self.backends)
    }

    pub fn next_job_request_id(&self) -> JobRequestId {
        helpers::next_key(&self.job_requests)
    }

    pub fn next_job_id(&self) -> JobId {
        helpers::next_key(&self.jobs)
    }

    /// Apply an event to derive state changes.
    ///
    /// # Idempotency Requirement
    ///
    /// **All event handlers MUST be idempotent.** Applying the same event twice
    /// must produce the same state as applying it once: a crash between the
    /// WAL flush and a snapshot replays events the snapshot already holds.
    ///
    /// Guidelines for idempotent handlers:
    /// - Use assignment (`=`) instead of mutation (`+=`, `-=`)
    /// - Guard inserts with existence checks (`entry().or_insert_with`)
    /// - Guard appends with membership checks
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::UserCreated { .. }
            | Event::UserSettingsUpdated { .. }
            | Event::UserWorkspaceSelected { .. } => users::apply(self, event),

            Event::OrgCreated { .. } | Event::ProjectCreated { .. } | Event::MembershipSet { .. } => {
                orgs::apply(self, event)
            }

            Event::WorkspaceCreated { .. }
            | Event::WorkspaceArchiveSet { .. }
            | Event::WorkspaceNotificationsSet { .. } => workspaces::apply(self, event),

            Event::BackendCreated { .. }
            | Event::BackendTokenRotated { .. }
            | Event::BackendSeen { .. } => backends::apply(self, event),

            Event::JobRequestCreated { .. } | Event::JobRequestCancelled { .. } => {
                job_requests::apply(self, event)
            }

            Event::JobCreated { .. }
            | Event::JobUpdated { .. }
            | Event::JobOutputsSet { .. }
            | Event::JobZombified { .. } => jobs::apply(self, event),
        }
    }
}

#[cfg(test)]
#[path = "../state_tests/mod.rs"]
mod tests;
