// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job requests and their derived aggregate status.

use crate::job::{Job, JobStatus};
use crate::user::UserId;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

crate::define_id! {
    /// Primary key of a job request.
    pub struct JobRequestId;
}

/// Aggregate status of a job request, derived from its jobs on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

crate::simple_display! {
    RequestStatus {
        Pending => "pending",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Running,
        RequestStatus::Succeeded,
        RequestStatus::Failed,
        RequestStatus::Cancelled,
    ];

    pub fn is_finished(self) -> bool {
        matches!(self, RequestStatus::Succeeded | RequestStatus::Failed | RequestStatus::Cancelled)
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = JobRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| JobRequestError::UnknownStatus(s.to_string()))
    }
}

/// Errors from job request validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobRequestError {
    #[error("You cannot change a job request's backend")]
    BackendImmutable,
    #[error("Unknown status \"{0}\"")]
    UnknownStatus(String),
}

/// One submission of a set of named actions for a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub id: JobRequestId,
    pub identifier: String,
    pub workspace: WorkspaceId,
    /// Name of the backend; fixed at creation.
    pub backend: String,
    pub created_by: UserId,
    pub sha: String,
    pub requested_actions: Vec<String>,
    /// Insertion-ordered, no duplicates.
    #[serde(default)]
    pub cancelled_actions: Vec<String>,
    pub force_run_dependencies: bool,
    pub will_notify: bool,
    pub created_at_ms: u64,
}

crate::builder! {
    pub struct JobRequestBuilder => JobRequest {
        into {
            identifier: String = "reqidentifier234",
            backend: String = "tpp",
            sha: String = "abc123",
        }
        set {
            id: JobRequestId = JobRequestId(1),
            workspace: WorkspaceId = WorkspaceId(1),
            created_by: UserId = UserId(1),
            requested_actions: Vec<String> = Vec::new(),
            cancelled_actions: Vec<String> = Vec::new(),
            force_run_dependencies: bool = false,
            will_notify: bool = false,
            created_at_ms: u64 = 1_000_000,
        }
    }
}

impl JobRequest {
    pub fn is_cancelled(&self, action: &str) -> bool {
        self.cancelled_actions.iter().any(|a| a == action)
    }

    /// Aggregate status over this request's jobs.
    pub fn status(&self, jobs: &[&Job]) -> RequestStatus {
        aggregate_status(self, jobs)
    }

    /// Reject any attempt to move the request to another backend.
    pub fn check_backend(&self, backend: &str) -> Result<(), JobRequestError> {
        if backend == self.backend {
            Ok(())
        } else {
            Err(JobRequestError::BackendImmutable)
        }
    }

    /// Append actions to `cancelled_actions`, skipping ones already present.
    pub fn record_cancellations(&mut self, actions: &[String]) {
        for action in actions {
            if !self.is_cancelled(action) {
                self.cancelled_actions.push(action.clone());
            }
        }
    }
}

/// Distinct action names among `jobs`, in first-seen order.
pub fn distinct_actions<'a>(jobs: &[&'a Job]) -> Vec<&'a str> {
    let mut actions: Vec<&str> = Vec::new();
    for job in jobs {
        if !actions.contains(&job.action.as_str()) {
            actions.push(&job.action);
        }
    }
    actions
}

/// Derive the aggregate status of a request from its jobs.
///
/// The least-finished job wins: running outranks pending, which outranks
/// failed, which outranks succeeded and cancelled. A request whose every
/// job action has been cancelled stops counting as pending while it waits
/// for the backend, so it reports failed if a job failed and cancelled
/// otherwise.
pub fn aggregate_status(request: &JobRequest, jobs: &[&Job]) -> RequestStatus {
    if jobs.is_empty() {
        return RequestStatus::Pending;
    }
    if jobs.iter().any(|job| job.status == JobStatus::Running) {
        return RequestStatus::Running;
    }
    let waiting = jobs.iter().any(|job| job.status.is_waiting());
    if waiting && !distinct_actions(jobs).iter().all(|action| request.is_cancelled(action)) {
        return RequestStatus::Pending;
    }
    if jobs.iter().any(|job| job.status == JobStatus::Failed) {
        return RequestStatus::Failed;
    }
    if waiting || jobs.iter().all(|job| job.status == JobStatus::Cancelled) {
        return RequestStatus::Cancelled;
    }
    RequestStatus::Succeeded
}

#[cfg(test)]
#[path = "job_request_tests.rs"]
mod tests;
