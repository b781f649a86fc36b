// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and per-job status machine.
//!
//! A job is one action's execution record inside a job request. Its status
//! is owned by the execution backend, which pushes updates; the server only
//! writes a terminal status itself through zombification.

use crate::job_request::JobRequestId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

crate::define_id! {
    /// Primary key of a job.
    pub struct JobId;
}

/// Status of a single job as reported by the backend.
///
/// `Unscheduled` is the empty status a job has before the backend has
/// picked it up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    #[serde(rename = "")]
    Unscheduled,
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

crate::simple_display! {
    JobStatus {
        Unscheduled => "",
        Pending => "pending",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Unscheduled,
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Succeeded,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled)
    }

    /// Not yet picked up or waiting to run.
    pub fn is_waiting(self) -> bool {
        matches!(self, JobStatus::Unscheduled | JobStatus::Pending)
    }

    /// Whether a backend report may move a job from `self` to `next`.
    ///
    /// Statuses only move forward; repeating the current status is allowed.
    pub fn can_become(self, next: JobStatus) -> bool {
        if self == next {
            return true;
        }
        match self {
            JobStatus::Unscheduled => true,
            JobStatus::Pending => next == JobStatus::Running || next.is_terminal(),
            JobStatus::Running => next.is_terminal(),
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled => false,
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.to_string() == s)
            .ok_or_else(|| JobError::UnknownStatus(s.to_string()))
    }
}

/// Errors from job state changes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Unknown job status \"{0}\"")]
    UnknownStatus(String),
    #[error("Cannot change a {from} job to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
    #[error("You can only set outputs for a job once")]
    OutputsAlreadySet,
}

/// An output file reported by the backend for a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutput {
    pub name: String,
    pub location: String,
    pub privacy_level: String,
}

/// Partial status report from the backend. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: Option<JobStatus>,
    pub status_message: Option<String>,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
}

/// Fully resolved job progress, as recorded in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    pub status: JobStatus,
    pub status_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
}

/// One action's execution record within a job request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub identifier: String,
    pub job_request: JobRequestId,
    pub action: String,
    pub status: JobStatus,
    pub status_message: String,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    #[serde(default)]
    pub started_at_ms: Option<u64>,
    #[serde(default)]
    pub completed_at_ms: Option<u64>,
    #[serde(default)]
    pub outputs: Vec<JobOutput>,
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            identifier: String = "abcdefghjkmnpqrs",
            action: String = "generate_cohort",
            status_message: String = "",
        }
        set {
            id: JobId = JobId(1),
            job_request: JobRequestId = JobRequestId(1),
            status: JobStatus = JobStatus::Pending,
            created_at_ms: u64 = 1_000_000,
            updated_at_ms: u64 = 1_000_000,
            outputs: Vec<JobOutput> = Vec::new(),
        }
        option {
            started_at_ms: u64 = None,
            completed_at_ms: u64 = None,
        }
    }
}

impl Job {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// A job that never recorded completion, whatever its status says.
    pub fn is_stuck(&self) -> bool {
        self.completed_at_ms.is_none()
    }

    /// Resolve a backend report against the current state.
    ///
    /// Stamps `started_at` when the job starts running and `completed_at`
    /// when it reaches a terminal status, unless the backend supplied them.
    pub fn resolve_update(&self, update: StatusUpdate, now_ms: u64) -> Result<JobProgress, JobError> {
        let status = update.status.unwrap_or(self.status);
        if !self.status.can_become(status) {
            return Err(JobError::InvalidTransition { from: self.status, to: status });
        }

        let mut started_at_ms = update.started_at_ms.or(self.started_at_ms);
        if status == JobStatus::Running && started_at_ms.is_none() {
            started_at_ms = Some(now_ms);
        }
        let mut completed_at_ms = update.completed_at_ms.or(self.completed_at_ms);
        if status.is_terminal() && completed_at_ms.is_none() {
            completed_at_ms = Some(now_ms);
        }

        Ok(JobProgress {
            status,
            status_message: update.status_message.unwrap_or_else(|| self.status_message.clone()),
            started_at_ms,
            completed_at_ms,
        })
    }

    pub fn apply_progress(&mut self, progress: &JobProgress, at_ms: u64) {
        self.status = progress.status;
        self.status_message = progress.status_message.clone();
        self.started_at_ms = progress.started_at_ms;
        self.completed_at_ms = progress.completed_at_ms;
        self.updated_at_ms = at_ms;
    }

    /// Outputs may be attached once; an empty list is always accepted.
    pub fn check_outputs(&self, outputs: &[JobOutput]) -> Result<(), JobError> {
        if !outputs.is_empty() && !self.outputs.is_empty() {
            return Err(JobError::OutputsAlreadySet);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
