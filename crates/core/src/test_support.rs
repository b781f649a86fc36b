// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    BackendId, Event, JobId, JobProgress, JobRequestId, JobStatus, UserId, WorkspaceId,
};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::job::JobStatus;
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Unscheduled),
            Just(JobStatus::Pending),
            Just(JobStatus::Running),
            Just(JobStatus::Succeeded),
            Just(JobStatus::Failed),
            Just(JobStatus::Cancelled),
        ]
    }
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn user_created_event(id: u64, username: &str, is_superuser: bool) -> Event {
    Event::UserCreated {
        id: UserId(id),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        is_superuser,
        created_at_ms: 1_000_000,
    }
}

pub fn workspace_created_event(id: u64, name: &str, created_by: u64) -> Event {
    Event::WorkspaceCreated {
        id: WorkspaceId(id),
        name: name.to_string(),
        repo: format!("https://github.com/opensafely/{name}"),
        branch: "main".to_string(),
        db: "full".to_string(),
        project: None,
        created_by: UserId(created_by),
        created_at_ms: 1_000_000,
        should_notify: false,
    }
}

pub fn backend_created_event(id: u64, name: &str, token: &str) -> Event {
    Event::BackendCreated {
        id: BackendId(id),
        name: name.to_string(),
        display_name: name.to_uppercase(),
        auth_token: token.to_string(),
        created_at_ms: 1_000_000,
    }
}

pub fn job_request_created_event(id: u64, workspace: u64, backend: &str, actions: &[&str]) -> Event {
    Event::JobRequestCreated {
        id: JobRequestId(id),
        identifier: format!("request{id:08}"),
        workspace: WorkspaceId(workspace),
        backend: backend.to_string(),
        created_by: UserId(1),
        sha: "abc123".to_string(),
        requested_actions: actions.iter().map(|a| a.to_string()).collect(),
        force_run_dependencies: false,
        will_notify: false,
        created_at_ms: 1_000_000 + id,
    }
}

pub fn job_created_event(id: u64, job_request: u64, action: &str, status: JobStatus) -> Event {
    Event::JobCreated {
        id: JobId(id),
        identifier: format!("job{id:08}"),
        job_request: JobRequestId(job_request),
        action: action.to_string(),
        status,
        status_message: String::new(),
        created_at_ms: 2_000_000 + id,
    }
}

pub fn job_updated_event(id: u64, status: JobStatus, at_ms: u64) -> Event {
    Event::JobUpdated {
        id: JobId(id),
        progress: JobProgress {
            status,
            status_message: String::new(),
            started_at_ms: (status != JobStatus::Unscheduled && status != JobStatus::Pending)
                .then_some(at_ms),
            completed_at_ms: status.is_terminal().then_some(at_ms),
        },
        at_ms,
    }
}

pub fn job_zombified_event(id: u64, at_ms: u64) -> Event {
    Event::JobZombified { id: JobId(id), at_ms }
}
