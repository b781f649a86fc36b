// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancellation policy for job request actions.
//!
//! Cancelling only records intent in `cancelled_actions`. The backend sees
//! the list on its next poll and moves the affected jobs to cancelled.

use crate::job::Job;
use crate::job_request::{distinct_actions, JobRequest};

/// Result of evaluating a cancellation for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The action was appended to `cancelled_actions`.
    Recorded,
    AlreadyCancelled,
    /// Every job for the action already reached a terminal status.
    AlreadyFinished,
    /// Neither requested nor present among the jobs.
    UnknownAction,
}

/// Decide whether cancelling `action` would change anything.
///
/// An action that was requested but has no jobs yet is still cancellable.
pub fn evaluate(request: &JobRequest, jobs: &[&Job], action: &str) -> CancelOutcome {
    if request.is_cancelled(action) {
        return CancelOutcome::AlreadyCancelled;
    }
    let mut action_jobs = jobs.iter().filter(|job| job.action == action).peekable();
    if action_jobs.peek().is_none() {
        return if request.requested_actions.iter().any(|a| a == action) {
            CancelOutcome::Recorded
        } else {
            CancelOutcome::UnknownAction
        };
    }
    if action_jobs.all(|job| job.is_terminal()) {
        return CancelOutcome::AlreadyFinished;
    }
    CancelOutcome::Recorded
}

/// Cancel a single action, recording it on the request when appropriate.
pub fn cancel(request: &mut JobRequest, jobs: &[&Job], action: &str) -> CancelOutcome {
    let outcome = evaluate(request, jobs, action);
    if outcome == CancelOutcome::Recorded {
        request.cancelled_actions.push(action.to_string());
    }
    outcome
}

/// Cancel every distinct action among the request's jobs.
///
/// Returns the newly recorded actions in job order.
pub fn cancel_all(request: &mut JobRequest, jobs: &[&Job]) -> Vec<String> {
    let mut recorded = Vec::new();
    for action in distinct_actions(jobs) {
        if cancel(request, jobs, action) == CancelOutcome::Recorded {
            recorded.push(action.to_string());
        }
    }
    recorded
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
