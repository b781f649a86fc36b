// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Administrative forced failure of jobs that never reported completion.

use crate::job::{Job, JobId, JobStatus};
use crate::user::User;
use thiserror::Error;

/// Status message written onto zombified jobs.
pub const ZOMBIFIED_MESSAGE: &str = "Job manually zombified";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZombifyError {
    #[error("Only admins can zombify Jobs.")]
    NotAdmin,
}

/// Only superusers may zombify.
pub fn authorize(user: &User) -> Result<(), ZombifyError> {
    if user.is_superuser {
        Ok(())
    } else {
        Err(ZombifyError::NotAdmin)
    }
}

/// Jobs among `jobs` that would be changed by zombification.
pub fn candidates(jobs: &[&Job]) -> Vec<JobId> {
    jobs.iter().filter(|job| job.is_stuck()).map(|job| job.id).collect()
}

/// Force a stuck job to failed. Returns false for completed jobs.
pub fn zombify(job: &mut Job, now_ms: u64) -> bool {
    if !job.is_stuck() {
        return false;
    }
    job.status = JobStatus::Failed;
    job.status_message = ZOMBIFIED_MESSAGE.to_string();
    job.completed_at_ms = Some(now_ms);
    job.updated_at_ms = now_ms;
    true
}

#[cfg(test)]
#[path = "zombify_tests.rs"]
mod tests;
