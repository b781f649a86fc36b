// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use js_core::{JobOutput, JobProgress};

fn with_request() -> MaterializedState {
    let mut state = seeded();
    state.apply_event(&job_request_created_event(1, 1, "tpp", &["test1", "test2"]));
    state
}

#[test]
fn job_created_under_request() {
    let mut state = with_request();
    state.apply_event(&job_created_event(1, 1, "test1", JobStatus::Pending));

    let job = &state.jobs[&JobId(1)];
    assert_eq!(job.job_request, JobRequestId(1));
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.updated_at_ms, job.created_at_ms);
}

#[test]
fn job_for_unknown_request_is_dropped() {
    let mut state = with_request();
    state.apply_event(&job_created_event(1, 42, "test1", JobStatus::Pending));
    assert!(state.jobs.is_empty());
}

#[test]
fn job_updated_sets_progress() {
    let mut state = with_request();
    state.apply_event(&job_created_event(1, 1, "test1", JobStatus::Pending));
    state.apply_event(&Event::JobUpdated {
        id: JobId(1),
        progress: JobProgress {
            status: JobStatus::Running,
            status_message: "Running".to_string(),
            started_at_ms: Some(50),
            completed_at_ms: None,
        },
        at_ms: 50,
    });

    let job = &state.jobs[&JobId(1)];
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.started_at_ms, Some(50));
    assert_eq!(job.updated_at_ms, 50);
}

#[test]
fn outputs_are_only_set_once() {
    let mut state = with_request();
    state.apply_event(&job_created_event(1, 1, "test1", JobStatus::Succeeded));
    let first = JobOutput {
        name: "cohort".to_string(),
        location: "output/input.csv".to_string(),
        privacy_level: "highly_sensitive".to_string(),
    };
    let second = JobOutput { name: "other".to_string(), ..first.clone() };
    state.apply_event(&Event::JobOutputsSet { id: JobId(1), outputs: vec![first.clone()] });
    state.apply_event(&Event::JobOutputsSet { id: JobId(1), outputs: vec![second] });

    assert_eq!(state.jobs[&JobId(1)].outputs, vec![first]);
}

#[test]
fn zombified_job_is_failed() {
    let mut state = with_request();
    state.apply_event(&job_created_event(1, 1, "test1", JobStatus::Running));
    state.apply_event(&job_zombified_event(1, 99));

    let job = &state.jobs[&JobId(1)];
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.status_message, "Job manually zombified");
    assert_eq!(job.completed_at_ms, Some(99));
}

#[test]
fn zombify_leaves_completed_job() {
    let mut state = with_request();
    state.apply_event(&job_created_event(1, 1, "test1", JobStatus::Pending));
    state.apply_event(&job_updated_event(1, JobStatus::Succeeded, 40));
    state.apply_event(&job_zombified_event(1, 99));

    let job = &state.jobs[&JobId(1)];
    assert_eq!(job.status, JobStatus::Succeeded);
    assert_eq!(job.completed_at_ms, Some(40));
}
