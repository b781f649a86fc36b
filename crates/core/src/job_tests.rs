// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::*;
use proptest::prelude::*;
use yare::parameterized;

#[test]
fn job_status_serde_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&JobStatus::Running).unwrap(), "\"running\"");
    assert_eq!(serde_json::to_string(&JobStatus::Unscheduled).unwrap(), "\"\"");
    let parsed: JobStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(parsed, JobStatus::Cancelled);
}

#[parameterized(
    empty = { "", JobStatus::Unscheduled },
    pending = { "pending", JobStatus::Pending },
    running = { "running", JobStatus::Running },
    succeeded = { "succeeded", JobStatus::Succeeded },
    failed = { "failed", JobStatus::Failed },
    cancelled = { "cancelled", JobStatus::Cancelled },
)]
fn job_status_parses(input: &str, expected: JobStatus) {
    assert_eq!(input.parse::<JobStatus>().unwrap(), expected);
}

#[test]
fn job_status_rejects_unknown() {
    assert_eq!(
        "exploded".parse::<JobStatus>(),
        Err(JobError::UnknownStatus("exploded".to_string()))
    );
}

#[parameterized(
    unscheduled_to_pending = { JobStatus::Unscheduled, JobStatus::Pending, true },
    unscheduled_to_failed = { JobStatus::Unscheduled, JobStatus::Failed, true },
    pending_to_running = { JobStatus::Pending, JobStatus::Running, true },
    pending_to_cancelled = { JobStatus::Pending, JobStatus::Cancelled, true },
    pending_back_to_unscheduled = { JobStatus::Pending, JobStatus::Unscheduled, false },
    running_to_succeeded = { JobStatus::Running, JobStatus::Succeeded, true },
    running_back_to_pending = { JobStatus::Running, JobStatus::Pending, false },
    succeeded_to_failed = { JobStatus::Succeeded, JobStatus::Failed, false },
    failed_to_running = { JobStatus::Failed, JobStatus::Running, false },
    repeat_terminal = { JobStatus::Failed, JobStatus::Failed, true },
)]
fn job_status_transitions(from: JobStatus, to: JobStatus, allowed: bool) {
    assert_eq!(from.can_become(to), allowed);
}

#[test]
fn resolve_update_stamps_started_at_when_running() {
    let job = Job::builder().status(JobStatus::Pending).build();
    let progress = job
        .resolve_update(
            StatusUpdate { status: Some(JobStatus::Running), ..Default::default() },
            5_000,
        )
        .unwrap();

    assert_eq!(progress.status, JobStatus::Running);
    assert_eq!(progress.started_at_ms, Some(5_000));
    assert_eq!(progress.completed_at_ms, None);
}

#[test]
fn resolve_update_stamps_completed_at_when_terminal() {
    let job = Job::builder().status(JobStatus::Running).started_at_ms(1_000u64).build();
    let progress = job
        .resolve_update(
            StatusUpdate {
                status: Some(JobStatus::Succeeded),
                status_message: Some("Completed successfully".to_string()),
                ..Default::default()
            },
            9_000,
        )
        .unwrap();

    assert_eq!(progress.started_at_ms, Some(1_000));
    assert_eq!(progress.completed_at_ms, Some(9_000));
    assert_eq!(progress.status_message, "Completed successfully");
}

#[test]
fn resolve_update_keeps_backend_timestamps() {
    let job = Job::builder().status(JobStatus::Pending).build();
    let progress = job
        .resolve_update(
            StatusUpdate {
                status: Some(JobStatus::Failed),
                started_at_ms: Some(10),
                completed_at_ms: Some(20),
                ..Default::default()
            },
            99,
        )
        .unwrap();

    assert_eq!(progress.started_at_ms, Some(10));
    assert_eq!(progress.completed_at_ms, Some(20));
}

#[test]
fn resolve_update_rejects_rewriting_terminal_status() {
    let job = Job::builder().status(JobStatus::Failed).completed_at_ms(5u64).build();
    let err = job
        .resolve_update(
            StatusUpdate { status: Some(JobStatus::Succeeded), ..Default::default() },
            10,
        )
        .unwrap_err();

    assert_eq!(err, JobError::InvalidTransition { from: JobStatus::Failed, to: JobStatus::Succeeded });
}

#[test]
fn resolve_update_message_only_keeps_status() {
    let job = Job::builder().status(JobStatus::Running).started_at_ms(3u64).build();
    let progress = job
        .resolve_update(
            StatusUpdate { status_message: Some("50% done".to_string()), ..Default::default() },
            10,
        )
        .unwrap();

    assert_eq!(progress.status, JobStatus::Running);
    assert_eq!(progress.status_message, "50% done");
    assert_eq!(progress.started_at_ms, Some(3));
}

#[test]
fn apply_progress_overwrites_fields() {
    let mut job = Job::builder().build();
    let progress = JobProgress {
        status: JobStatus::Running,
        status_message: "started".to_string(),
        started_at_ms: Some(7),
        completed_at_ms: None,
    };
    job.apply_progress(&progress, 8);
    job.apply_progress(&progress, 8);

    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.started_at_ms, Some(7));
    assert_eq!(job.updated_at_ms, 8);
}

#[test]
fn outputs_can_only_be_set_once() {
    let output = JobOutput {
        name: "cohort".to_string(),
        location: "output/input.csv".to_string(),
        privacy_level: "high".to_string(),
    };
    let mut job = Job::builder().build();
    assert!(job.check_outputs(std::slice::from_ref(&output)).is_ok());

    job.outputs.push(output.clone());
    assert_eq!(job.check_outputs(&[output]), Err(JobError::OutputsAlreadySet));
    assert!(job.check_outputs(&[]).is_ok());
}

#[test]
fn stuck_means_no_completed_at() {
    assert!(Job::builder().status(JobStatus::Running).build().is_stuck());
    assert!(Job::builder().status(JobStatus::Succeeded).build().is_stuck());
    assert!(!Job::builder().completed_at_ms(1u64).build().is_stuck());
}

proptest! {
    #[test]
    fn terminal_statuses_never_move(from in arb_job_status(), to in arb_job_status()) {
        if from.is_terminal() && from != to {
            prop_assert!(!from.can_become(to));
        }
    }

    #[test]
    fn accepted_updates_never_regress(from in arb_job_status(), to in arb_job_status()) {
        let job = Job::builder().status(from).build();
        let update = StatusUpdate { status: Some(to), ..Default::default() };
        if let Ok(progress) = job.resolve_update(update, 100) {
            prop_assert!(from.can_become(progress.status));
            if progress.status.is_terminal() {
                prop_assert!(progress.completed_at_ms.is_some());
            }
        }
    }
}
