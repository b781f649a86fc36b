// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use js_core::{JobOutput, JobRequestFilter, QueueCounts, RequestStatus, SearchTerm};

/// Requests:
/// 1: w1/tpp, jobs a=Succeeded            -> succeeded
/// 2: w1/tpp, jobs a=Running, b=Pending   -> running
/// 3: w2/tpp, no jobs                     -> pending
/// 4: w2/emis, jobs train=Failed          -> failed
fn populated() -> MaterializedState {
    let mut state = seeded();
    for event in [
        job_request_created_event(1, 1, "tpp", &["a"]),
        job_created_event(1, 1, "a", JobStatus::Succeeded),
        job_request_created_event(2, 1, "tpp", &["a", "b"]),
        job_created_event(2, 2, "a", JobStatus::Running),
        job_created_event(3, 2, "b", JobStatus::Pending),
        job_request_created_event(3, 2, "tpp", &["generate_cohort"]),
        job_request_created_event(4, 2, "emis", &["train"]),
        job_created_event(4, 4, "train", JobStatus::Failed),
    ] {
        state.apply_event(&event);
    }
    state
}

fn ids(state: &MaterializedState, filter: &JobRequestFilter) -> Vec<u64> {
    state
        .search_job_requests(filter, None, 100)
        .items
        .iter()
        .map(|row| row.request.id.get())
        .collect()
}

#[test]
fn lookups_by_name() {
    let state = populated();
    assert_eq!(state.user_by_username("alice").map(|u| u.id), Some(UserId(1)));
    assert_eq!(state.workspace_by_name(" W1 ").map(|w| w.id), Some(WorkspaceId(1)));
    assert_eq!(state.backend_by_name("emis").map(|b| b.id), Some(BackendId(2)));
    assert!(state.backend_by_token("").is_none());
    assert_eq!(
        state.job_request_by_identifier("request00000002").map(|r| r.id),
        Some(JobRequestId(2))
    );
    assert_eq!(state.job_by_identifier("job00000003").map(|j| j.id), Some(JobId(3)));
    assert!(state.job_by_identifier("job0000000").is_none());
}

#[test]
fn request_status_uses_jobs() {
    let state = populated();
    let status = |id| state.request_status(&state.job_requests[&JobRequestId(id)]);
    assert_eq!(status(1), RequestStatus::Succeeded);
    assert_eq!(status(2), RequestStatus::Running);
    assert_eq!(status(3), RequestStatus::Pending);
    assert_eq!(status(4), RequestStatus::Failed);
}

#[test]
fn search_is_newest_first() {
    let state = populated();
    assert_eq!(ids(&state, &JobRequestFilter::default()), vec![4, 3, 2, 1]);
}

#[test]
fn filters_combine() {
    let state = populated();
    let filter = JobRequestFilter {
        backend: Some("tpp".to_string()),
        workspace: Some("w1".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&state, &filter), vec![2, 1]);

    let filter = JobRequestFilter {
        status: Some(RequestStatus::Pending),
        ..Default::default()
    };
    assert_eq!(ids(&state, &filter), vec![3]);

    let filter = JobRequestFilter { username: Some("bob".to_string()), ..Default::default() };
    assert!(ids(&state, &filter).is_empty());
}

#[test]
fn search_by_text_and_id() {
    let state = populated();
    let text = JobRequestFilter { search: SearchTerm::parse("COHORT"), ..Default::default() };
    assert_eq!(ids(&state, &text), vec![3]);

    // Job 3 belongs to request 2; request 3 matches by its own id
    let id = JobRequestFilter { search: SearchTerm::parse("3"), ..Default::default() };
    assert_eq!(ids(&state, &id), vec![3, 2]);
}

#[test]
fn pages_follow_cursor() {
    let state = populated();
    let filter = JobRequestFilter::default();

    let first = state.search_job_requests(&filter, None, 3);
    assert_eq!(first.items.len(), 3);
    let next = first.next.unwrap();

    let second = state.search_job_requests(&filter, Some(next), 3);
    let ids: Vec<u64> = second.items.iter().map(|r| r.request.id.get()).collect();
    assert_eq!(ids, vec![1]);
    assert!(second.next.is_none());
}

#[test]
fn latest_action_status_per_workspace() {
    let state = populated();
    assert_eq!(state.latest_action_status(WorkspaceId(1), "a"), Some(JobStatus::Running));
    assert_eq!(state.latest_action_status(WorkspaceId(2), "train"), Some(JobStatus::Failed));
    assert_eq!(state.latest_action_status(WorkspaceId(2), "a"), None);
}

#[test]
fn queue_counts_split_on_jobs() {
    let state = populated();
    assert_eq!(state.queue_counts("tpp"), QueueCounts { acked: 1, unacked: 1 });
    assert_eq!(state.queue_counts("emis"), QueueCounts::default());
}

#[test]
fn active_workspaces_skip_archived() {
    let mut state = populated();
    state.apply_event(&Event::WorkspaceArchiveSet { id: WorkspaceId(1), archived: true });

    let names: Vec<&str> = state.active_workspaces().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["w2"]);
}

#[test]
fn workspace_for_job_via_request() {
    let state = populated();
    let job = &state.jobs[&JobId(4)];
    assert_eq!(state.workspace_for_job(job).map(|w| w.id), Some(WorkspaceId(2)));
}

fn outputs_event(job: u64, name: &str) -> Event {
    Event::JobOutputsSet {
        id: JobId(job),
        outputs: vec![JobOutput {
            name: name.to_string(),
            location: format!("output/{name}"),
            privacy_level: "highly_sensitive".to_string(),
        }],
    }
}

#[test]
fn releasable_jobs_keep_latest_success_per_action() {
    let mut state = populated();
    for event in [
        outputs_event(1, "first.csv"),
        outputs_event(2, "running.csv"),
        outputs_event(4, "failed.csv"),
        job_created_event(5, 1, "a", JobStatus::Succeeded),
        outputs_event(5, "second.csv"),
        job_created_event(6, 1, "b", JobStatus::Succeeded),
    ] {
        state.apply_event(&event);
    }

    let w1: Vec<u64> = state.releasable_jobs(WorkspaceId(1)).iter().map(|j| j.id.get()).collect();
    assert_eq!(w1, vec![5]);
    assert!(state.releasable_jobs(WorkspaceId(2)).is_empty());
}
