// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/api/jobs/`: backends create jobs for their requests and push status.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use js_core::{id, Event, Job, JobId, JobRequestId, JobStatus, StatusUpdate};
use js_wire::{CreateJob, JobListQuery, JobResponse, Paginated, UpdateJob};
use tracing::{info, instrument};

use super::super::job_response;
use crate::app::{AppState, Deps};
use crate::auth::BackendAuth;
use crate::error::{ApiError, ApiResult};

const WORKSPACE_MISMATCH: &str = "Does not match the job request's workspace";
const IDENTIFIER_TAKEN: &str = "job with this identifier already exists.";

fn invalid_pk(pk: u64) -> String {
    format!("Invalid pk \"{pk}\" - object does not exist.")
}

/// Newest first. The cursor is the id of the last job on the previous page.
#[instrument(skip_all)]
pub(super) async fn list<D: Deps>(
    State(app): State<AppState<D>>,
    query: Result<Query<JobListQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<JobResponse>>> {
    let Query(query) = query?;
    let page_size = app.page_size(query.page_size);

    let page = app.store.read(|s| {
        let mut jobs: Vec<&Job> = s
            .jobs
            .values()
            .rev()
            .filter(|job| query.job_request_id.is_none_or(|id| job.job_request.get() == id))
            .filter(|job| query.cursor.is_none_or(|cursor| job.id.get() < cursor))
            .take(page_size + 1)
            .collect();
        let has_more = jobs.len() > page_size;
        jobs.truncate(page_size);
        let next = if has_more { jobs.last().map(|job| job.id.to_string()) } else { None };
        let results = jobs.iter().filter_map(|job| job_response(s, job, &app.links)).collect();
        Paginated { results, next }
    });
    Ok(Json(page))
}

#[instrument(skip_all, fields(backend = %backend.name))]
pub(super) async fn create<D: Deps>(
    State(app): State<AppState<D>>,
    BackendAuth(backend): BackendAuth,
    body: Result<Json<CreateJob>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let Json(body) = body?;
    let new = body.validate()?;
    let now = app.now_ms();

    let id = app.store.transact(|state| -> ApiResult<(Vec<Event>, JobId)> {
        let request_id = JobRequestId(new.job_request_id);
        let request = state
            .job_requests
            .get(&request_id)
            .filter(|request| request.backend == backend.name)
            .ok_or_else(|| ApiError::field("job_request_id", invalid_pk(new.job_request_id)))?;
        if new.workspace_id.is_some_and(|ws| ws != request.workspace.get()) {
            return Err(ApiError::field("workspace_id", WORKSPACE_MISMATCH));
        }
        let identifier = match &new.identifier {
            Some(given) if state.jobs.values().any(|job| &job.identifier == given) => {
                return Err(ApiError::field("identifier", IDENTIFIER_TAKEN));
            }
            Some(given) => given.clone(),
            None => id::identifier(),
        };

        let id = state.next_job_id();
        let created = Job {
            id,
            identifier: identifier.clone(),
            job_request: request_id,
            action: new.action.clone(),
            status: JobStatus::Unscheduled,
            status_message: String::new(),
            created_at_ms: now,
            updated_at_ms: now,
            started_at_ms: None,
            completed_at_ms: None,
            outputs: Vec::new(),
        };
        let progress = created.resolve_update(
            StatusUpdate {
                status: Some(new.status),
                status_message: Some(new.status_message.clone()),
                started_at_ms: new.started_at_ms,
                completed_at_ms: new.completed_at_ms,
            },
            now,
        )?;

        let mut events = vec![Event::JobCreated {
            id,
            identifier,
            job_request: request_id,
            action: new.action.clone(),
            status: new.status,
            status_message: new.status_message.clone(),
            created_at_ms: now,
        }];
        if progress.started_at_ms.is_some() || progress.completed_at_ms.is_some() {
            events.push(Event::JobUpdated { id, progress, at_ms: now });
        }
        if !new.outputs.is_empty() {
            events.push(Event::JobOutputsSet { id, outputs: new.outputs.clone() });
        }
        Ok((events, id))
    })?;

    info!(job = %id, action = %new.action, "job created");
    let job = app
        .store
        .read(|s| s.jobs.get(&id).and_then(|job| job_response(s, job, &app.links)))
        .ok_or(ApiError::NotFound)?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[instrument(skip_all, fields(job = %id))]
pub(super) async fn detail<D: Deps>(
    State(app): State<AppState<D>>,
    Path(id): Path<JobId>,
) -> ApiResult<Json<JobResponse>> {
    app.store
        .read(|s| s.jobs.get(&id).and_then(|job| job_response(s, job, &app.links)))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Partial status report. Jobs of other backends are not found.
#[instrument(skip_all, fields(job = %id, backend = %backend.name))]
pub(super) async fn update<D: Deps>(
    State(app): State<AppState<D>>,
    BackendAuth(backend): BackendAuth,
    Path(id): Path<JobId>,
    body: Result<Json<UpdateJob>, JsonRejection>,
) -> ApiResult<Json<JobResponse>> {
    let Json(body) = body?;
    let (update, outputs) = body.validate()?;
    let now = app.now_ms();

    let status = app.store.transact(|state| -> ApiResult<(Vec<Event>, JobStatus)> {
        let job = state
            .jobs
            .get(&id)
            .filter(|job| {
                state.job_requests.get(&job.job_request).is_some_and(|r| r.backend == backend.name)
            })
            .ok_or(ApiError::NotFound)?;
        let progress = job.resolve_update(update, now)?;
        job.check_outputs(&outputs)?;

        let status = progress.status;
        let mut events = vec![Event::JobUpdated { id, progress, at_ms: now }];
        if !outputs.is_empty() {
            events.push(Event::JobOutputsSet { id, outputs });
        }
        Ok((events, status))
    })?;

    info!(%status, "job updated");
    app.store
        .read(|s| s.jobs.get(&id).and_then(|job| job_response(s, job, &app.links)))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
