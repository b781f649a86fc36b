// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single jobs, addressed by identifier.

use axum::extract::{Path, State};
use axum::Json;
use js_core::{cancel, zombify, CancelOutcome, Event, Job, JobRequest, Workspace};
use js_wire::{links, JobDetailView};
use tracing::{info, instrument};

use super::super::job_response;
use crate::app::{AppState, Deps};
use crate::auth::{can_run_jobs, Viewer};
use crate::error::{ApiError, ApiResult, Redirect};

fn find<D: Deps>(app: &AppState<D>, identifier: &str) -> ApiResult<(Job, JobRequest, Workspace)> {
    app.store
        .read(|s| {
            let job = s.job_by_identifier(identifier)?;
            let request = s.job_requests.get(&job.job_request)?;
            let workspace = s.workspaces.get(&request.workspace)?;
            Some((job.clone(), request.clone(), workspace.clone()))
        })
        .ok_or(ApiError::NotFound)
}

#[instrument(skip_all, fields(job = %identifier))]
pub(super) async fn detail<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(identifier): Path<String>,
) -> ApiResult<Json<JobDetailView>> {
    let (job, request, workspace) = find(&app, &identifier)?;
    let can_run = can_run_jobs(&app, viewer.user.as_ref(), Some(&workspace)).await?;

    app.store
        .read(|s| {
            let jobs = s.jobs_for_request(request.id);
            let cancellable = cancel::evaluate(&request, &jobs, &job.action) == CancelOutcome::Recorded;
            Some(JobDetailView {
                job: job_response(s, &job, &app.links)?,
                job_request_url: links::job_request(request.id),
                can_cancel: can_run && cancellable,
                can_zombify: viewer.is_staff() && job.is_stuck(),
            })
        })
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Record the intent to cancel this job's action. The backend does the rest.
#[instrument(skip_all, fields(job = %identifier))]
pub(super) async fn cancel<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(identifier): Path<String>,
) -> ApiResult<Redirect> {
    let (job, _, workspace) = find(&app, &identifier)?;
    viewer.require_run(&app, Some(&workspace)).await?;

    let outcome = app.store.transact(|state| -> ApiResult<(Vec<Event>, CancelOutcome)> {
        let mut request = state.job_requests.get(&job.job_request).cloned().ok_or(ApiError::NotFound)?;
        let jobs = state.jobs_for_request(request.id);
        let outcome = cancel::cancel(&mut request, &jobs, &job.action);
        let events = match outcome {
            CancelOutcome::Recorded => {
                vec![Event::JobRequestCancelled { id: request.id, actions: vec![job.action.clone()] }]
            }
            _ => Vec::new(),
        };
        Ok((events, outcome))
    })?;

    info!(action = %job.action, ?outcome, "cancel requested");
    Ok(Redirect::to(links::job(&identifier)))
}

#[instrument(skip_all, fields(job = %identifier))]
pub(super) async fn zombify<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(identifier): Path<String>,
) -> ApiResult<Redirect> {
    let (job, _, _) = find(&app, &identifier)?;
    let user = viewer.require_user(&app)?;
    let back = Redirect::to(links::job(&identifier));
    if let Err(e) = zombify::authorize(user) {
        return Ok(back.with_message(e.to_string()));
    }

    let now = app.now_ms();
    let zombified = app.store.transact(|state| -> ApiResult<(Vec<Event>, usize)> {
        let current = state.jobs.get(&job.id).ok_or(ApiError::NotFound)?;
        let events: Vec<Event> = zombify::candidates(&[current])
            .into_iter()
            .map(|id| Event::JobZombified { id, at_ms: now })
            .collect();
        let count = events.len();
        Ok((events, count))
    })?;

    info!(zombified, by = %user.username, "zombify requested");
    Ok(back)
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
