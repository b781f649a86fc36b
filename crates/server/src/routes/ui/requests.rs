// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job request list, lookup, detail, and the request-wide actions.

use std::collections::BTreeSet;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use js_core::{
    cancel, zombify, Event, JobRequest, JobRequestFilter, JobRequestId, RequestStatus, SearchTerm,
    Workspace,
};
use js_wire::{
    links, unknown_identifier, IdentifierForm, JobRequestDetailView, JobRequestListView,
    JobRequestQuery,
};
use tracing::{info, instrument};

use super::super::{job_request_response, next_cursor, rows_to_wire};
use super::{backend_filter, workspace_filter};
use crate::app::{AppState, Deps};
use crate::auth::{can_run_jobs, Viewer};
use crate::error::{ApiError, ApiResult, Redirect};

fn find<D: Deps>(app: &AppState<D>, id: JobRequestId) -> ApiResult<(JobRequest, Workspace)> {
    app.store
        .read(|s| {
            let request = s.job_requests.get(&id)?;
            let workspace = s.workspaces.get(&request.workspace)?;
            Some((request.clone(), workspace.clone()))
        })
        .ok_or(ApiError::NotFound)
}

#[instrument(skip_all)]
pub(super) async fn list<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    query: Result<Query<JobRequestQuery>, QueryRejection>,
) -> ApiResult<Json<JobRequestListView>> {
    let Query(query) = query?;
    let status = query.status()?;
    let after = query.cursor()?;
    let page_size = app.page_size(query.page_size);

    let view = app.store.read(|s| {
        let filter = JobRequestFilter {
            backend: query.backend().map(|raw| backend_filter(s, raw)),
            status,
            workspace: query.workspace().map(|raw| workspace_filter(s, raw)),
            username: query.username().map(str::to_string),
            search: query.q().and_then(SearchTerm::parse),
        };
        let page = s.search_job_requests(&filter, after, page_size);

        let mut workspaces: Vec<String> = s.workspaces.values().map(|w| w.name.clone()).collect();
        workspaces.sort();
        let users: BTreeSet<String> = s
            .job_requests
            .values()
            .filter_map(|r| s.users.get(&r.created_by))
            .map(|u| u.username.clone())
            .collect();

        JobRequestListView {
            results: rows_to_wire(&page.items),
            next: next_cursor(&page),
            statuses: RequestStatus::ALL.to_vec(),
            backends: s.backends.values().map(|b| b.name.clone()).collect(),
            workspaces,
            users: users.into_iter().collect(),
            can_lookup: viewer.is_staff(),
        }
    });
    Ok(Json(view))
}

/// Jump to a request by its identifier.
#[instrument(skip_all)]
pub(super) async fn lookup<D: Deps>(
    State(app): State<AppState<D>>,
    body: Result<Json<IdentifierForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let Json(form) = body?;
    let identifier = form.validate()?;
    app.store
        .read(|s| s.job_request_by_identifier(identifier).map(|r| r.id))
        .map(|id| Redirect::to(links::job_request(id)))
        .ok_or_else(|| ApiError::field("identifier", unknown_identifier(identifier)))
}

#[instrument(skip_all, fields(job_request = %id))]
pub(super) async fn detail<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(id): Path<JobRequestId>,
) -> ApiResult<Json<JobRequestDetailView>> {
    let (request, workspace) = find(&app, id)?;
    let can_run = can_run_jobs(&app, viewer.user.as_ref(), Some(&workspace)).await?;

    app.store
        .read(|s| {
            let jobs = s.jobs_for_request(request.id);
            Some(JobRequestDetailView {
                job_request: job_request_response(s, &request, &app.links)?,
                can_cancel: can_run && !request.status(&jobs).is_finished(),
                can_zombify: viewer.is_staff() && !zombify::candidates(&jobs).is_empty(),
            })
        })
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Cancel every action the request has jobs for.
#[instrument(skip_all, fields(job_request = %id))]
pub(super) async fn cancel<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(id): Path<JobRequestId>,
) -> ApiResult<Redirect> {
    let (_, workspace) = find(&app, id)?;
    viewer.require_run(&app, Some(&workspace)).await?;

    let recorded = app.store.transact(|state| -> ApiResult<(Vec<Event>, Vec<String>)> {
        let mut request = state.job_requests.get(&id).cloned().ok_or(ApiError::NotFound)?;
        let jobs = state.jobs_for_request(id);
        let recorded = cancel::cancel_all(&mut request, &jobs);
        let events = if recorded.is_empty() {
            Vec::new()
        } else {
            vec![Event::JobRequestCancelled { id, actions: recorded.clone() }]
        };
        Ok((events, recorded))
    })?;

    info!(actions = ?recorded, "cancel requested");
    Ok(Redirect::to(links::job_request(id)))
}

/// Fail every job of the request that never recorded completion.
#[instrument(skip_all, fields(job_request = %id))]
pub(super) async fn zombify<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(id): Path<JobRequestId>,
) -> ApiResult<Redirect> {
    find(&app, id)?;
    let user = viewer.require_user(&app)?;
    let back = Redirect::to(links::job_request(id));
    if let Err(e) = zombify::authorize(user) {
        return Ok(back.with_message(e.to_string()));
    }

    let now = app.now_ms();
    let zombified = app.store.transact(|state| -> ApiResult<(Vec<Event>, usize)> {
        let jobs = state.jobs_for_request(id);
        let events: Vec<Event> = zombify::candidates(&jobs)
            .into_iter()
            .map(|job| Event::JobZombified { id: job, at_ms: now })
            .collect();
        let count = events.len();
        Ok((events, count))
    })?;

    info!(zombified, by = %user.username, "zombify requested");
    Ok(back)
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
