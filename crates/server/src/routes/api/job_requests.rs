// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/api/job-requests/`: what a backend polls for work and cancellations.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::Json;
use js_core::{Event, JobRequestFilter, JobRequestId, SearchTerm};
use js_wire::{JobRequestQuery, JobRequestResponse, Paginated, UpdateJobRequest};
use tracing::instrument;

use super::super::{job_request_response, next_cursor};
use crate::app::{AppState, Deps};
use crate::auth::BackendAuth;
use crate::error::{ApiError, ApiResult};

/// The authenticated backend's requests, newest first. Records a heartbeat.
#[instrument(skip_all, fields(backend = %backend.name))]
pub(super) async fn list<D: Deps>(
    State(app): State<AppState<D>>,
    BackendAuth(backend): BackendAuth,
    uri: Uri,
    query: Result<Query<JobRequestQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<JobRequestResponse>>> {
    let Query(query) = query?;
    let filter = JobRequestFilter {
        backend: Some(backend.name.clone()),
        status: query.status()?,
        workspace: query.workspace().map(str::to_string),
        username: query.username().map(str::to_string),
        search: query.q().and_then(SearchTerm::parse),
    };
    let after = query.cursor()?;
    let page_size = app.page_size(query.page_size);

    app.store.emit(vec![Event::BackendSeen {
        id: backend.id,
        at_ms: app.now_ms(),
        url: Some(uri.to_string()),
    }])?;

    let page = app.store.read(|s| {
        let page = s.search_job_requests(&filter, after, page_size);
        let results = page
            .items
            .iter()
            .filter_map(|row| job_request_response(s, row.request, &app.links))
            .collect();
        Paginated { results, next: next_cursor(&page) }
    });
    Ok(Json(page))
}

#[instrument(skip_all, fields(job_request = %id, backend = %backend.name))]
pub(super) async fn detail<D: Deps>(
    State(app): State<AppState<D>>,
    BackendAuth(backend): BackendAuth,
    Path(id): Path<JobRequestId>,
) -> ApiResult<Json<JobRequestResponse>> {
    app.store
        .read(|s| {
            s.job_requests
                .get(&id)
                .filter(|r| r.backend == backend.name)
                .and_then(|r| job_request_response(s, r, &app.links))
        })
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Nothing on a job request is writable here; a backend change is rejected.
#[instrument(skip_all, fields(job_request = %id, backend = %backend.name))]
pub(super) async fn update<D: Deps>(
    State(app): State<AppState<D>>,
    BackendAuth(backend): BackendAuth,
    Path(id): Path<JobRequestId>,
    body: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> ApiResult<Json<JobRequestResponse>> {
    let Json(body) = body?;
    app.store.read(|s| -> ApiResult<Json<JobRequestResponse>> {
        let request =
            s.job_requests.get(&id).filter(|r| r.backend == backend.name).ok_or(ApiError::NotFound)?;
        if let Some(requested) = body.backend.as_deref() {
            request.check_backend(requested.trim())?;
        }
        job_request_response(s, request, &app.links).map(Json).ok_or(ApiError::NotFound)
    })
}

#[cfg(test)]
#[path = "job_requests_tests.rs"]
mod tests;
