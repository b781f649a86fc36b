// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: the REST API under `/api/` and the UI paths.

mod api;
mod ui;

use axum::Router;
use js_core::{Cursor, Job, JobRequest, Page, RequestRow, Workspace};
use js_storage::MaterializedState;
use js_wire::{JobRequestResponse, JobResponse, Links, WorkspaceResponse};
use tower_http::trace::TraceLayer;

use crate::app::{AppState, Deps};

pub fn router<D: Deps>(state: AppState<D>) -> Router {
    Router::new()
        .merge(api::routes::<D>())
        .merge(ui::routes::<D>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn username(state: &MaterializedState, request: &JobRequest) -> String {
    state.users.get(&request.created_by).map(|u| u.username.clone()).unwrap_or_default()
}

fn workspace_response(state: &MaterializedState, workspace: &Workspace, links: &Links) -> WorkspaceResponse {
    let created_by =
        state.users.get(&workspace.created_by).map(|u| u.username.as_str()).unwrap_or_default();
    WorkspaceResponse::new(workspace, created_by, links)
}

fn job_response(state: &MaterializedState, job: &Job, links: &Links) -> Option<JobResponse> {
    let request = state.job_requests.get(&job.job_request)?;
    let workspace = state.workspaces.get(&request.workspace)?;
    Some(JobResponse::new(job, request, workspace_response(state, workspace, links), links))
}

fn job_request_response(
    state: &MaterializedState,
    request: &JobRequest,
    links: &Links,
) -> Option<JobRequestResponse> {
    let workspace = state.workspaces.get(&request.workspace)?;
    let jobs = state.jobs_for_request(request.id);
    Some(JobRequestResponse::new(
        request,
        &jobs,
        workspace_response(state, workspace, links),
        &username(state, request),
        links,
    ))
}

fn next_cursor<T>(page: &Page<T>) -> Option<String> {
    page.next.as_ref().map(Cursor::to_string)
}

fn rows_to_wire(rows: &[RequestRow<'_>]) -> Vec<js_wire::JobRequestRow> {
    rows.iter()
        .map(|row| js_wire::JobRequestRow::new(row.request, row.status(), row.workspace, row.username))
        .collect()
}
