// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use js_core::workspace::normalize_name;
use js_core::{Event, WorkspaceId};
use js_wire::{CreateWorkspace, WorkspaceResponse, WORKSPACE_EXISTS};
use tracing::{info, instrument};

use super::super::workspace_response;
use crate::app::{AppState, Deps};
use crate::auth::Viewer;
use crate::error::{ApiError, ApiResult};

#[instrument(skip_all)]
pub(super) async fn list<D: Deps>(State(app): State<AppState<D>>) -> Json<Vec<WorkspaceResponse>> {
    let workspaces = app.store.read(|s| {
        let mut workspaces: Vec<_> = s.workspaces.values().collect();
        workspaces.sort_by(|a, b| a.name.cmp(&b.name));
        workspaces.into_iter().map(|w| workspace_response(s, w, &app.links)).collect()
    });
    Json(workspaces)
}

#[instrument(skip_all)]
pub(super) async fn create<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    body: Result<Json<CreateWorkspace>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WorkspaceResponse>)> {
    let user = viewer.user.ok_or(ApiError::Unauthenticated)?;
    let Json(body) = body?;
    body.validate()?;
    let name = normalize_name(&body.name);
    let now = app.now_ms();

    let id = app.store.transact(|state| -> ApiResult<(Vec<Event>, WorkspaceId)> {
        if state.workspace_by_name(&name).is_some() {
            return Err(ApiError::field("name", WORKSPACE_EXISTS));
        }
        let id = state.next_workspace_id();
        let event = Event::WorkspaceCreated {
            id,
            name: name.clone(),
            repo: body.repo.trim().to_string(),
            branch: body.branch.trim().to_string(),
            db: body.db.trim().to_string(),
            project: None,
            created_by: user.id,
            created_at_ms: now,
            should_notify: false,
        };
        Ok((vec![event], id))
    })?;

    info!(workspace = %name, created_by = %user.username, "workspace created");
    let workspace = app
        .store
        .read(|s| s.workspaces.get(&id).map(|w| workspace_response(s, w, &app.links)))
        .ok_or(ApiError::NotFound)?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

#[instrument(skip_all, fields(workspace = %id))]
pub(super) async fn detail<D: Deps>(
    State(app): State<AppState<D>>,
    Path(id): Path<WorkspaceId>,
) -> ApiResult<Json<WorkspaceResponse>> {
    app.store
        .read(|s| s.workspaces.get(&id).map(|w| workspace_response(s, w, &app.links)))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[cfg(test)]
#[path = "workspaces_tests.rs"]
mod tests;
