// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::State;
use axum::Json;
use js_core::JobRequestFilter;
use js_wire::{IndexView, WorkspaceLink};
use tracing::instrument;

use super::super::rows_to_wire;
use crate::app::{AppState, Deps};
use crate::auth::{can_run_jobs, Viewer};
use crate::error::ApiResult;

const RECENT_REQUESTS: usize = 10;

#[instrument(skip_all)]
pub(super) async fn index<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
) -> ApiResult<Json<IndexView>> {
    let can_run_jobs = can_run_jobs(&app, viewer.user.as_ref(), None).await?;
    let view = app.store.read(|s| {
        let page = s.search_job_requests(&JobRequestFilter::default(), None, RECENT_REQUESTS);
        IndexView {
            job_requests: rows_to_wire(&page.items),
            workspaces: s.active_workspaces().into_iter().map(WorkspaceLink::from).collect(),
            can_run_jobs,
        }
    });
    Ok(Json(view))
}

#[cfg(test)]
#[path = "home_tests.rs"]
mod tests;
