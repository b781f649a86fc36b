// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST API. Backends authenticate with their token; reads are public.

mod job_requests;
mod jobs;
mod workspaces;

use axum::routing::get;
use axum::Router;

use crate::app::{AppState, Deps};

pub(super) fn routes<D: Deps>() -> Router<AppState<D>> {
    Router::new()
        .route("/api/jobs/", get(jobs::list::<D>).post(jobs::create::<D>))
        .route("/api/jobs/{id}/", get(jobs::detail::<D>).patch(jobs::update::<D>))
        .route("/api/job-requests/", get(job_requests::list::<D>))
        .route("/api/job-requests/{id}/", get(job_requests::detail::<D>).patch(job_requests::update::<D>))
        .route("/api/workspaces/", get(workspaces::list::<D>).post(workspaces::create::<D>))
        .route("/api/workspaces/{id}/", get(workspaces::detail::<D>))
}

