// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UI paths. Each GET answers with the data its page renders; form posts
//! answer with a redirect.

mod admin;
mod home;
mod jobs;
mod requests;
mod settings;
mod status;
mod workspaces;

use axum::routing::{get, post};
use axum::Router;
use js_core::{BackendId, WorkspaceId};
use js_storage::MaterializedState;

use crate::app::{AppState, Deps};

pub(super) fn routes<D: Deps>() -> Router<AppState<D>> {
    Router::new()
        .route("/", get(home::index::<D>))
        .route("/status/", get(status::index::<D>))
        .route("/settings/", get(settings::show::<D>).post(settings::update::<D>))
        // jobs and job requests
        .route("/jobs/{identifier}/", get(jobs::detail::<D>))
        .route("/jobs/{identifier}/cancel/", post(jobs::cancel::<D>))
        .route("/jobs/{identifier}/zombify/", post(jobs::zombify::<D>))
        .route("/job-requests/", get(requests::list::<D>).post(requests::lookup::<D>))
        .route("/job-requests/{id}/", get(requests::detail::<D>))
        .route("/job-requests/{id}/cancel/", post(requests::cancel::<D>))
        .route("/job-requests/{id}/zombify/", post(requests::zombify::<D>))
        // workspaces
        .route("/workspaces/", get(workspaces::new::<D>).post(workspaces::create::<D>))
        .route("/workspaces/{name}/", get(workspaces::detail::<D>).post(workspaces::run::<D>))
        .route("/workspaces/{name}/logs/", get(workspaces::logs::<D>))
        .route("/workspaces/{name}/release/", get(workspaces::release::<D>))
        .route("/workspaces/{name}/archive-toggle/", post(workspaces::archive_toggle::<D>))
        .route(
            "/workspaces/{name}/notifications-toggle/",
            post(workspaces::notifications_toggle::<D>),
        )
        // administration
        .route("/backends/", get(admin::backends::<D>))
        .route("/backends/{id}/", get(admin::backend_detail::<D>))
        .route("/backends/{id}/rotate-token/", post(admin::rotate_token::<D>))
        .route("/orgs/", get(admin::orgs::<D>).post(admin::create_org::<D>))
        .route("/orgs/{org}/", get(admin::org_detail::<D>))
        .route(
            "/orgs/{org}/new-project/",
            get(admin::org_detail::<D>).post(admin::create_project::<D>),
        )
        .route("/orgs/{org}/{project}/", get(admin::project_detail::<D>))
        .route("/orgs/{org}/{project}/members/", post(admin::set_membership::<D>))
        .route("/orgs/{org}/{project}/{name}/", get(workspaces::project_detail::<D>))
}

/// Filters accept a backend's name or its id.
fn backend_filter(state: &MaterializedState, raw: &str) -> String {
    raw.parse::<BackendId>()
        .ok()
        .and_then(|id| state.backends.get(&id))
        .map(|b| b.name.clone())
        .unwrap_or_else(|| raw.to_string())
}

/// Filters accept a workspace's name or its id.
fn workspace_filter(state: &MaterializedState, raw: &str) -> String {
    raw.parse::<WorkspaceId>()
        .ok()
        .and_then(|id| state.workspaces.get(&id))
        .map(|w| w.name.clone())
        .unwrap_or_else(|| raw.to_string())
}
