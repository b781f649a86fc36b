// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staff pages: backends and their tokens, orgs, projects, memberships.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use js_core::{id, BackendId, Event, Org, OrgId, Project, ProjectId};
use js_storage::MaterializedState;
use js_wire::{
    links, BackendView, MembershipForm, MembershipView, OrgForm, OrgView, ProjectForm, ProjectView,
    WorkspaceLink,
};
use tracing::{info, instrument};

use crate::app::{AppState, Deps};
use crate::auth::Viewer;
use crate::error::{ApiError, ApiResult, Redirect};

const ORG_EXISTS: &str = "An organisation with this name already exists.";
const PROJECT_EXISTS: &str = "A project with this name already exists in this organisation.";
const NO_SLUG: &str = "Name must contain at least one letter or digit.";

fn backend_view(state: &MaterializedState, id: BackendId) -> Option<BackendView> {
    let backend = state.backends.get(&id)?;
    let last_seen = state.stats.get(&id).and_then(|s| s.api_last_seen_ms);
    Some(BackendView::new(backend, last_seen))
}

fn org_view(state: &MaterializedState, org: &Org) -> OrgView {
    let mut view = OrgView::new(org);
    view.projects = state.projects_for_org(org).into_iter().map(|p| ProjectView::new(org, p)).collect();
    view
}

fn project_view(state: &MaterializedState, org: &Org, project: &Project) -> ProjectView {
    let mut view = ProjectView::new(org, project);
    view.memberships = state
        .memberships_for_project(project)
        .into_iter()
        .filter_map(|m| state.users.get(&m.user).map(|u| MembershipView::new(m, &u.username)))
        .collect();
    view.workspaces = state
        .workspaces
        .values()
        .filter(|w| w.project == Some(project.id))
        .map(WorkspaceLink::from)
        .collect();
    view
}

fn find_project(state: &MaterializedState, org: &str, project: &str) -> Option<(Org, Project)> {
    let org = state.org_by_slug(org)?;
    let project = state.project_by_slug(org, project)?;
    Some((org.clone(), project.clone()))
}

// ── Backends ──

#[instrument(skip_all)]
pub(super) async fn backends<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
) -> ApiResult<Json<Vec<BackendView>>> {
    viewer.require_staff(&app)?;
    let views = app.store.read(|s| s.backends.keys().filter_map(|id| backend_view(s, *id)).collect());
    Ok(Json(views))
}

#[instrument(skip_all, fields(backend = %id))]
pub(super) async fn backend_detail<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(id): Path<BackendId>,
) -> ApiResult<Json<BackendView>> {
    viewer.require_staff(&app)?;
    app.store.read(|s| backend_view(s, id)).map(Json).ok_or(ApiError::NotFound)
}

/// Issue a fresh token; the old one stops working immediately.
#[instrument(skip_all, fields(backend = %id))]
pub(super) async fn rotate_token<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(id): Path<BackendId>,
) -> ApiResult<Redirect> {
    let user = viewer.require_staff(&app)?;
    app.store.transact(|state| -> ApiResult<(Vec<Event>, ())> {
        if !state.backends.contains_key(&id) {
            return Err(ApiError::NotFound);
        }
        Ok((vec![Event::BackendTokenRotated { id, auth_token: id::auth_token() }], ()))
    })?;
    info!(by = %user.username, "backend token rotated");
    Ok(Redirect::to(links::backend(id)))
}

// ── Orgs and projects ──

#[instrument(skip_all)]
pub(super) async fn orgs<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
) -> ApiResult<Json<Vec<OrgView>>> {
    viewer.require_staff(&app)?;
    let views = app.store.read(|s| s.orgs.values().map(|org| org_view(s, org)).collect());
    Ok(Json(views))
}

#[instrument(skip_all)]
pub(super) async fn create_org<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    body: Result<Json<OrgForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let user = viewer.require_staff(&app)?;
    let Json(form) = body?;
    let name = form.validate()?;
    let slug = id::slugify(&name);
    if slug.is_empty() {
        return Err(ApiError::field("name", NO_SLUG));
    }

    let now = app.now_ms();
    app.store.transact(|state| -> ApiResult<(Vec<Event>, OrgId)> {
        if state.org_by_slug(&slug).is_some() {
            return Err(ApiError::field("name", ORG_EXISTS));
        }
        let id = state.next_org_id();
        let event = Event::OrgCreated {
            id,
            name: name.clone(),
            slug: slug.clone(),
            created_by: user.id,
            created_at_ms: now,
        };
        Ok((vec![event], id))
    })?;

    info!(org = %slug, "org created");
    Ok(Redirect::to(links::org(&slug)))
}

#[instrument(skip_all, fields(org = %org))]
pub(super) async fn org_detail<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(org): Path<String>,
) -> ApiResult<Json<OrgView>> {
    viewer.require_staff(&app)?;
    app.store
        .read(|s| s.org_by_slug(&org).map(|o| org_view(s, o)))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[instrument(skip_all, fields(org = %org))]
pub(super) async fn create_project<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(org): Path<String>,
    body: Result<Json<ProjectForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let user = viewer.require_staff(&app)?;
    let org = app.store.read(|s| s.org_by_slug(&org).cloned()).ok_or(ApiError::NotFound)?;
    let Json(form) = body?;
    form.validate()?;
    let slug = id::slugify(&form.name);
    if slug.is_empty() {
        return Err(ApiError::field("name", NO_SLUG));
    }

    let now = app.now_ms();
    app.store.transact(|state| -> ApiResult<(Vec<Event>, ProjectId)> {
        if state.project_by_slug(&org, &slug).is_some() {
            return Err(ApiError::field("name", PROJECT_EXISTS));
        }
        let id = state.next_project_id();
        let event = Event::ProjectCreated {
            id,
            org: org.id,
            name: form.name.trim().to_string(),
            slug: slug.clone(),
            project_lead: form.project_lead.trim().to_string(),
            email: form.email.trim().to_string(),
            created_by: user.id,
            created_at_ms: now,
        };
        Ok((vec![event], id))
    })?;

    info!(org = %org.slug, project = %slug, "project created");
    Ok(Redirect::to(links::project(&org.slug, &slug)))
}

#[instrument(skip_all, fields(org = %org, project = %project))]
pub(super) async fn project_detail<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path((org, project)): Path<(String, String)>,
) -> ApiResult<Json<ProjectView>> {
    viewer.require_staff(&app)?;
    app.store
        .read(|s| find_project(s, &org, &project).map(|(o, p)| project_view(s, &o, &p)))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Set a user's roles on a project. An empty role list keeps the
/// membership with no roles.
#[instrument(skip_all, fields(org = %org, project = %project))]
pub(super) async fn set_membership<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path((org, project)): Path<(String, String)>,
    body: Result<Json<MembershipForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    viewer.require_staff(&app)?;
    let (org, project) =
        app.store.read(|s| find_project(s, &org, &project)).ok_or(ApiError::NotFound)?;
    let Json(form) = body?;
    let roles = form.validate()?;
    let username = form.username.trim();

    app.store.transact(|state| -> ApiResult<(Vec<Event>, ())> {
        let user = state
            .user_by_username(username)
            .ok_or_else(|| ApiError::field("username", format!("Unknown user \"{username}\"")))?;
        let event = Event::MembershipSet { project: project.id, user: user.id, roles: roles.clone() };
        Ok((vec![event], ()))
    })?;

    info!(username, ?roles, "membership set");
    Ok(Redirect::to(links::project(&org.slug, &project.slug)))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
