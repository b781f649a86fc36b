// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspaces: creation, the detail page with its run form, logs, toggles.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use js_adapters::RepoHostAdapter;
use js_core::workspace::normalize_name;
use js_core::{id, Event, JobRequestFilter, JobRequestId, SearchTerm, Workspace, WorkspaceId};
use js_pipeline::{parse_actions, Action};
use js_wire::{
    links, unknown_branch, ActionView, ArchiveForm, CreateWorkspace, JobRequestQuery,
    NotificationsForm, ReleaseOutput, RepoView, RunForm, WorkspaceCreateView,
    WorkspaceDetailView, WorkspaceLink, WorkspaceLogView, WorkspaceReleaseView, NON_FIELD_ERRORS,
    UNKNOWN_REPO, WORKSPACE_EXISTS,
};
use tracing::{info, instrument, warn};

use super::super::{next_cursor, rows_to_wire, workspace_response};
use crate::app::{AppState, Deps};
use crate::auth::{can_run_jobs, Viewer};
use crate::error::{ApiError, ApiResult, Redirect};

const ARCHIVED: &str = "You cannot create Jobs for an archived Workspace.";

fn find<D: Deps>(app: &AppState<D>, name: &str) -> Option<Workspace> {
    app.store.read(|s| s.workspace_by_name(name).cloned())
}

/// Page of a workspace that belongs to a project.
fn project_url<D: Deps>(app: &AppState<D>, workspace: &Workspace) -> Option<String> {
    let project_id = workspace.project?;
    app.store.read(|s| {
        let project = s.projects.get(&project_id)?;
        let org = s.orgs.get(&project.org)?;
        Some(links::project_workspace(&org.slug, &project.slug, &workspace.name))
    })
}

async fn load_actions<D: Deps>(app: &AppState<D>, workspace: &Workspace) -> Result<Vec<Action>, String> {
    let yaml = app
        .repo_host
        .pipeline_definition(&workspace.repo, &workspace.branch)
        .await
        .map_err(|e| e.to_string())?;
    parse_actions(&yaml).map_err(|e| e.to_string())
}

#[instrument(skip_all)]
pub(super) async fn new<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
) -> ApiResult<Json<WorkspaceCreateView>> {
    viewer.require_run(&app, None).await?;
    let repos = app.repo_host.repos_with_branches().await?;
    let repos_with_branches = repos
        .into_iter()
        .map(|repo| RepoView { name: repo.name, url: repo.url, branches: repo.branches })
        .collect();
    Ok(Json(WorkspaceCreateView { repos_with_branches }))
}

/// Create a workspace from one of the repo host's repos and make it the
/// creator's selected workspace.
#[instrument(skip_all)]
pub(super) async fn create<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    body: Result<Json<CreateWorkspace>, JsonRejection>,
) -> ApiResult<Redirect> {
    let user = viewer.require_run(&app, None).await?;
    let Json(form) = body?;
    form.validate()?;

    let repos = app.repo_host.repos_with_branches().await?;
    let repo = repos
        .iter()
        .find(|repo| repo.url == form.repo.trim())
        .ok_or_else(|| ApiError::field("repo", UNKNOWN_REPO))?;
    let branch = repo
        .branches
        .iter()
        .find(|b| b.eq_ignore_ascii_case(form.branch.trim()))
        .ok_or_else(|| ApiError::field("branch", unknown_branch(form.branch.trim())))?;

    let name = normalize_name(&form.name);
    let now = app.now_ms();
    app.store.transact(|state| -> ApiResult<(Vec<Event>, WorkspaceId)> {
        if state.workspace_by_name(&name).is_some() {
            return Err(ApiError::field("name", WORKSPACE_EXISTS));
        }
        let id = state.next_workspace_id();
        let events = vec![
            Event::WorkspaceCreated {
                id,
                name: name.clone(),
                repo: repo.url.clone(),
                branch: branch.clone(),
                db: form.db.trim().to_string(),
                project: None,
                created_by: user.id,
                created_at_ms: now,
                should_notify: false,
            },
            Event::UserWorkspaceSelected { id: user.id, workspace: id },
        ];
        Ok((events, id))
    })?;

    info!(workspace = %name, repo = %repo.url, "workspace created");
    Ok(Redirect::to(links::workspace(&name)))
}

async fn render<D: Deps>(
    app: &AppState<D>,
    viewer: &Viewer,
    workspace: Workspace,
) -> ApiResult<Json<WorkspaceDetailView>> {
    let can_run = can_run_jobs(app, viewer.user.as_ref(), Some(&workspace)).await?;
    let (actions, actions_error) = match viewer.user {
        None => (Vec::new(), None),
        Some(_) => match load_actions(app, &workspace).await {
            Ok(actions) => (actions, None),
            Err(e) => {
                warn!(workspace = %workspace.name, error = %e, "could not load pipeline");
                (Vec::new(), Some(e))
            }
        },
    };

    let view = app.store.read(|s| {
        let actions = actions
            .into_iter()
            .map(|action| ActionView {
                status: s
                    .latest_action_status(workspace.id, &action.name)
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                name: action.name,
                needs: action.needs,
            })
            .collect();
        WorkspaceDetailView {
            workspace: workspace_response(s, &workspace, &app.links),
            branch: workspace.branch.clone(),
            repo_name: workspace.repo_name().to_string(),
            actions,
            actions_error,
            can_run_jobs: can_run,
            backends: viewer.is_staff().then(|| app.config.backends.clone()),
            logs_url: links::workspace_logs(&workspace.name),
        }
    });
    Ok(Json(view))
}

/// Workspaces that belong to a project live under the project's URL.
#[instrument(skip_all, fields(workspace = %name))]
pub(super) async fn detail<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let Some(workspace) = find(&app, &name) else {
        return Ok(Redirect::to(links::home()).into_response());
    };
    if let Some(url) = project_url(&app, &workspace) {
        return Ok(Redirect::to(url).into_response());
    }
    Ok(render(&app, &viewer, workspace).await?.into_response())
}

#[instrument(skip_all, fields(org = %org, project = %project, workspace = %name))]
pub(super) async fn project_detail<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path((org, project, name)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    let project_id = app
        .store
        .read(|s| {
            let org = s.org_by_slug(&org)?;
            s.project_by_slug(org, &project).map(|p| p.id)
        })
        .ok_or(ApiError::NotFound)?;
    let Some(workspace) = find(&app, &name) else {
        return Ok(Redirect::to(links::home()).into_response());
    };
    match workspace.project {
        None => Ok(Redirect::to(links::workspace(&workspace.name)).into_response()),
        Some(id) if id != project_id => Err(ApiError::NotFound),
        Some(_) => Ok(render(&app, &viewer, workspace).await?.into_response()),
    }
}

/// The run form: request actions from the workspace's pipeline.
#[instrument(skip_all, fields(workspace = %name))]
pub(super) async fn run<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(name): Path<String>,
    body: Result<Json<RunForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let Some(workspace) = find(&app, &name) else {
        return Ok(Redirect::to(links::home()));
    };
    let user = viewer.require_run(&app, Some(&workspace)).await?;
    if workspace.is_archived {
        return Ok(Redirect::to(links::workspace(&workspace.name)).with_message(ARCHIVED));
    }
    let Json(form) = body?;

    let yaml = app.repo_host.pipeline_definition(&workspace.repo, &workspace.branch).await?;
    let actions =
        parse_actions(&yaml).map_err(|e| ApiError::field(NON_FIELD_ERRORS, e.to_string()))?;
    let known: Vec<&str> = actions.iter().map(|a| a.name.as_str()).collect();
    let choice = form.validate(&known, &app.config.backends, user.is_superuser)?;
    let sha = app.repo_host.branch_sha(&workspace.repo, &workspace.branch).await?;
    let will_notify = form.will_notify.unwrap_or(workspace.should_notify);
    let now = app.now_ms();

    let id = app.store.transact(|state| -> ApiResult<(Vec<Event>, JobRequestId)> {
        let id = state.next_job_request_id();
        let event = Event::JobRequestCreated {
            id,
            identifier: id::identifier(),
            workspace: workspace.id,
            backend: choice.backend.clone(),
            created_by: user.id,
            sha,
            requested_actions: choice.actions.clone(),
            force_run_dependencies: form.force_run_dependencies,
            will_notify,
            created_at_ms: now,
        };
        Ok((vec![event], id))
    })?;

    info!(job_request = %id, backend = %choice.backend, actions = ?choice.actions, "job request created");
    Ok(Redirect::to(links::workspace_logs(&workspace.name)))
}

/// The workspace's job requests, with the list page's search.
#[instrument(skip_all, fields(workspace = %name))]
pub(super) async fn logs<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(name): Path<String>,
    query: Result<Query<JobRequestQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Some(workspace) = find(&app, &name) else {
        return Ok(Redirect::to(links::home()).into_response());
    };
    let Query(query) = query?;
    let filter = JobRequestFilter {
        workspace: Some(workspace.name.clone()),
        status: query.status()?,
        search: query.q().and_then(SearchTerm::parse),
        ..JobRequestFilter::default()
    };
    let after = query.cursor()?;
    let page_size = app.page_size(query.page_size);
    let can_run = can_run_jobs(&app, viewer.user.as_ref(), Some(&workspace)).await?;

    let view = app.store.read(|s| {
        let page = s.search_job_requests(&filter, after, page_size);
        WorkspaceLogView {
            workspace: WorkspaceLink::from(&workspace),
            results: rows_to_wire(&page.items),
            next: next_cursor(&page),
            can_run_jobs: can_run,
        }
    });
    Ok(Json(view).into_response())
}

/// Outputs of the latest successful run of each action, for people who can
/// run jobs here.
#[instrument(skip_all, fields(workspace = %name))]
pub(super) async fn release<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let workspace = find(&app, &name);
    viewer.require_run(&app, workspace.as_ref()).await?;
    let Some(workspace) = workspace else {
        return Ok(Redirect::to(links::home()).into_response());
    };

    let outputs: Vec<ReleaseOutput> = app.store.read(|s| {
        s.releasable_jobs(workspace.id).into_iter().flat_map(ReleaseOutput::from_job).collect()
    });
    let view = WorkspaceReleaseView { workspace: WorkspaceLink::from(&workspace), outputs };
    Ok(Json(view).into_response())
}

#[instrument(skip_all, fields(workspace = %name))]
pub(super) async fn archive_toggle<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(name): Path<String>,
    body: Result<Json<ArchiveForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let workspace = find(&app, &name);
    viewer.require_run(&app, workspace.as_ref()).await?;
    let workspace = workspace.ok_or(ApiError::NotFound)?;
    let Json(form) = body?;

    app.store.emit(vec![Event::WorkspaceArchiveSet { id: workspace.id, archived: form.is_archived }])?;
    info!(archived = form.is_archived, "workspace archive toggled");
    Ok(Redirect::to(links::home()))
}

#[instrument(skip_all, fields(workspace = %name))]
pub(super) async fn notifications_toggle<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    Path(name): Path<String>,
    body: Result<Json<NotificationsForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let workspace = find(&app, &name);
    viewer.require_run(&app, workspace.as_ref()).await?;
    let workspace = workspace.ok_or(ApiError::NotFound)?;
    let Json(form) = body?;

    app.store.emit(vec![Event::WorkspaceNotificationsSet {
        id: workspace.id,
        enabled: form.should_notify,
    }])?;
    info!(enabled = form.should_notify, "workspace notifications toggled");
    Ok(Redirect::to(links::workspace(&workspace.name)))
}

#[cfg(test)]
#[path = "workspaces_tests.rs"]
mod tests;
