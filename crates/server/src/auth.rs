// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Who is calling: a proxy-authenticated user on UI paths, a backend token
//! on the API.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use js_adapters::MembershipAdapter;
use js_core::user::run_access;
use js_core::{Backend, Event, RunAccess, User, Workspace};
use js_wire::links;

use crate::app::{AppState, Deps};
use crate::error::{ApiError, ApiResult};

/// The user named by the trusted proxy header, if any. Users are created on
/// first sight; names listed as admins become superusers.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user: Option<User>,
    /// Request path, used as the post-login destination.
    pub path: String,
}

impl Viewer {
    pub fn is_staff(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_superuser)
    }

    pub fn login_redirect<D: Deps>(&self, app: &AppState<D>) -> ApiError {
        ApiError::LoginRequired(links::login(&app.config.login_url, &self.path))
    }

    pub fn require_user<D: Deps>(&self, app: &AppState<D>) -> ApiResult<&User> {
        self.user.as_ref().ok_or_else(|| self.login_redirect(app))
    }

    pub fn require_staff<D: Deps>(&self, app: &AppState<D>) -> ApiResult<&User> {
        match &self.user {
            Some(user) if user.is_superuser => Ok(user),
            _ => Err(self.login_redirect(app)),
        }
    }

    /// The viewer, when allowed to run jobs in `workspace` (or anywhere).
    pub async fn require_run<D: Deps>(
        &self,
        app: &AppState<D>,
        workspace: Option<&Workspace>,
    ) -> ApiResult<&User> {
        let user = self.require_user(app)?;
        if can_run_jobs(app, Some(user), workspace).await? {
            Ok(user)
        } else {
            Err(self.login_redirect(app))
        }
    }
}

impl<D: Deps> FromRequestParts<AppState<D>> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState<D>) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();
        let username = parts
            .headers
            .get(app.config.user_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let user = match username {
            Some(name) => Some(provision(app, name)?),
            None => None,
        };
        Ok(Viewer { user, path })
    }
}

fn provision<D: Deps>(app: &AppState<D>, username: &str) -> ApiResult<User> {
    if let Some(user) = app.store.read(|s| s.user_by_username(username).cloned()) {
        return Ok(user);
    }
    let now = app.now_ms();
    let is_superuser = app.config.is_admin(username);
    let id = app.store.transact(|state| {
        if let Some(user) = state.user_by_username(username) {
            return Ok::<_, ApiError>((vec![], user.id));
        }
        let id = state.next_user_id();
        let event = Event::UserCreated {
            id,
            username: username.to_string(),
            email: String::new(),
            is_superuser,
            created_at_ms: now,
        };
        Ok((vec![event], id))
    })?;
    tracing::debug!(username, user_id = %id, "resolved user");
    app.store.read(|s| s.users.get(&id).cloned()).ok_or(ApiError::NotFound)
}

/// Superusers and project developers may run jobs without asking the
/// org-membership authority; everyone else must be an org member.
pub async fn can_run_jobs<D: Deps>(
    app: &AppState<D>,
    user: Option<&User>,
    workspace: Option<&Workspace>,
) -> ApiResult<bool> {
    let Some(user) = user else {
        return Ok(false);
    };
    if user.is_superuser {
        return Ok(true);
    }
    if let Some(workspace) = workspace {
        let access = app.store.read(|s| run_access(user, workspace, &s.memberships_for_user(user.id)));
        if access == RunAccess::Granted {
            return Ok(true);
        }
    }
    Ok(app.membership.is_member(&user.username).await?)
}

/// A backend authenticated by `Authorization: Bearer <token>` (or `Token`).
#[derive(Debug, Clone)]
pub struct BackendAuth(pub Backend);

impl<D: Deps> FromRequestParts<AppState<D>> for BackendAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState<D>) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthenticated)?;
        app.store
            .read(|s| s.backend_by_token(token).cloned())
            .map(BackendAuth)
            .ok_or(ApiError::Unauthenticated)
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !(scheme.eq_ignore_ascii_case("bearer") || scheme.eq_ignore_ascii_case("token")) {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
