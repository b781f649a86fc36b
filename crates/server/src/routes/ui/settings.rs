// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use js_core::Event;
use js_wire::{links, SettingsForm, SettingsView};
use tracing::{info, instrument};

use crate::app::{AppState, Deps};
use crate::auth::Viewer;
use crate::error::{ApiResult, Redirect};

const SAVED: &str = "Settings saved successfully";

#[instrument(skip_all)]
pub(super) async fn show<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
) -> ApiResult<Json<SettingsView>> {
    let user = viewer.require_user(&app)?;
    Ok(Json(SettingsView::from(user)))
}

#[instrument(skip_all)]
pub(super) async fn update<D: Deps>(
    State(app): State<AppState<D>>,
    viewer: Viewer,
    body: Result<Json<SettingsForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let user = viewer.require_user(&app)?;
    let Json(form) = body?;
    let notifications_email = form.validate()?;

    app.store.emit(vec![Event::UserSettingsUpdated { id: user.id, notifications_email }])?;
    info!(username = %user.username, "settings updated");
    Ok(Redirect::to(links::home()).with_message(SAVED))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
