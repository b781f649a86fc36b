// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::State;
use axum::Json;
use js_core::backend;
use js_wire::{BackendStatusView, StatusView};
use tracing::instrument;

use crate::app::{AppState, Deps};

/// Per-backend heartbeat and queue depth. Open to everyone.
#[instrument(skip_all)]
pub(super) async fn index<D: Deps>(State(app): State<AppState<D>>) -> Json<StatusView> {
    let now = app.now_ms();
    let stale_after = app.config.stale_after();
    let backends = app.store.read(|s| {
        s.backends
            .values()
            .map(|b| {
                let health =
                    backend::health(s.stats.get(&b.id), s.queue_counts(&b.name), now, stale_after);
                BackendStatusView::new(b, health)
            })
            .collect()
    });
    Json(StatusView { backends })
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
