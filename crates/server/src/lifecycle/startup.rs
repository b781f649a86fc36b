// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server startup: lock, recover state, seed backends.

use std::io::Write;

use fs2::FileExt;
use js_core::{id, Clock, Event};
use js_storage::{load_snapshot, MaterializedState, Wal};
use tracing::info;

use super::{LifecycleError, Server};
use crate::config::Config;
use crate::store::Store;

/// Display names for the well-known backends. Others display as their slug.
pub const DEFAULT_BACKENDS: &[(&str, &str)] =
    &[("tpp", "TPP"), ("emis", "EMIS"), ("expectations", "Expectations")];

pub fn startup(config: &Config, clock: &impl Clock) -> Result<Server, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Open without truncating so a running server's PID survives a failed attempt
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(config.lock_path())?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    let (mut state, processed_seq) = match load_snapshot(&config.snapshot_path())? {
        Some(snapshot) => {
            info!(
                seq = snapshot.seq,
                job_requests = snapshot.state.job_requests.len(),
                jobs = snapshot.state.jobs.len(),
                "loaded snapshot"
            );
            (snapshot.state, snapshot.seq)
        }
        None => {
            info!("no snapshot found, starting with empty state");
            (MaterializedState::default(), 0)
        }
    };

    let wal = Wal::open(&config.wal_path(), processed_seq)?;
    let replay = wal.entries_after(processed_seq)?;
    let replay_count = replay.len();
    let mut wal = wal;
    for entry in replay {
        state.apply_event(&entry.event);
        wal.mark_processed(entry.seq);
    }
    if replay_count > 0 {
        info!(count = replay_count, after = processed_seq, "replayed events from WAL");
    }

    info!(
        users = state.users.len(),
        workspaces = state.workspaces.len(),
        job_requests = state.job_requests.len(),
        jobs = state.jobs.len(),
        "recovered state"
    );

    let store = Store::new(state, wal);
    seed_backends(&store, &config.backends, clock)?;

    Ok(Server { config: config.clone(), lock_file, store })
}

/// Create any configured backend that does not exist yet, with a fresh token.
pub fn seed_backends(
    store: &Store,
    names: &[String],
    clock: &impl Clock,
) -> Result<(), js_storage::WalError> {
    let created = store.transact(|state| {
        let mut next = state.next_backend_id();
        let mut events = Vec::new();
        for name in names {
            if state.backend_by_name(name).is_some() {
                continue;
            }
            events.push(Event::BackendCreated {
                id: next,
                name: name.clone(),
                display_name: display_name(name),
                auth_token: id::auth_token(),
                created_at_ms: clock.epoch_ms(),
            });
            next = next.next();
        }
        let count = events.len();
        Ok::<_, js_storage::WalError>((events, count))
    })?;
    if created > 0 {
        info!(count = created, "seeded backends");
    }
    Ok(())
}

fn display_name(name: &str) -> String {
    DEFAULT_BACKENDS
        .iter()
        .find(|(slug, _)| *slug == name)
        .map(|(_, display)| display.to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
