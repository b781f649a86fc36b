// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server lifecycle: startup, periodic checkpoints, shutdown.

mod startup;
pub use startup::{seed_backends, startup, DEFAULT_BACKENDS};

use std::fs::File;
use std::time::Duration;

use js_storage::Checkpointer;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::store::Store;

/// A running server's durable state.
pub struct Server {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub store: Store,
}

impl Server {
    pub fn checkpointer(&self) -> Checkpointer {
        Checkpointer::new(self.config.snapshot_path())
    }

    /// Save a final snapshot so the next startup replays nothing.
    pub fn shutdown(&self) {
        info!("shutting down");
        if self.store.processed_seq() == 0 {
            return;
        }
        match self.store.checkpoint(&self.checkpointer()) {
            Ok(result) => info!(
                seq = result.seq,
                size_bytes = result.size_bytes,
                "saved final shutdown snapshot"
            ),
            Err(e) => warn!(error = %e, "failed to save shutdown snapshot"),
        }
        if let Err(e) = std::fs::remove_file(self.config.lock_path()) {
            warn!(error = %e, "failed to remove lock file");
        }
    }
}

/// Checkpoint every `every` until `cancel` fires.
pub fn spawn_checkpoints(
    store: Store,
    checkpointer: Checkpointer,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let checkpointer = std::sync::Arc::new(checkpointer);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            let store = store.clone();
            let checkpointer = checkpointer.clone();
            let result = tokio::task::spawn_blocking(move || store.checkpoint(&checkpointer)).await;
            match result {
                Ok(Ok(done)) => {
                    tracing::debug!(seq = done.seq, size_bytes = done.size_bytes, "checkpoint")
                }
                Ok(Err(e)) => warn!(error = %e, "checkpoint failed"),
                Err(e) => warn!(error = %e, "checkpoint task panicked"),
            }
        }
    })
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock: server already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("WAL error: {0}")]
    Wal(#[from] js_storage::WalError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] js_storage::SnapshotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
