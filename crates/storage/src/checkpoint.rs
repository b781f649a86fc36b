// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic snapshot plus WAL compaction.

use crate::snapshot::{Snapshot, SnapshotError};
use crate::wal::{Wal, WalError};
use crate::MaterializedState;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Wal(#[from] WalError),
}

/// Outcome of a completed checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointResult {
    pub seq: u64,
    pub size_bytes: u64,
}

pub struct Checkpointer {
    snapshot_path: PathBuf,
}

impl Checkpointer {
    pub fn new(snapshot_path: PathBuf) -> Self {
        Self { snapshot_path }
    }

    /// Save `state` at the WAL's processed sequence, then drop the
    /// entries the snapshot covers.
    pub fn checkpoint(
        &self,
        state: &MaterializedState,
        wal: &mut Wal,
    ) -> Result<CheckpointResult, CheckpointError> {
        wal.flush()?;
        let seq = wal.processed_seq();
        let size_bytes = Snapshot::new(seq, state.clone()).save(&self.snapshot_path)?;
        wal.truncate_before(seq + 1)?;
        Ok(CheckpointResult { seq, size_bytes })
    }
}

/// Load the latest snapshot, if one has been written.
pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    Snapshot::load(path)
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
