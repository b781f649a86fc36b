// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared materialized state plus the WAL that feeds it.
//!
//! Lock order is state, then WAL. Neither lock is held across an await.

use std::sync::Arc;

use js_core::Event;
use js_storage::{CheckpointError, CheckpointResult, Checkpointer, MaterializedState, Wal, WalError};
use parking_lot::Mutex;

#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<MaterializedState>>,
    wal: Arc<Mutex<Wal>>,
}

impl Store {
    pub fn new(state: MaterializedState, wal: Wal) -> Self {
        Self { state: Arc::new(Mutex::new(state)), wal: Arc::new(Mutex::new(wal)) }
    }

    pub fn read<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        f(&self.state.lock())
    }

    /// Run one transaction.
    ///
    /// `f` inspects the current state and returns the events to record with
    /// a value for the caller. Events are committed to the WAL before they
    /// are applied. An error from `f` or from the WAL leaves both the state
    /// and the log untouched.
    pub fn transact<T, E>(
        &self,
        f: impl FnOnce(&MaterializedState) -> Result<(Vec<Event>, T), E>,
    ) -> Result<T, E>
    where
        E: From<WalError>,
    {
        let mut state = self.state.lock();
        let (events, value) = f(&state)?;
        if events.is_empty() {
            return Ok(value);
        }

        let mut wal = self.wal.lock();
        let last_seq = wal.commit(&events)?;

        for event in &events {
            tracing::debug!(event = event.name(), seq = last_seq, "applying event");
            state.apply_event(event);
        }
        wal.mark_processed(last_seq);
        Ok(value)
    }

    /// Record events unconditionally.
    pub fn emit(&self, events: Vec<Event>) -> Result<(), WalError> {
        self.transact(|_| Ok::<_, WalError>((events, ())))
    }

    pub fn checkpoint(&self, checkpointer: &Checkpointer) -> Result<CheckpointResult, CheckpointError> {
        let state = self.state.lock();
        let mut wal = self.wal.lock();
        checkpointer.checkpoint(&state, &mut wal)
    }

    pub fn processed_seq(&self) -> u64 {
        self.wal.lock().processed_seq()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
