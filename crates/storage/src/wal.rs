// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of events.
//!
//! Each line is a JSON object `{"seq": n, "event": {...}}`. Sequence numbers
//! start at 1 and increase by one per append. A line that fails to parse
//! marks the end of the usable log.

use crate::snapshot::rotate_bak_path;
use js_core::Event;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub event: Event,
}

pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
    processed_seq: u64,
}

impl Wal {
    /// Open (or create) the log at `path`.
    ///
    /// A corrupt tail is moved aside to a `.bak` file and the log is
    /// rewritten with the entries that precede it.
    pub fn open(path: &Path, processed_seq: u64) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let (entries, corrupt) = if path.exists() { read_entries(path)? } else { (Vec::new(), false) };

        if corrupt {
            let bak = rotate_bak_path(path);
            tracing::warn!(
                path = %path.display(),
                bak = %bak.display(),
                valid = entries.len(),
                "corrupt WAL, rotating and keeping valid entries"
            );
            fs::rename(path, &bak)?;
            let mut clean = BufWriter::new(File::create(path)?);
            for entry in &entries {
                serde_json::to_writer(&mut clean, entry)?;
                clean.write_all(b"\n")?;
            }
            clean.flush()?;
            clean.get_ref().sync_all()?;
        }

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0).max(processed_seq);
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self { path: path.to_path_buf(), writer: BufWriter::new(file), write_seq, processed_seq })
    }

    /// Buffer an event and return its sequence number.
    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        let seq = self.write_seq + 1;
        let entry = WalEntry { seq, event: event.clone() };
        serde_json::to_writer(&mut self.writer, &entry)?;
        self.writer.write_all(b"\n")?;
        self.write_seq = seq;
        Ok(seq)
    }

    /// Append `events` as one unit, fsync, and return the last sequence
    /// number.
    ///
    /// On error the file is cut back to its length before the call and the
    /// sequence is restored, so nothing from the batch survives.
    pub fn commit(&mut self, events: &[Event]) -> Result<u64, WalError> {
        self.flush()?;
        let start_len = self.writer.get_ref().metadata()?.len();
        let start_seq = self.write_seq;
        match self.write_batch(events) {
            Ok(seq) => Ok(seq),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "WAL commit failed, rolling back");
                self.rollback(start_len, start_seq)?;
                Err(e)
            }
        }
    }

    fn write_batch(&mut self, events: &[Event]) -> Result<u64, WalError> {
        let mut buf = Vec::new();
        let mut seq = self.write_seq;
        for event in events {
            seq += 1;
            serde_json::to_writer(&mut buf, &WalEntry { seq, event: event.clone() })?;
            buf.push(b'\n');
        }
        self.writer.write_all(&buf)?;
        self.flush()?;
        self.write_seq = seq;
        Ok(seq)
    }

    /// Drop anything written or buffered past `len` and rewind to `seq`.
    fn rollback(&mut self, len: u64, seq: u64) -> Result<(), WalError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        // into_parts discards the buffer instead of flushing it on drop
        let (_, _unwritten) = std::mem::replace(&mut self.writer, BufWriter::new(file)).into_parts();
        let file = OpenOptions::new().write(true).open(&self.path)?;
        file.set_len(len)?;
        file.sync_data()?;
        self.write_seq = seq;
        Ok(())
    }

    /// Write buffered entries and fsync.
    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = self.processed_seq.max(seq);
    }

    /// Entries with `seq > after`, stopping at the first corrupt line.
    pub fn entries_after(&self, after: u64) -> Result<Vec<WalEntry>, WalError> {
        let (entries, _) = read_entries(&self.path)?;
        Ok(entries.into_iter().filter(|e| e.seq > after).collect())
    }

    /// Drop entries with `seq < keep_from`. Used after a snapshot.
    pub fn truncate_before(&mut self, keep_from: u64) -> Result<(), WalError> {
        self.flush()?;
        let (entries, _) = read_entries(&self.path)?;

        let tmp = self.path.with_extension("tmp");
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            for entry in entries.iter().filter(|e| e.seq >= keep_from) {
                serde_json::to_writer(&mut out, entry)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
            out.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        Ok(())
    }
}

/// Parse valid entries in order. The flag is set when a bad line was hit.
fn read_entries(path: &Path) -> Result<(Vec<WalEntry>, bool), WalError> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.split(b'\n') {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<WalEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "stopping at corrupt WAL entry");
                return Ok((entries, true));
            }
        }
    }
    Ok((entries, false))
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
