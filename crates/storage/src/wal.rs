// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The write-ahead log: one JSON object per line, flushed to disk on every
//! append, with size/age-bounded rotation of the active file.
//!
//! Durability is per-record, not batched (see SPEC_FULL.md §9 "Resolved —
//! WAL flush policy"): [`Wal::write_entry`] calls `flush()` and
//! `sync_data()` before returning, so a crash immediately after a successful
//! `write_entry` call always leaves that record recoverable.

use pp_core::{FlowObject, SessionId};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Sentinel `handler_id`/`handler_name` marking the start of a session.
pub const INIT: &str = "__init__";
/// Sentinel `handler_id`/`handler_name` marking a session's successful completion.
pub const END: &str = "__end__";

#[derive(Debug, Error)]
pub enum WalError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to serialize WAL entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One checkpoint record. Serialized as a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub session_id: SessionId,
    pub handler_name: String,
    pub handler_id: String,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub flow_object: FlowObject,
}

impl LogEntry {
    pub fn init(
        session_id: SessionId,
        input_file: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        flow_object: FlowObject,
    ) -> Self {
        Self {
            session_id,
            handler_name: INIT.to_string(),
            handler_id: INIT.to_string(),
            input_file: input_file.into(),
            output_file: output_file.into(),
            flow_object,
        }
    }

    pub fn end(
        session_id: SessionId,
        input_file: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        flow_object: FlowObject,
    ) -> Self {
        Self {
            session_id,
            handler_name: END.to_string(),
            handler_id: END.to_string(),
            input_file: input_file.into(),
            output_file: output_file.into(),
            flow_object,
        }
    }

    pub fn handler(
        session_id: SessionId,
        handler_name: impl Into<String>,
        handler_id: impl Into<String>,
        input_file: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        flow_object: FlowObject,
    ) -> Self {
        Self {
            session_id,
            handler_name: handler_name.into(),
            handler_id: handler_id.into(),
            input_file: input_file.into(),
            output_file: output_file.into(),
            flow_object,
        }
    }

    pub fn is_init(&self) -> bool {
        self.handler_id == INIT
    }

    pub fn is_end(&self) -> bool {
        self.handler_id == END
    }
}

/// Rotation and enablement policy for the WAL, mirroring the
/// `write_ahead_logging` block of the YAML config (SPEC_FULL.md §3.1, §6).
#[derive(Debug, Clone)]
pub struct WalConfig {
    pub enabled: bool,
    pub max_size_mb: u64,
    pub max_backups: u32,
    pub max_age_days: u32,
    /// Gzip-compress rotated backups. Not in the distilled YAML schema but
    /// offered as a knob, matching the original `lumberjack`-style
    /// `Compress` setting referenced in DESIGN.md.
    pub compress_backups: bool,
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size_mb: 100,
            max_backups: 5,
            max_age_days: 30,
            compress_backups: false,
        }
    }
}

/// Append-only, line-delimited WAL with size/age-bounded rotation.
///
/// Shared across workers behind a `parking_lot::Mutex<Wal>` in `pp-engine` —
/// `write_entry` is not internally synchronized, since the process-wide
/// mutex around it is the caller's responsibility (SPEC_FULL.md §5).
pub struct Wal {
    path: PathBuf,
    config: WalConfig,
    file: Option<File>,
    size_bytes: u64,
    opened_at: SystemTime,
}

impl Wal {
    /// Open (creating if absent) the WAL at `path` under `config`. When
    /// `config.enabled` is false, no file is opened and every operation
    /// becomes a no-op / returns empty.
    pub fn open(path: impl Into<PathBuf>, config: WalConfig) -> Result<Self, WalError> {
        let path = path.into();
        if !config.enabled {
            return Ok(Self { path, config, file: None, size_bytes: 0, opened_at: SystemTime::now() });
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size_bytes = file.metadata()?.len();
        let opened_at = file
            .metadata()?
            .created()
            .unwrap_or_else(|_| SystemTime::now());
        Ok(Self { path, config, file: Some(file), size_bytes, opened_at })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize and append `entry`, flushing to disk before returning. A
    /// no-op when the WAL is disabled.
    pub fn write_entry(&mut self, entry: &LogEntry) -> Result<(), WalError> {
        if self.file.is_none() {
            return Ok(());
        }

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        self.maybe_rotate(line.len() as u64)?;

        let Some(file) = self.file.as_mut() else { return Ok(()) };
        file.write_all(&line)?;
        file.flush()?;
        file.sync_data()?;
        self.size_bytes += line.len() as u64;
        Ok(())
    }

    /// Stream every entry in the active file, top to bottom. A line that
    /// fails to deserialize stops the read at that line rather than failing
    /// the whole read (see SPEC_FULL.md §4.4.1). Missing file or disabled
    /// WAL both return an empty vec.
    pub fn read_entries(&self) -> Result<Vec<LogEntry>, WalError> {
        if !self.config.enabled {
            return Ok(Vec::new());
        }
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(_) => break,
            }
        }
        Ok(entries)
    }

    fn maybe_rotate(&mut self, incoming_len: u64) -> Result<(), WalError> {
        let max_bytes = self.config.max_size_mb.saturating_mul(1024 * 1024);
        let over_size = max_bytes > 0 && self.size_bytes + incoming_len > max_bytes;
        let max_age = std::time::Duration::from_secs(self.config.max_age_days as u64 * 86_400);
        let over_age = self.config.max_age_days > 0
            && self.opened_at.elapsed().map(|a| a > max_age).unwrap_or(false);

        if !over_size && !over_age {
            return Ok(());
        }
        // Nothing written yet; rotating an empty file is pointless.
        if self.size_bytes == 0 {
            return Ok(());
        }

        self.rotate()
    }

    fn rotate(&mut self) -> Result<(), WalError> {
        // Drop the open handle before renaming on platforms where that matters.
        self.file = None;

        let ts = self
            .opened_at
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let rotated = self.path.with_file_name(format!(
            "{}.{}",
            self.path.file_name().and_then(|n| n.to_str()).unwrap_or("wal.log"),
            ts
        ));

        fs::rename(&self.path, &rotated)?;

        let final_rotated = if self.config.compress_backups {
            let gz_path = rotated.with_extension(format!(
                "{}.gz",
                rotated.extension().and_then(|e| e.to_str()).unwrap_or("")
            ));
            compress_file(&rotated, &gz_path)?;
            fs::remove_file(&rotated)?;
            gz_path
        } else {
            rotated
        };

        self.evict_old_backups(&final_rotated)?;

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.size_bytes = 0;
        self.opened_at = SystemTime::now();
        self.file = Some(file);
        Ok(())
    }

    /// Keep at most `max_backups` rotated files, evicting the oldest by
    /// filesystem modified-time. `read_entries` never consults these — they
    /// exist purely for operator inspection (SPEC_FULL.md §4.4.1).
    fn evict_old_backups(&self, _just_written: &Path) -> Result<(), WalError> {
        if self.config.max_backups == 0 {
            return Ok(());
        }
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let stem = self.path.file_name().and_then(|n| n.to_str()).unwrap_or("wal.log");

        let mut backups: Vec<(PathBuf, SystemTime)> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let path = e.path();
                let name = path.file_name()?.to_str()?.to_string();
                if name.starts_with(&format!("{stem}.")) && name != stem {
                    let mtime = e.metadata().ok()?.modified().ok()?;
                    Some((path, mtime))
                } else {
                    None
                }
            })
            .collect();

        if backups.len() as u32 <= self.config.max_backups {
            return Ok(());
        }
        backups.sort_by_key(|(_, mtime)| *mtime);
        let evict_count = backups.len() - self.config.max_backups as usize;
        for (path, _) in backups.into_iter().take(evict_count) {
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

fn compress_file(src: &Path, dst: &Path) -> Result<(), WalError> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut input = File::open(src)?;
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;

    let out = File::create(dst)?;
    let mut encoder = GzEncoder::new(out, Compression::default());
    encoder.write_all(&buf)?;
    encoder.finish()?;
    Ok(())
}

#[cfg(test)]
impl Wal {
    /// Force an unconditional rotation, bypassing the size/age thresholds —
    /// used by tests that exercise backup eviction without waiting on real
    /// timestamps or writing megabytes of entries.
    pub(crate) fn rotate_for_test(&mut self) -> Result<(), WalError> {
        self.rotate()
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
