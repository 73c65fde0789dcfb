// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ingest stand-in (A5): the sole collaborator the pipeline engine needs
//! upstream of it — something that turns "a document showed up" into a
//! stream of [`PrintInfo`]. Real virtual-printer bring-up is out of scope;
//! [`DirWatchSource`] polls a directory instead, which is enough to drive
//! the engine end-to-end in tests and local runs. Grounded on the original
//! `printer/linux_printer.go`'s ticker-plus-directory-walk loop, generalized
//! to use `notify` (already a teacher dependency) instead of a bare ticker.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use pp_core::PrintInfo;
use tokio::sync::mpsc;

/// Turns some upstream source of documents into a stream of [`PrintInfo`].
/// The engine is the sole consumer of the returned channel.
pub trait PrintSource {
    fn into_stream(self) -> mpsc::Receiver<PrintInfo>;
}

/// Polls `dir` every `poll_interval`, treating each not-yet-seen regular
/// file as a freshly "printed" one-page document. Page counting of real
/// document formats is out of scope — every file counts as one page.
pub struct DirWatchSource {
    dir: PathBuf,
    poll_interval: Duration,
}

impl DirWatchSource {
    pub fn new(dir: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self { dir: dir.into(), poll_interval }
    }
}

impl PrintSource for DirWatchSource {
    fn into_stream(self) -> mpsc::Receiver<PrintInfo> {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            let mut seen = HashSet::new();
            // Prime `seen` with whatever's already in the directory at
            // startup; only files that appear afterward count as new jobs.
            if let Ok(entries) = std::fs::read_dir(&self.dir) {
                for entry in entries.flatten() {
                    if entry.path().is_file() {
                        seen.insert(entry.path());
                    }
                }
            }

            // `notify` wakes us on filesystem events, but we still poll on
            // `poll_interval` as a fallback (matching the original ticker)
            // in case events are coalesced or missed on the watched platform.
            let (watch_tx, mut watch_rx) = mpsc::unbounded_channel();
            let mut watcher = match notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                if res.is_ok() {
                    let _ = watch_tx.send(());
                }
            }) {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to start filesystem watcher; falling back to polling only");
                    None
                }
            };
            if let Some(watcher) = watcher.as_mut() {
                if let Err(e) = watcher.watch(&self.dir, RecursiveMode::NonRecursive) {
                    tracing::warn!(error = %e, "failed to watch ingest directory");
                }
            }

            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = watch_rx.recv() => {}
                }

                let entries = match std::fs::read_dir(&self.dir) {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!(error = %e, dir = %self.dir.display(), "failed to read ingest directory");
                        continue;
                    }
                };

                for entry in entries.flatten() {
                    let path = entry.path();
                    if !path.is_file() || seen.contains(&path) {
                        continue;
                    }
                    seen.insert(path.clone());
                    let info = PrintInfo::new(path, 1);
                    if tx.send(info).await.is_err() {
                        return; // receiver dropped; engine is shutting down
                    }
                }
            }
        });
        rx
    }
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
