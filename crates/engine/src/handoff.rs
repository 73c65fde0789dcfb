// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job file handoff (C2): tracks the current input path and allocates a
//! fresh output path for the next stage, guaranteeing input→output
//! chaining. Grounded on the original `engine/default_engine_file_handler.go`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// The input/output path pair (and any open streams) passed to a handler.
///
/// A handler chooses to either mutate content (open the writer and write to
/// `output_path`) or pass through untouched (read but never write). Which
/// one happened during a stage determines what [`FileHandoff::advance`]
/// does with the old input file.
pub struct FileHandoff {
    input_path: PathBuf,
    output_path: PathBuf,
    reader: Option<BufReader<File>>,
    writer: Option<BufWriter<File>>,
}

impl FileHandoff {
    /// Anchor a new handoff at `input_path`, allocating a fresh UUID-named
    /// output path in the same directory.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        let dir = input_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        let output_path = dir.join(Uuid::new_v4().to_string());
        Self { input_path, output_path, reader: None, writer: None }
    }

    /// Anchor at `input_path` with a caller-chosen `output_path` — used by
    /// recovery, which must resume at the exact paths recorded in the WAL.
    pub fn with_output(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self { input_path: input_path.into(), output_path: output_path.into(), reader: None, writer: None }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Open `input_path` for reading on first call; subsequent calls return
    /// the same stream.
    pub fn read(&mut self) -> std::io::Result<&mut BufReader<File>> {
        if self.reader.is_none() {
            let file = File::open(&self.input_path)?;
            self.reader = Some(BufReader::new(file));
        }
        match self.reader.as_mut() {
            Some(r) => Ok(r),
            None => unreachable!("reader populated above"),
        }
    }

    /// Open `output_path` for writing on first call; subsequent calls
    /// return the same stream.
    pub fn write(&mut self) -> std::io::Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            let file = File::create(&self.output_path)?;
            self.writer = Some(BufWriter::new(file));
        }
        match self.writer.as_mut() {
            Some(w) => Ok(w),
            None => unreachable!("writer populated above"),
        }
    }

    /// True once a handler has opened the writer during this stage.
    pub fn wrote(&self) -> bool {
        self.writer.is_some()
    }

    /// Release any held streams. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            use std::io::Write;
            let _ = writer.flush();
        }
        self.reader = None;
    }

    /// Produce the next handoff: if a writer was opened, the new input is
    /// this output and the old input is deleted; otherwise the new input is
    /// unchanged (the stage did not materialize a new file). Closes the
    /// current handoff first.
    ///
    /// Deleting the old input is best-effort: a failed stage's scratch
    /// files are cleanup, not pipeline state, so a delete error here must
    /// not abort an otherwise-successful stage (matching the original
    /// `defer os.Remove(d.input)`, which likewise never fails the caller;
    /// see SPEC_FULL.md §9 "File cleanup invariants").
    pub fn advance(mut self) -> std::io::Result<FileHandoff> {
        let wrote = self.wrote();
        self.close();

        if wrote {
            let next_input = self.output_path.clone();
            if let Err(e) = fs::remove_file(&self.input_path) {
                tracing::warn!(
                    path = %self.input_path.display(),
                    error = %e,
                    "failed to remove superseded scratch file"
                );
            }
            Ok(FileHandoff::new(next_input))
        } else {
            Ok(FileHandoff::new(self.input_path.clone()))
        }
    }
}

#[cfg(test)]
#[path = "handoff_tests.rs"]
mod tests;
