// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ingest tuple published by the printer subsystem.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One document produced by the virtual printer, ready for the pipeline.
///
/// Immutable once constructed; the engine never mutates the source file at
/// `filepath`, it only copies from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintInfo {
    pub filepath: PathBuf,
    pub pages: u32,
}

impl PrintInfo {
    pub fn new(filepath: impl Into<PathBuf>, pages: u32) -> Self {
        Self { filepath: filepath.into(), pages }
    }
}
