// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration (A1): parses the YAML schema of SPEC_FULL.md §6 into the
//! structs of §3.1, evaluates the `workdir` expression, creates its
//! subdirectories, and validates the handler chain against a registry
//! before returning — a bad config fails fast at startup rather than
//! partway through the first job. Grounded on the original `config/base.go`
//! schema and `main.go`'s `getConfig`/`createDirs` sequence.

use std::path::{Path, PathBuf};

use pp_core::{ConfigError, HandlerSpec};
use pp_engine::{ChainEntry, Registry};
use serde::Deserialize;
use serde_json::Map;

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    pub level: String,
    pub filename: String,
    pub max_size_mb: u64,
    pub max_backups: u32,
    pub max_age_days: u32,
}

/// Mirrors the `write_ahead_logging` YAML block. `level` is accepted for
/// schema fidelity but unused: the WAL's own record format carries no
/// severity, only the engine's `tracing` calls do.
#[derive(Debug, Clone, Deserialize)]
pub struct WalSection {
    pub enabled: bool,
    #[serde(default = "default_level")]
    pub level: String,
    pub max_size_mb: u64,
    pub max_backups: u32,
    pub max_age_days: u32,
    #[serde(default)]
    pub compress_backups: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl WalSection {
    pub fn to_storage_config(&self) -> pp_storage::WalConfig {
        pp_storage::WalConfig {
            enabled: self.enabled,
            max_size_mb: self.max_size_mb,
            max_backups: self.max_backups,
            max_age_days: self.max_age_days,
            compress_backups: self.compress_backups,
        }
    }
}

/// `name` selects an OS-specific virtual printer driver in the original;
/// out of scope here, carried only for schema fidelity. `monitor_interval_ms`
/// is the one field the ingest stand-in (A5) actually reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterConfig {
    pub name: String,
    pub monitor_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub ignore_recovery_errors: bool,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    pub handlers: Vec<HandlerSpec>,
}

fn default_max_workers() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logs: LogsConfig,
    pub write_ahead_logging: WalSection,
    pub printer: PrinterConfig,
    pub engine: EngineConfig,
    pub workdir: String,
}

/// The directories created under the resolved `workdir` at startup.
#[derive(Debug, Clone)]
pub struct Workdir {
    pub root: PathBuf,
    pub contents: PathBuf,
    pub jobs: PathBuf,
    pub wal: PathBuf,
}

/// Parse `path`, resolve `workdir`, create its subdirectories, and build the
/// handler chain against `registry` — the single entry point a bad config
/// fails through, all at startup.
pub fn load(path: impl AsRef<Path>, registry: &Registry) -> Result<(Config, Workdir, Vec<ChainEntry>), ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let mut config: Config = serde_yaml::from_str(&text).map_err(|e| ConfigError::Yaml(e.to_string()))?;

    if config.engine.max_workers == 0 {
        config.engine.max_workers = 1;
    }

    config.workdir = pp_expr::evaluate(&config.workdir, &Map::new())
        .map_err(|e| ConfigError::Yaml(format!("workdir expression: {e}")))?;

    let root = PathBuf::from(&config.workdir);
    let contents = root.join("contents");
    let jobs = root.join("jobs");
    let wal = root.join("wal");
    for dir in [&root, &contents, &jobs, &wal] {
        std::fs::create_dir_all(dir)?;
    }

    let chain = registry.build_chain(&config.engine.handlers)?;

    Ok((config, Workdir { root, contents, jobs, wal }, chain))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
