// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary entry point: load configuration, set up logging, build the
//! handler registry and chain, then hand off to the pipeline engine for
//! recovery and steady-state ingest. Sequencing (config/dirs, then recover,
//! then serve) is grounded on the teacher's
//! `crates/daemon/src/lifecycle/startup.rs`, adapted from its
//! event-sourcing startup to this pipeline's recover-then-ingest one —
//! recovery itself runs inside [`pp_engine::Pipeline::run`], not here.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod ingest;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use pp_core::SystemClock;
use pp_engine::{Pipeline, PipelineConfig};
use pp_storage::Wal;

use crate::ingest::{DirWatchSource, PrintSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.yaml".to_string());

    let registry = pp_handlers::default_registry();
    let (cfg, workdir, chain) = config::load(&config_path, &registry)?;

    let _log_guard = logging::init(&cfg.logs);
    tracing::info!(
        workdir = %workdir.root.display(),
        handlers = chain.len(),
        max_workers = cfg.engine.max_workers,
        "starting pipeline"
    );

    let wal = Wal::open(workdir.wal.join("wal.log"), cfg.write_ahead_logging.to_storage_config())?;

    let pipeline_config = PipelineConfig {
        ignore_recovery_errors: cfg.engine.ignore_recovery_errors,
        max_workers: cfg.engine.max_workers,
        contents_dir: workdir.contents.clone(),
    };
    let pipeline = Arc::new(Pipeline::new(chain, wal, pipeline_config, SystemClock));

    let ingest_rx = DirWatchSource::new(
        workdir.jobs.clone(),
        Duration::from_millis(cfg.printer.monitor_interval_ms),
    )
    .into_stream();

    pipeline.run(ingest_rx).await?;
    Ok(())
}
