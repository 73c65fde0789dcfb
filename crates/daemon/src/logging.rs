// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level logging (A2): a `tracing-subscriber` `fmt` layer filtered
//! by `RUST_LOG`/`logs.level`, backed by `tracing-appender`'s rolling file
//! writer for `logs.filename`. Grounded on the teacher's use of `tracing`
//! throughout `crates/engine/src/executor.rs`; the binary-level subscriber
//! setup itself is authored from the `tracing-subscriber`/`tracing-appender`
//! idiom those crates prescribe, since no retrieved teacher file wires up a
//! process-wide subscriber directly.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogsConfig;

/// Initializes the global subscriber. The returned [`WorkerGuard`] must be
/// held for the process's lifetime — dropping it stops the background
/// writer thread and silently truncates buffered log lines.
pub fn init(config: &LogsConfig) -> WorkerGuard {
    let directory = Path::new(&config.filename).parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = Path::new(&config.filename).file_name().map(|n| n.to_string_lossy().into_owned());

    let appender = tracing_appender::rolling::daily(
        directory.unwrap_or_else(|| Path::new(".")),
        file_name.as_deref().unwrap_or("pp-daemon.log"),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    guard
}
