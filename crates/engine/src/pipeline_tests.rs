// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pp_core::{FakeClock, FlowObject, HandlerRetry, PrintInfo};
use pp_storage::{Wal, WalConfig};
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::*;
use crate::handoff::FileHandoff;
use crate::registry::{ChainEntry, Handler};

/// Copies the input to the output unchanged and records every invocation,
/// so tests can assert attempt counts under retry.
struct CountingHandler {
    id: String,
    calls: Arc<AtomicUsize>,
    fail_first_n: usize,
}

impl Handler for CountingHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Counting"
    }

    fn handle(&self, flow: FlowObject, handoff: &mut FileHandoff) -> Result<FlowObject, crate::error::HandlerError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first_n {
            return Err(crate::error::HandlerError::Other("transient".to_string()));
        }
        let mut data = Vec::new();
        std::io::Read::read_to_end(handoff.read()?, &mut data)?;
        std::io::Write::write_all(handoff.write()?, &data)?;
        Ok(flow)
    }
}

/// Always fails, to drive the exhausted-retries path.
struct AlwaysFailHandler {
    id: String,
}

impl Handler for AlwaysFailHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "AlwaysFail"
    }

    fn handle(&self, _flow: FlowObject, _handoff: &mut FileHandoff) -> Result<FlowObject, crate::error::HandlerError> {
        Err(crate::error::HandlerError::Other("permanent".to_string()))
    }
}

fn chain_entry(handler: Box<dyn Handler>, retry: HandlerRetry) -> ChainEntry {
    ChainEntry { handler, retry }
}

fn open_wal(dir: &TempDir) -> Wal {
    Wal::open(dir.path().join("wal.log"), WalConfig::default()).unwrap()
}

fn pipeline_config(dir: &TempDir) -> PipelineConfig {
    let contents_dir = dir.path().join("contents");
    std::fs::create_dir_all(&contents_dir).unwrap();
    PipelineConfig { ignore_recovery_errors: false, max_workers: 2, contents_dir }
}

#[tokio::test]
async fn successful_chain_writes_end_record_and_cleans_up_scratch_files() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.txt");
    std::fs::write(&source, b"hello").unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let chain = vec![chain_entry(
        Box::new(CountingHandler { id: "counting".to_string(), calls: calls.clone(), fail_first_n: 0 }),
        HandlerRetry::default(),
    )];

    let pipeline =
        Arc::new(Pipeline::new(chain, open_wal(&dir), pipeline_config(&dir), FakeClock::new()));

    let (tx, rx) = mpsc::channel(4);
    tx.send(PrintInfo::new(&source, 1)).await.unwrap();
    drop(tx);

    pipeline.clone().run(rx).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let wal = Wal::open(dir.path().join("wal.log"), WalConfig::default()).unwrap();
    let entries = wal.read_entries().unwrap();
    assert!(entries.iter().any(|e| e.is_end()));

    // No leftover scratch files under contents/: init copy and every
    // intermediate handoff file should have been removed.
    let remaining: Vec<PathBuf> = std::fs::read_dir(dir.path().join("contents"))
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    assert!(remaining.is_empty(), "leftover scratch files: {remaining:?}");
}

#[tokio::test]
async fn handler_retries_until_success_within_max_retries() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.txt");
    std::fs::write(&source, b"hello").unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let retry = HandlerRetry { max_retries: 3, backoff_seconds: 5 };
    let chain = vec![chain_entry(
        Box::new(CountingHandler { id: "counting".to_string(), calls: calls.clone(), fail_first_n: 2 }),
        retry,
    )];

    let clock = FakeClock::new();
    let pipeline = Arc::new(Pipeline::new(chain, open_wal(&dir), pipeline_config(&dir), clock));

    let (tx, rx) = mpsc::channel(4);
    tx.send(PrintInfo::new(&source, 1)).await.unwrap();
    drop(tx);

    pipeline.clone().run(rx).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausting_retries_abandons_the_session_without_panicking() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.txt");
    std::fs::write(&source, b"hello").unwrap();

    let retry = HandlerRetry { max_retries: 2, backoff_seconds: 0 };
    let chain = vec![chain_entry(Box::new(AlwaysFailHandler { id: "fail".to_string() }), retry)];

    let pipeline =
        Arc::new(Pipeline::new(chain, open_wal(&dir), pipeline_config(&dir), FakeClock::new()));

    let (tx, rx) = mpsc::channel(4);
    tx.send(PrintInfo::new(&source, 1)).await.unwrap();
    drop(tx);

    // `handle_job`'s failure is logged and swallowed so one bad session
    // doesn't take the whole worker pool down; `run` itself still succeeds.
    pipeline.clone().run(rx).await.unwrap();

    let wal = Wal::open(dir.path().join("wal.log"), WalConfig::default()).unwrap();
    let entries = wal.read_entries().unwrap();
    assert!(entries.iter().any(|e| e.handler_id == "fail"));
    assert!(!entries.iter().any(|e| e.is_end()));
}

#[tokio::test]
async fn empty_chain_is_rejected_before_any_handler_runs() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.txt");
    std::fs::write(&source, b"hello").unwrap();

    let pipeline: Pipeline<FakeClock> =
        Pipeline::new(Vec::new(), open_wal(&dir), pipeline_config(&dir), FakeClock::new());

    let handoff = FileHandoff::new(&source);
    let err = pipeline
        .process_chain(FlowObject::new(1), handoff, "", pp_core::SessionId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Config(pp_core::ConfigError::EmptyHandlerChain)));
}
