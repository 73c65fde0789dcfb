// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline engine (C5): ingests jobs, assigns session IDs, drives the
//! handler chain with retries, writes WAL checkpoints, cleans up, and runs
//! a bounded worker pool. Grounded on the original `engine/base.go`
//! (`handleFile`) and `engine/handler.go` (`processHandlers`); the
//! tokio::Semaphore + spawn-per-session worker-pool idiom follows the
//! teacher's `crates/engine/src/executor.rs` use of `tokio::spawn` for
//! per-effect concurrency (SPEC_FULL.md §4.5.1).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pp_core::{Clock, FlowObject, PrintInfo, SessionId, SystemClock};
use pp_storage::{LogEntry, Wal};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::error::EngineError;
use crate::handoff::FileHandoff;
use crate::recovery;
use crate::registry::{ChainEntry, Handler};

/// Tunables that aren't part of the handler chain itself (SPEC_FULL.md §3.1
/// `EngineConfig`).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub ignore_recovery_errors: bool,
    pub max_workers: usize,
    /// `<workdir>/contents` — scratch directory for per-session working copies.
    pub contents_dir: PathBuf,
}

/// The per-job state machine driving a document through the configured
/// handler chain.
pub struct Pipeline<C: Clock = SystemClock> {
    pub(crate) chain: Arc<Vec<ChainEntry>>,
    pub(crate) wal: Arc<Mutex<Wal>>,
    pub(crate) config: PipelineConfig,
    pub(crate) clock: C,
}

impl<C: Clock> Pipeline<C> {
    pub fn new(chain: Vec<ChainEntry>, wal: Wal, config: PipelineConfig, clock: C) -> Self {
        Self { chain: Arc::new(chain), wal: Arc::new(Mutex::new(wal)), config, clock }
    }

    /// Run Recovery (C6) synchronously, then consume `ingest` until the
    /// channel closes, dispatching each `PrintInfo` to the bounded worker
    /// pool. Returns once every in-flight session has drained.
    pub async fn run(self: Arc<Self>, mut ingest: mpsc::Receiver<PrintInfo>) -> Result<(), EngineError> {
        recovery::recover(&self).await?;

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let mut tasks = JoinSet::new();

        while let Some(info) = ingest.recv().await {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // semaphore closed: shutting down
            };
            let pipeline = Arc::clone(&self);
            tasks.spawn(async move {
                let _permit = permit;
                if let Err(e) = pipeline.handle_job(info).await {
                    tracing::warn!(error = %e, "session abandoned");
                }
            });
        }

        // Ingest channel closed (cancellation): drain in-flight sessions.
        while tasks.join_next().await.is_some() {}
        Ok(())
    }

    /// Allocate a session, checkpoint `__init__`, copy the source file into
    /// the workdir, and drive the chain from the head.
    async fn handle_job(&self, info: PrintInfo) -> Result<(), EngineError> {
        let session_id = SessionId::new();
        let flow = FlowObject::new(info.pages);
        let input = self.config.contents_dir.join(Uuid::new_v4().to_string());

        {
            let mut wal = self.wal.lock();
            wal.write_entry(&LogEntry::init(session_id, &info.filepath, &input, flow.clone()))?;
        }

        if let Err(e) = tokio::fs::copy(&info.filepath, &input).await {
            tracing::warn!(
                session_id = %session_id,
                error = %e,
                "failed to copy source file into workdir; session abandoned"
            );
            return Ok(());
        }

        let handoff = FileHandoff::new(&input);
        self.process_chain(flow, handoff, "", session_id).await
    }

    /// Drive the chain from the handler whose ID is `start_id` (or the head
    /// if empty) to completion, checkpointing every transition.
    pub(crate) async fn process_chain(
        &self,
        mut flow: FlowObject,
        mut handoff: FileHandoff,
        start_id: &str,
        session_id: SessionId,
    ) -> Result<(), EngineError> {
        if self.chain.is_empty() {
            return Err(pp_core::ConfigError::EmptyHandlerChain.into());
        }

        let start_index = if start_id.is_empty() {
            0
        } else {
            self.chain
                .iter()
                .position(|entry| entry.handler.id() == start_id)
                .ok_or_else(|| EngineError::UnknownResumeHandler(start_id.to_string()))?
        };

        for idx in start_index..self.chain.len() {
            let entry = &self.chain[idx];

            {
                let mut wal = self.wal.lock();
                wal.write_entry(&LogEntry::handler(
                    session_id,
                    entry.handler.name(),
                    entry.handler.id(),
                    handoff.input_path(),
                    handoff.output_path(),
                    flow.clone(),
                ))?;
            }

            let flow_copy = flow.deep_copy();
            let max_attempts = entry.retry.max_retries.max(1);
            let mut attempt = 1u32;
            let (outcome, returned_handoff) = loop {
                let (result, ho) = self.call_handler(idx, flow_copy.clone(), handoff).await?;
                match result {
                    Ok(new_flow) => break (Ok(new_flow), ho),
                    Err(e) if attempt < max_attempts => {
                        tracing::warn!(
                            session_id = %session_id,
                            handler_id = entry.handler.id(),
                            attempt,
                            error = %e,
                            "handler failed, retrying"
                        );
                        handoff = ho;
                        attempt += 1;
                        self.clock.sleep(Duration::from_secs(entry.retry.backoff_seconds)).await;
                        continue;
                    }
                    Err(e) => break (Err(e), ho),
                }
            };
            handoff = returned_handoff;

            match outcome {
                Ok(new_flow) => flow = new_flow,
                Err(source) => {
                    return Err(EngineError::HandlerFailed {
                        session_id,
                        handler_id: entry.handler.id().to_string(),
                        source,
                    })
                }
            }

            handoff = handoff.advance()?;
        }

        {
            let mut wal = self.wal.lock();
            wal.write_entry(&LogEntry::end(session_id, handoff.input_path(), handoff.output_path(), flow))?;
        }
        let _ = std::fs::remove_file(handoff.input_path());

        Ok(())
    }

    /// Run one handler invocation on a blocking-task thread, since handler
    /// bodies may do blocking file/process/HTTP I/O.
    async fn call_handler(
        &self,
        idx: usize,
        flow: FlowObject,
        mut handoff: FileHandoff,
    ) -> Result<(Result<FlowObject, crate::error::HandlerError>, FileHandoff), EngineError> {
        let chain = Arc::clone(&self.chain);
        tokio::task::spawn_blocking(move || {
            let result = chain[idx].handler.handle(flow, &mut handoff);
            (result, handoff)
        })
        .await
        .map_err(EngineError::from)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
