// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recovery (C6): replay the WAL on startup to rebuild unfinished sessions
//! and resume each from its last checkpoint. Grounded on the original
//! `engine/recovery.go` (`Recover`, `createSessionMapForWAL`,
//! `getProcessHandlerForSession`).

use std::collections::HashMap;

use pp_core::{Clock, SessionId};
use pp_storage::LogEntry;

use crate::error::EngineError;
use crate::handoff::FileHandoff;
use crate::pipeline::Pipeline;

/// Replay the WAL and re-drive every session that checkpointed but never
/// reached `__end__`. Runs strictly before the pipeline's run loop starts
/// accepting new `PrintInfo` (SPEC_FULL.md §4.6).
pub async fn recover<C: Clock>(pipeline: &Pipeline<C>) -> Result<(), EngineError> {
    let entries = {
        let wal = pipeline.wal.lock();
        wal.read_entries()?
    };
    if entries.is_empty() {
        return Ok(());
    }

    let mut last_by_session: HashMap<SessionId, LogEntry> = HashMap::new();
    for entry in entries {
        if entry.is_end() {
            last_by_session.remove(&entry.session_id);
        } else {
            last_by_session.insert(entry.session_id, entry);
        }
    }

    let sessions = last_by_session.len();
    if sessions > 0 {
        tracing::info!(sessions, "recovering unfinished sessions from WAL");
    }

    for (session_id, last_entry) in last_by_session {
        if let Err(e) = recover_session(pipeline, session_id, last_entry).await {
            if pipeline.config.ignore_recovery_errors {
                tracing::warn!(session_id = %session_id, error = %e, "ignoring recovery error for session");
                continue;
            }
            return Err(EngineError::Recovery { session_id, source: Box::new(e) });
        }
    }
    Ok(())
}

/// Re-drive a single session from its last checkpoint. The handler whose ID
/// is `last_entry.handler_id` is re-executed (at-least-once); an `__init__`
/// checkpoint instead re-copies the source file and restarts the chain from
/// the head, since no handler WAL record was yet written.
async fn recover_session<C: Clock>(
    pipeline: &Pipeline<C>,
    session_id: SessionId,
    last_entry: LogEntry,
) -> Result<(), EngineError> {
    if last_entry.is_init() {
        tokio::fs::copy(&last_entry.input_file, &last_entry.output_file).await?;
        let handoff = FileHandoff::new(&last_entry.output_file);
        pipeline.process_chain(last_entry.flow_object, handoff, "", session_id).await
    } else {
        let handoff = FileHandoff::with_output(&last_entry.input_file, &last_entry.output_file);
        pipeline
            .process_chain(last_entry.flow_object, handoff, &last_entry.handler_id, session_id)
            .await
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
