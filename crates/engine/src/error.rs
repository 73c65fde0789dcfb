// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the engine crate (SPEC_FULL.md §7, §7.1).
//!
//! `HandlerError` is returned by individual handler implementations and
//! drives the per-handler retry loop in [`crate::pipeline`]. `EngineError`
//! is the union the pipeline and recovery return, composing every
//! component error with `#[from]` so `?` works across crate boundaries.

use pp_core::SessionId;
use pp_expr::ExpressionError;
use thiserror::Error;

/// A handler's own failure, distinguishing the cause so the retry loop can
/// log something meaningful without downcasting.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),

    #[error("http error: {0}")]
    Http(String),

    #[error("process error: {0}")]
    Process(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] pp_core::ConfigError),

    #[error(transparent)]
    Wal(#[from] pp_storage::WalError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("handler task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("session {session_id} abandoned: handler {handler_id} failed after retries: {source}")]
    HandlerFailed {
        session_id: SessionId,
        handler_id: String,
        #[source]
        source: HandlerError,
    },

    #[error("recovery could not find a handler with id {0} in the current chain")]
    UnknownResumeHandler(String),

    #[error("recovery failed for session {session_id}: {source}")]
    Recovery {
        session_id: SessionId,
        #[source]
        source: Box<EngineError>,
    },
}
