// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config-time errors shared by every crate that can reject a bad pipeline
//! configuration: the daemon (parsing YAML) and the engine (building the
//! handler chain from it).

use thiserror::Error;

/// Fatal at startup — malformed config, unknown handler name, a required
/// option missing, or a zero-length handler chain.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown handler name: {0}")]
    UnknownHandler(String),

    #[error("handler chain must have at least one handler")]
    EmptyHandlerChain,

    #[error("missing required config field: {0}")]
    MissingField(String),

    #[error("invalid YAML: {0}")]
    Yaml(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
