// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler configuration, as it appears in the `engine.handlers` list of
//! the YAML config (see SPEC_FULL.md §6, §3.1).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Retry policy for one handler in the chain.
///
/// `max_retries = 0` and an absent `retry` block are both normalized to `1`
/// at config-load time (one attempt, no retry) — see [`HandlerRetry::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerRetry {
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default, rename = "backoff_interval")]
    pub backoff_seconds: u64,
}

impl Default for HandlerRetry {
    fn default() -> Self {
        Self { max_retries: 1, backoff_seconds: 0 }
    }
}

impl HandlerRetry {
    /// Returns a copy with `max_retries` forced to at least 1.
    pub fn normalized(self) -> Self {
        Self { max_retries: self.max_retries.max(1), backoff_seconds: self.backoff_seconds }
    }
}

/// One entry in the configured handler chain, before construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerSpec {
    pub name: String,
    #[serde(default)]
    pub retry: HandlerRetry,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl HandlerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), retry: HandlerRetry::default(), config: Map::new() }
    }
}

#[cfg(test)]
#[path = "handler_spec_tests.rs"]
mod tests;
