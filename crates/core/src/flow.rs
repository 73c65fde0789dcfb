// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-job mutable context handed between handlers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-session mutable context carrying `pages` and an arbitrary metadata map.
///
/// A handler receives a deep copy of the caller's `FlowObject` (see
/// `pp-engine::pipeline`) and returns a new one to replace it on success. The
/// `metadata` map is backed by owned `serde_json::Value`s, so `Clone` is
/// already a deep copy — there are no shared references to alias across
/// concurrent sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowObject {
    pub pages: u32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl FlowObject {
    pub fn new(pages: u32) -> Self {
        Self { pages, metadata: Map::new() }
    }

    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
