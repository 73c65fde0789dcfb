// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler registry & contract (C3): lookup by name, chain construction
//! from config, and the polymorphic handler operation. Grounded on the
//! original `handler/base.go` (`GetHandler`) and `definitions/engine.go`
//! (`Handler` interface).

use std::collections::HashMap;

use pp_core::{ConfigError, FlowObject, HandlerRetry, HandlerSpec};
use serde_json::{Map, Value};

use crate::error::HandlerError;
use crate::handoff::FileHandoff;

/// A pluggable stage in the transformation chain.
///
/// Implementations are a closed set at build time; the registry maps names
/// to constructors rather than using an inheritance hierarchy (SPEC_FULL.md
/// §9 "Handler polymorphism"). `handle` is synchronous — the pipeline runs
/// it on a blocking-task thread so handlers can do ordinary blocking file,
/// process, and HTTP I/O without hand-rolled async plumbing.
pub trait Handler: Send + Sync {
    /// Unique within the chain: `<previous_handler_id>_<handler_kind_tag>`.
    fn id(&self) -> &str;

    /// The configured name this handler was constructed under (e.g. `"ReadFile"`).
    fn name(&self) -> &str;

    fn handle(&self, flow: FlowObject, handoff: &mut FileHandoff) -> Result<FlowObject, HandlerError>;
}

/// Constructs one kind of [`Handler`] from its `HandlerSpec.config` map.
pub trait HandlerFactory: Send + Sync {
    /// Short tag used when building a handler's chain-position ID (e.g. `"read_file"`).
    fn kind_tag(&self) -> &'static str;

    fn build(&self, id: String, config: &Map<String, Value>) -> Result<Box<dyn Handler>, ConfigError>;
}

/// One constructed handler plus its normalized retry policy.
pub struct ChainEntry {
    pub handler: Box<dyn Handler>,
    pub retry: HandlerRetry,
}

/// Process-wide table mapping handler names to constructor functions.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<String, Box<dyn HandlerFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: Box<dyn HandlerFactory>) {
        self.factories.insert(name.into(), factory);
    }

    /// Build the ordered chain from `specs`, resolving each handler's ID
    /// from the previous one's (empty for the first). A chain with zero
    /// handlers is a `ConfigError` (SPEC_FULL.md §9 "Resolved — zero-length
    /// handler chain"), not a silently-accepted no-op.
    pub fn build_chain(&self, specs: &[HandlerSpec]) -> Result<Vec<ChainEntry>, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyHandlerChain);
        }

        let mut chain = Vec::with_capacity(specs.len());
        let mut prev_id = String::new();
        for spec in specs {
            let factory = self
                .factories
                .get(spec.name.as_str())
                .ok_or_else(|| ConfigError::UnknownHandler(spec.name.clone()))?;

            let id = if prev_id.is_empty() {
                factory.kind_tag().to_string()
            } else {
                format!("{prev_id}_{}", factory.kind_tag())
            };

            let handler = factory.build(id.clone(), &spec.config)?;
            debug_assert_ne!(handler.id(), pp_storage::INIT);
            debug_assert_ne!(handler.id(), pp_storage::END);

            prev_id = id;
            chain.push(ChainEntry { handler, retry: spec.retry.normalized() });
        }
        Ok(chain)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
