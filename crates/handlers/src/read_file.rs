// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ReadFile` — reads a file from disk and copies its bytes into the
//! handoff's output stream, merging its content into the chain's working
//! file. Grounded on the original `handler/read_file.go`.

use std::fs::File;
use std::io::{Read, Write};

use pp_core::{ConfigError, FlowObject};
use pp_engine::{FileHandoff, Handler, HandlerError, HandlerFactory};
use serde_json::{Map, Value};

pub struct ReadFileFactory;

impl HandlerFactory for ReadFileFactory {
    fn kind_tag(&self) -> &'static str {
        "read_file"
    }

    fn build(&self, id: String, config: &Map<String, Value>) -> Result<Box<dyn Handler>, ConfigError> {
        let path = config
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::MissingField("path".to_string()))?
            .to_string();
        Ok(Box::new(ReadFile { id, path }))
    }
}

struct ReadFile {
    id: String,
    path: String,
}

impl Handler for ReadFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "ReadFile"
    }

    fn handle(&self, mut flow: FlowObject, handoff: &mut FileHandoff) -> Result<FlowObject, HandlerError> {
        let path = pp_expr::evaluate(&self.path, &flow.metadata)?;
        let mut src = File::open(&path)?;
        let mut data = Vec::new();
        src.read_to_end(&mut data)?;
        handoff.write()?.write_all(&data)?;
        flow.set("ReadFile.path", path);
        Ok(flow)
    }
}

#[cfg(test)]
#[path = "read_file_tests.rs"]
mod tests;
