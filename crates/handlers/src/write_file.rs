// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WriteFile` — reads the handoff's current input in full and writes it
//! verbatim to a destination path. A pure sink: it never opens the
//! handoff's writer, so when it's the last handler in the chain the
//! destination it wrote — not the scratch file — is the durable artifact.
//! Grounded on the original `handler/write_file.go`.

use std::fs::File;
use std::io::{Read, Write};

use pp_core::{ConfigError, FlowObject};
use pp_engine::{FileHandoff, Handler, HandlerError, HandlerFactory};
use serde_json::{Map, Value};

pub struct WriteFileFactory;

impl HandlerFactory for WriteFileFactory {
    fn kind_tag(&self) -> &'static str {
        "write_file"
    }

    fn build(&self, id: String, config: &Map<String, Value>) -> Result<Box<dyn Handler>, ConfigError> {
        let path = config
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::MissingField("path".to_string()))?
            .to_string();
        Ok(Box::new(WriteFile { id, path }))
    }
}

struct WriteFile {
    id: String,
    path: String,
}

impl Handler for WriteFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "WriteFile"
    }

    fn handle(&self, mut flow: FlowObject, handoff: &mut FileHandoff) -> Result<FlowObject, HandlerError> {
        let path = pp_expr::evaluate(&self.path, &flow.metadata)?;
        let mut data = Vec::new();
        handoff.read()?.read_to_end(&mut data)?;

        if let Some(parent) = std::path::Path::new(&path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        File::create(&path)?.write_all(&data)?;

        flow.set("WriteFile.path", path);
        Ok(flow)
    }
}

#[cfg(test)]
#[path = "write_file_tests.rs"]
mod tests;
