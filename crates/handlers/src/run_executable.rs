// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RunExecutable` — runs a configured command as a child process, optionally
//! piping the handoff's input to its stdin and/or capturing its stdout into
//! the handoff's output. Grounded on the original `handler/run_executable.go`.

use std::io::{Read, Write};
use std::process::{Command, Stdio};

use pp_core::{ConfigError, FlowObject};
use pp_engine::{FileHandoff, Handler, HandlerError, HandlerFactory};
use serde_json::{Map, Value};

pub struct RunExecutableFactory;

impl HandlerFactory for RunExecutableFactory {
    fn kind_tag(&self) -> &'static str {
        "run_executable"
    }

    fn build(&self, id: String, config: &Map<String, Value>) -> Result<Box<dyn Handler>, ConfigError> {
        let command = config
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::MissingField("command".to_string()))?
            .to_string();
        let args = config
            .get("args")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        let pass_stdin = config.get("pass_stdin").and_then(Value::as_bool).unwrap_or(false);
        let capture_stdout_to_output =
            config.get("capture_stdout_to_output").and_then(Value::as_bool).unwrap_or(false);
        Ok(Box::new(RunExecutable { id, command, args, pass_stdin, capture_stdout_to_output }))
    }
}

struct RunExecutable {
    id: String,
    command: String,
    args: Vec<String>,
    pass_stdin: bool,
    capture_stdout_to_output: bool,
}

impl Handler for RunExecutable {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "RunExecutable"
    }

    fn handle(&self, mut flow: FlowObject, handoff: &mut FileHandoff) -> Result<FlowObject, HandlerError> {
        let command = pp_expr::evaluate(&self.command, &flow.metadata)?;
        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            args.push(pp_expr::evaluate(arg, &flow.metadata)?);
        }

        let mut cmd = Command::new(&command);
        cmd.args(&args);
        cmd.stdin(if self.pass_stdin { Stdio::piped() } else { Stdio::null() });
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| HandlerError::Process(format!("failed to spawn {command}: {e}")))?;

        if self.pass_stdin {
            let mut input = Vec::new();
            handoff.read()?.read_to_end(&mut input)?;
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| HandlerError::Process("child stdin was not piped".to_string()))?;
            stdin.write_all(&input)?;
            drop(stdin);
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(HandlerError::Process(format!(
                "{command} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        if self.capture_stdout_to_output {
            handoff.write()?.write_all(&output.stdout)?;
        }

        flow.set("RunExecutable.command", command);
        Ok(flow)
    }
}

#[cfg(test)]
#[path = "run_executable_tests.rs"]
mod tests;
