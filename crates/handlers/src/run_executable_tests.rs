// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Read as _;

use pp_core::FlowObject;
use pp_engine::FileHandoff;
use serde_json::json;
use tempfile::TempDir;

use super::*;

#[test]
fn missing_command_field_is_a_config_error() {
    let err = RunExecutableFactory.build("run_executable".to_string(), &Map::new()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField(field) if field == "command"));
}

#[test]
fn pipes_input_to_stdin_and_captures_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    std::fs::write(&input, b"roundtrip me").unwrap();

    let mut config = Map::new();
    config.insert("command".to_string(), json!("cat"));
    config.insert("pass_stdin".to_string(), json!(true));
    config.insert("capture_stdout_to_output".to_string(), json!(true));
    let handler = RunExecutableFactory.build("run_executable".to_string(), &config).unwrap();

    let mut handoff = FileHandoff::new(&input);
    handler.handle(FlowObject::new(1), &mut handoff).unwrap();

    let output_path = handoff.output_path().to_path_buf();
    drop(handoff);
    let mut produced = Vec::new();
    std::fs::File::open(output_path).unwrap().read_to_end(&mut produced).unwrap();
    assert_eq!(produced, b"roundtrip me");
}

#[test]
fn nonzero_exit_is_a_handler_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    std::fs::write(&input, b"ignored").unwrap();

    let mut config = Map::new();
    config.insert("command".to_string(), json!("sh"));
    config.insert("args".to_string(), json!(["-c", "exit 7"]));
    let handler = RunExecutableFactory.build("run_executable".to_string(), &config).unwrap();

    let mut handoff = FileHandoff::new(&input);
    let err = handler.handle(FlowObject::new(1), &mut handoff).unwrap_err();
    assert!(matches!(err, HandlerError::Process(_)));
}

#[test]
fn expression_evaluated_args() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    std::fs::write(&input, b"x").unwrap();

    let mut config = Map::new();
    config.insert("command".to_string(), json!("sh"));
    config.insert("args".to_string(), json!(["-c", "exit ${code}"]));
    let handler = RunExecutableFactory.build("run_executable".to_string(), &config).unwrap();

    let mut flow = FlowObject::new(1);
    flow.set("code", "0");

    let mut handoff = FileHandoff::new(&input);
    let result = handler.handle(flow, &mut handoff).unwrap();
    assert_eq!(result.get("RunExecutable.command").and_then(|v| v.as_str()), Some("sh"));
}
