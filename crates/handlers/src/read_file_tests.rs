// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Read as _;

use pp_core::FlowObject;
use pp_engine::FileHandoff;
use serde_json::json;
use tempfile::TempDir;

use super::*;

#[test]
fn missing_path_field_is_a_config_error() {
    let err = ReadFileFactory.build("read_file".to_string(), &Map::new()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField(field) if field == "path"));
}

#[test]
fn reads_file_content_into_the_handoff_writer() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("in.txt");
    std::fs::write(&source, b"hello world").unwrap();

    let mut config = Map::new();
    config.insert("path".to_string(), json!(source.to_string_lossy()));
    let handler = ReadFileFactory.build("read_file".to_string(), &config).unwrap();

    let scratch = dir.path().join("scratch");
    let mut handoff = FileHandoff::new(&scratch);
    let flow = handler.handle(FlowObject::new(1), &mut handoff).unwrap();

    assert_eq!(flow.get("ReadFile.path").and_then(|v| v.as_str()), Some(source.to_string_lossy().as_ref()));

    let output_path = handoff.output_path().to_path_buf();
    drop(handoff);
    let mut written = Vec::new();
    std::fs::File::open(output_path).unwrap().read_to_end(&mut written).unwrap();
    assert_eq!(written, b"hello world");
}

#[test]
fn evaluates_path_expression_against_metadata() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("in.txt");
    std::fs::write(&source, b"data").unwrap();

    let mut config = Map::new();
    config.insert("path".to_string(), json!("${dir}/in.txt"));
    let handler = ReadFileFactory.build("read_file".to_string(), &config).unwrap();

    let mut flow = FlowObject::new(1);
    flow.set("dir", dir.path().to_string_lossy().to_string());

    let mut handoff = FileHandoff::new(dir.path().join("scratch"));
    let result = handler.handle(flow, &mut handoff).unwrap();
    assert_eq!(
        result.get("ReadFile.path").and_then(|v| v.as_str()),
        Some(source.to_string_lossy().as_ref())
    );
}
