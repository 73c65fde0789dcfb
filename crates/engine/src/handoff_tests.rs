// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::{Read as _, Write as _};
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    let mut f = File::create(path).unwrap();
    f.write_all(content).unwrap();
}

#[test]
fn output_path_is_fresh_and_in_same_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    write_file(&input, b"hello");

    let handoff = FileHandoff::new(&input);
    assert_eq!(handoff.output_path().parent(), Some(dir.path()));
    assert_ne!(handoff.output_path(), handoff.input_path());
    assert!(!handoff.output_path().exists());
}

#[test]
fn read_then_write_roundtrips_content() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    write_file(&input, b"payload");

    let mut handoff = FileHandoff::new(&input);
    let mut buf = Vec::new();
    handoff.read().unwrap().read_to_end(&mut buf).unwrap();
    handoff.write().unwrap().write_all(&buf).unwrap();
    handoff.close();

    let out = std::fs::read(handoff.output_path()).unwrap();
    assert_eq!(out, b"payload");
}

#[test]
fn advance_deletes_input_when_writer_was_opened() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    write_file(&input, b"x");

    let mut handoff = FileHandoff::new(&input);
    let output_path = handoff.output_path().to_path_buf();
    handoff.write().unwrap().write_all(b"y").unwrap();

    let next = handoff.advance().unwrap();
    assert!(!input.exists(), "old input should have been deleted");
    assert_eq!(next.input_path(), output_path.as_path());
}

#[test]
fn advance_keeps_input_when_nothing_was_written() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    write_file(&input, b"x");

    let handoff = FileHandoff::new(&input);
    let next = handoff.advance().unwrap();

    assert!(input.exists(), "input should survive a pass-through stage");
    assert_eq!(next.input_path(), input.as_path());
}

#[test]
fn repeated_read_and_write_return_the_same_stream() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    write_file(&input, b"same");

    let mut handoff = FileHandoff::new(&input);
    assert!(handoff.read().is_ok());
    assert!(handoff.read().is_ok());
    assert!(handoff.write().is_ok());
    assert!(handoff.write().is_ok());
    assert!(handoff.wrote());
}
