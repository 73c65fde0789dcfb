// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn meta(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut m = Map::new();
    for (k, v) in pairs {
        m.insert((*k).to_string(), v.clone());
    }
    m
}

#[test]
fn passes_through_plain_text() {
    let m = Map::new();
    assert_eq!(evaluate("no expressions here", &m).unwrap(), "no expressions here");
}

#[test]
fn substitutes_simple_variable() {
    let m = meta(&[("name", json!("alice"))]);
    assert_eq!(evaluate("hello ${name}", &m).unwrap(), "hello alice");
}

#[test]
fn stringifies_non_string_values() {
    let m = meta(&[("pages", json!(3))]);
    assert_eq!(evaluate("${pages}", &m).unwrap(), "3");
}

#[test]
fn nested_expressions_evaluate_innermost_first() {
    let m = meta(&[("x", json!("y")), ("y", json!("z"))]);
    assert_eq!(evaluate("${${x}}", &m).unwrap(), "z");
}

#[test]
fn uuid_produces_a_valid_uuid_each_call() {
    let m = Map::new();
    let a = evaluate("${uuid()}", &m).unwrap();
    let b = evaluate("${uuid()}", &m).unwrap();
    assert!(uuid::Uuid::parse_str(&a).is_ok());
    assert!(uuid::Uuid::parse_str(&b).is_ok());
    assert_ne!(a, b);
}

#[test]
fn undefined_variable_is_an_error() {
    let m = Map::new();
    assert_eq!(
        evaluate("${missing}", &m).unwrap_err(),
        ExpressionError::UndefinedVariable("missing".to_string())
    );
}

#[test]
fn unterminated_expression_is_an_error() {
    let m = Map::new();
    assert_eq!(evaluate("${oops", &m).unwrap_err(), ExpressionError::Unterminated);
}

#[test]
fn single_backslash_escapes_the_whole_group() {
    let m = meta(&[("x", json!("v"))]);
    assert_eq!(evaluate(r"\${x}", &m).unwrap(), "${x}");
}

#[test]
fn double_backslash_escapes_only_the_slash() {
    let m = meta(&[("x", json!("v"))]);
    assert_eq!(evaluate(r"\\${x}", &m).unwrap(), r"\v");
}

#[test]
fn escaped_outer_with_nested_substitution() {
    let m = meta(&[("x", json!("v"))]);
    assert_eq!(evaluate(r"\${y${x}}", &m).unwrap(), "${yv}");
}

#[test]
fn roundtrips_iff_no_unescaped_expression() {
    let m = Map::new();
    assert_eq!(evaluate("plain text, no braces", &m).unwrap(), "plain text, no braces");
    assert_eq!(evaluate(r"literal \${escaped}", &m).unwrap(), "literal ${escaped}");
    assert!(evaluate("${unresolved}", &m).is_err());
}
