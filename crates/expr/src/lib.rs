// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${...}` expression substitution for handler configuration strings.
//!
//! A literal `${name}` is replaced by `metadata[name]` stringified. Nested
//! `${...}` groups are permitted and evaluated innermost-first. A preceding
//! backslash escapes the next `$`, leaving the whole `${...}` group as
//! literal text (though anything nested *inside* it still substitutes
//! normally). `${uuid()}` returns a fresh random UUID per evaluation.
//!
//! Unresolved names are a hard error rather than left as literal text —
//! config mistakes should surface immediately, not silently pass a
//! malformed path to a handler.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("undefined variable in expression: {0}")]
    UndefinedVariable(String),

    #[error("unterminated ${{...}} expression")]
    Unterminated,
}

/// Evaluate every `${...}` reference in `input` against `metadata`.
pub fn evaluate(input: &str, metadata: &Map<String, Value>) -> Result<String, ExpressionError> {
    let chars: Vec<char> = input.chars().collect();
    eval_range(&chars, 0, chars.len(), metadata)
}

fn eval_range(
    chars: &[char],
    start: usize,
    end: usize,
    metadata: &Map<String, Value>,
) -> Result<String, ExpressionError> {
    let mut out = String::new();
    let mut i = start;
    while i < end {
        let c = chars[i];
        if c == '\\' {
            if i + 1 < end && chars[i + 1] == '\\' {
                out.push('\\');
                i += 2;
                continue;
            }
            if i + 1 < end && chars[i + 1] == '$' && i + 2 < end && chars[i + 2] == '{' {
                let inner_start = i + 3;
                let close = find_matching_brace(chars, inner_start, end)?;
                let inner = eval_range(chars, inner_start, close, metadata)?;
                out.push_str("${");
                out.push_str(&inner);
                out.push('}');
                i = close + 1;
                continue;
            }
            if i + 1 < end && chars[i + 1] == '$' {
                out.push('$');
                i += 2;
                continue;
            }
            out.push('\\');
            i += 1;
            continue;
        }
        if c == '$' && i + 1 < end && chars[i + 1] == '{' {
            let inner_start = i + 2;
            let close = find_matching_brace(chars, inner_start, end)?;
            let inner = eval_range(chars, inner_start, close, metadata)?;
            out.push_str(&resolve(&inner, metadata)?);
            i = close + 1;
            continue;
        }
        out.push(c);
        i += 1;
    }
    Ok(out)
}

/// Find the index of the `}` that closes the group starting right after
/// `start` (i.e. `start` already points past the opening `${`). Nested `${`
/// groups increase the depth; a plain `{` does not, since only `${` ever
/// opens a group in this grammar.
fn find_matching_brace(
    chars: &[char],
    mut j: usize,
    end: usize,
) -> Result<usize, ExpressionError> {
    let mut depth = 1;
    while j < end {
        if chars[j] == '$' && j + 1 < end && chars[j + 1] == '{' {
            depth += 1;
            j += 2;
            continue;
        }
        if chars[j] == '}' {
            depth -= 1;
            if depth == 0 {
                return Ok(j);
            }
            j += 1;
            continue;
        }
        j += 1;
    }
    Err(ExpressionError::Unterminated)
}

fn resolve(name: &str, metadata: &Map<String, Value>) -> Result<String, ExpressionError> {
    if name == "uuid()" {
        return Ok(Uuid::new_v4().to_string());
    }
    match metadata.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(ExpressionError::UndefinedVariable(name.to_string())),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
