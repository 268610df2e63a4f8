//! JSON Patch (RFC 6902) over `serde_json::Value`
//!
//! Operations are applied in order to a copy of the document. The first
//! failing operation aborts the whole patch and the input is left untouched.
//!
//! # Example
//!
//! ```rust
//! use interface_api::patch::{apply_patch, PatchOperation};
//! use serde_json::json;
//!
//! let document = json!({"name": "Trip", "status": 1});
//! let operations: Vec<PatchOperation> = serde_json::from_value(json!([
//!     {"op": "test", "path": "/status", "value": 1},
//!     {"op": "replace", "path": "/status", "value": 2}
//! ]))
//! .unwrap();
//!
//! let patched = apply_patch(&document, &operations).unwrap();
//! assert_eq!(patched["status"], 2);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single patch operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

/// Reasons a patch cannot be applied
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Invalid JSON pointer: {0:?}")]
    InvalidPointer(String),

    #[error("Nothing at {0:?}")]
    PathNotFound(String),

    #[error("Invalid array index in {0:?}")]
    InvalidIndex(String),

    #[error("Parent of {0:?} is not an object or array")]
    NotAContainer(String),

    #[error("Cannot move {from:?} into its own child {path:?}")]
    MoveIntoDescendant { from: String, path: String },

    #[error("Test failed at {0:?}")]
    TestFailed(String),

    #[error("Patched document is not valid: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

/// Applies `operations` to a copy of `document`
///
/// # Errors
///
/// Returns the error of the first operation that cannot be applied
pub fn apply_patch(document: &Value, operations: &[PatchOperation]) -> Result<Value, PatchError> {
    let mut patched = document.clone();
    for operation in operations {
        apply_operation(&mut patched, operation)?;
    }
    Ok(patched)
}

fn apply_operation(document: &mut Value, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } => add(document, path, value.clone()),
        PatchOperation::Remove { path } => remove(document, path).map(drop),
        PatchOperation::Replace { path, value } => {
            let tokens = parse_pointer(path)?;
            let target = resolve_mut(document, &tokens)
                .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            let from_tokens = parse_pointer(from)?;
            let path_tokens = parse_pointer(path)?;
            if from_tokens == path_tokens {
                return resolve(document, &from_tokens)
                    .map(drop)
                    .ok_or_else(|| PatchError::PathNotFound(from.clone()));
            }
            if path_tokens.starts_with(&from_tokens) {
                return Err(PatchError::MoveIntoDescendant {
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(document, from)?;
            add(document, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let tokens = parse_pointer(from)?;
            let value = resolve(document, &tokens)
                .cloned()
                .ok_or_else(|| PatchError::PathNotFound(from.clone()))?;
            add(document, path, value)
        }
        PatchOperation::Test { path, value } => {
            let tokens = parse_pointer(path)?;
            match resolve(document, &tokens) {
                Some(current) if current == value => Ok(()),
                _ => Err(PatchError::TestFailed(path.clone())),
            }
        }
    }
}

fn add(document: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    let tokens = parse_pointer(path)?;
    let Some((last, parent_tokens)) = tokens.split_last() else {
        *document = value;
        return Ok(());
    };

    let parent = resolve_mut(document, parent_tokens)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;

    match parent {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
                return Ok(());
            }
            match parse_index(last) {
                Some(index) if index <= items.len() => {
                    items.insert(index, value);
                    Ok(())
                }
                _ => Err(PatchError::InvalidIndex(path.to_string())),
            }
        }
        _ => Err(PatchError::NotAContainer(path.to_string())),
    }
}

fn remove(document: &mut Value, path: &str) -> Result<Value, PatchError> {
    let tokens = parse_pointer(path)?;
    let Some((last, parent_tokens)) = tokens.split_last() else {
        // The whole document cannot be removed
        return Err(PatchError::InvalidPointer(path.to_string()));
    };

    let parent = resolve_mut(document, parent_tokens)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;

    match parent {
        Value::Object(map) => map
            .remove(last)
            .ok_or_else(|| PatchError::PathNotFound(path.to_string())),
        Value::Array(items) => match parse_index(last) {
            Some(index) if index < items.len() => Ok(items.remove(index)),
            _ => Err(PatchError::InvalidIndex(path.to_string())),
        },
        _ => Err(PatchError::NotAContainer(path.to_string())),
    }
}

/// Splits a JSON pointer into unescaped reference tokens
fn parse_pointer(pointer: &str) -> Result<Vec<String>, PatchError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(PatchError::InvalidPointer(pointer.to_string()));
    };

    rest.split('/')
        .map(|token| unescape(token).ok_or_else(|| PatchError::InvalidPointer(pointer.to_string())))
        .collect()
}

fn unescape(token: &str) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

/// Array indices are decimal without leading zeros
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty()
        || !token.bytes().all(|b| b.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return None;
    }
    token.parse().ok()
}

fn resolve<'a>(document: &'a Value, tokens: &[String]) -> Option<&'a Value> {
    tokens.iter().try_fold(document, |current, token| match current {
        Value::Object(map) => map.get(token),
        Value::Array(items) => parse_index(token).and_then(|i| items.get(i)),
        _ => None,
    })
}

fn resolve_mut<'a>(document: &'a mut Value, tokens: &[String]) -> Option<&'a mut Value> {
    tokens.iter().try_fold(document, |current, token| match current {
        Value::Object(map) => map.get_mut(token),
        Value::Array(items) => parse_index(token).and_then(move |i| items.get_mut(i)),
        _ => None,
    })
}
