//! Dotted-path access over JSON value trees
//!
//! Hooks address record fields by path strings such as `metadata.title` or
//! `metadata.contributors[2].email`. This module implements the shared
//! get/set semantics for those paths: reads return `None` for any missing
//! step, writes create intermediate containers as needed (objects for named
//! segments, arrays for indexed segments).
//!
//! # Examples
//!
//! ```
//! use serde_json::{Value, json};
//!
//! let mut root = json!({});
//! curata_core::value::set_path(&mut root, "metadata.title", json!("Dataset")).unwrap();
//! assert_eq!(
//!     curata_core::value::get_path(&root, "metadata.title"),
//!     Some(&json!("Dataset"))
//! );
//! ```

use crate::error::{Error, Result};
use serde_json::Value;

/// A single step in a parsed path
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Object member access (`foo`)
    Key(String),
    /// Array element access (`[3]`)
    Index(usize),
}

/// Parse a dotted/bracketed path into segments
///
/// Supports `a.b.c`, `a[0].b` and `a.b[2][3]`. An empty path or an empty
/// segment (`a..b`) is an error.
fn parse(path: &str) -> Result<Vec<Segment>> {
    let invalid = |reason: &str| Error::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }

    let mut segments = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            return Err(invalid("empty segment"));
        }
        let mut rest = part;
        // Leading name before any bracket, e.g. "contributors" in "contributors[2]"
        if !rest.starts_with('[') {
            let end = rest.find('[').unwrap_or(rest.len());
            segments.push(Segment::Key(rest[..end].to_string()));
            rest = &rest[end..];
        }
        while !rest.is_empty() {
            let Some(close) = rest.find(']') else {
                return Err(invalid("unterminated '['"));
            };
            if !rest.starts_with('[') {
                return Err(invalid("unexpected characters after ']'"));
            }
            let idx: usize = rest[1..close]
                .parse()
                .map_err(|_| invalid("index is not a number"))?;
            segments.push(Segment::Index(idx));
            rest = &rest[close + 1..];
        }
    }
    Ok(segments)
}

/// Read the value at `path`, or `None` if any step is missing
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse(path).ok()?;
    let mut current = root;
    for segment in &segments {
        current = match segment {
            Segment::Key(key) => current.as_object()?.get(key)?,
            Segment::Index(idx) => current.as_array()?.get(*idx)?,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate containers as needed
///
/// Missing or non-container intermediate steps are replaced: a named segment
/// materializes an object, an indexed segment materializes an array padded
/// with `null` up to the index.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let segments = parse(path)?;
    let mut current = root;
    for (pos, segment) in segments.iter().enumerate() {
        let last = pos == segments.len() - 1;
        match segment {
            Segment::Key(key) => {
                if !current.is_object() {
                    *current = Value::Object(serde_json::Map::new());
                }
                let map = current
                    .as_object_mut()
                    .ok_or_else(|| Error::Message("object access failed".to_string()))?;
                if last {
                    map.insert(key.clone(), value);
                    return Ok(());
                }
                current = map.entry(key.clone()).or_insert(Value::Null);
            }
            Segment::Index(idx) => {
                if !current.is_array() {
                    *current = Value::Array(Vec::new());
                }
                let array = current
                    .as_array_mut()
                    .ok_or_else(|| Error::Message("array access failed".to_string()))?;
                if array.len() <= *idx {
                    array.resize(*idx + 1, Value::Null);
                }
                if last {
                    array[*idx] = value;
                    return Ok(());
                }
                current = &mut array[*idx];
            }
        }
    }
    Ok(())
}
