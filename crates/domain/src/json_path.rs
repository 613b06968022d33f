//! Path-addressed lookups into JSON documents.
//!
//! Supported syntax:
//! - optional `$` or `$.` prefix
//! - `name.firstName` for nested objects
//! - `items[0]` or `items.0` for array elements
//! - `items.#` for the length of an array
//! - `\.` to match a key containing a literal dot

use serde_json::Value;

/// Resolves `path` against `json`.
///
/// Returns `None` when any segment does not resolve. A path naming no
/// segment at all (`""`, `$`) resolves nothing.
#[must_use]
pub fn query(json: &Value, path: &str) -> Option<Value> {
    let path = path.trim();
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.strip_prefix('.').unwrap_or(path);

    let segments = split_path_segments(path);
    if segments.is_empty() {
        return None;
    }

    let mut current = json;
    let last = segments.len().saturating_sub(1);

    for (position, segment) in segments.iter().enumerate() {
        if segment == "#" && position == last {
            return current.as_array().map(|items| Value::from(items.len()));
        }
        current = step(current, segment)?;
    }

    Some(current.clone())
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Split a path into segments; `[n]` becomes its own segment `n`.
fn split_path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '.' | '[' | ']' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Renders a resolved value the way point assertions compare it.
///
/// Strings are returned raw, `null` as the empty string, everything else
/// as compact JSON with integral floats written as integers (`2.0` and
/// `1e3` render as `2` and `1000`).
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => normalize_numbers(other.clone()).to_string(),
    }
}

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Rewrites every integral float in `value` as an integer.
///
/// Floats beyond 2^53 are left alone.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(number) if !number.is_i64() && !number.is_u64() => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() <= MAX_EXACT_INTEGER => {
                Value::from(float as i64)
            }
            _ => Value::Number(number),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}
