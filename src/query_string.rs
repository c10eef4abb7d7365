//! Bracket-aware query string decoding.
//!
//! Turns a URL query component into the nested mapping the translator reads:
//!
//! ```rust,ignore
//! // filter[age]=5&operator[age]=gt&sort=-createdAt,name&tag=a&tag=b
//! {
//!     "filter": {"age": "5"},
//!     "operator": {"age": "gt"},
//!     "sort": "-createdAt,name",
//!     "tag": ["a", "b"]
//! }
//! ```
//!
//! Percent and `+` decoding is done by `url::form_urlencoded`. Values are
//! always strings; typing is left to coercion.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Nesting depth used by [`decode`]
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Decode a query component (without the leading `?`) into a mapping,
/// nesting at most [`DEFAULT_MAX_DEPTH`] bracket segments.
#[must_use]
pub fn decode(query: &str) -> Map<String, Value> {
    decode_with_depth(query, DEFAULT_MAX_DEPTH)
}

/// Decode a query component, nesting at most `max_depth` bracket segments.
///
/// Segments past the limit are kept together as one literal key:
/// with a depth of 2, `a[b][c][d]=1` gives `{"a": {"b": {"c": {"[d]": "1"}}}}`.
/// A depth of `0` disables nesting.
#[must_use]
pub fn decode_with_depth(query: &str, max_depth: usize) -> Map<String, Value> {
    let mut decoded = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let path = split_key(&key, max_depth);
        if path.first().is_some_and(|root| !root.is_empty()) {
            insert(&mut decoded, &path, value.into_owned());
        }
    }
    decoded
}

/// `a[b][]` -> `["a", "b", ""]`. A key without a well-formed bracket suffix
/// is kept whole.
fn split_key(key: &str, max_depth: usize) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };
    if open == 0 || max_depth == 0 {
        return vec![key.to_string()];
    }

    let mut path = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while path.len() <= max_depth {
        let Some(inner) = rest.strip_prefix('[') else {
            break;
        };
        let Some(close) = inner.find(']') else {
            return vec![key.to_string()];
        };
        path.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }

    if rest.is_empty() {
        path
    } else if path.len() > max_depth && rest.starts_with('[') {
        path.push(rest.to_string());
        path
    } else {
        vec![key.to_string()]
    }
}

fn insert(target: &mut Map<String, Value>, path: &[String], value: String) {
    // The value lands on the last segment before an empty one (`a[]`).
    let leaf = path
        .iter()
        .skip(1)
        .position(String::is_empty)
        .unwrap_or(path.len().saturating_sub(1));
    let Some(key) = path.get(leaf) else {
        return;
    };

    let mut target = target;
    for parent in &path[..leaf] {
        let slot = target
            .entry(parent.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(nested) = slot else {
            return;
        };
        target = nested;
    }
    append(target, key, value);
}

/// Repeated keys collect into an array.
fn append(target: &mut Map<String, Value>, key: &str, value: String) {
    match target.get_mut(key) {
        None => {
            target.insert(key.to_string(), Value::String(value));
        }
        Some(Value::Array(items)) => items.push(Value::String(value)),
        Some(existing @ Value::String(_)) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(value)]);
        }
        // A mapping already claimed this key; a bare value cannot join it.
        Some(_) => {}
    }
}
