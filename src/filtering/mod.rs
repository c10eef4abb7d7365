//! # Query Translation
//!
//! The four parsers that turn a [`RawQuery`](crate::RawQuery) into a
//! [`ParsedQuery`](crate::ParsedQuery). Each one is a pure function over raw
//! JSON values and can be used on its own.
//!
//! ## Query Parameter Examples
//!
//! ### Conditions
//! ```rust,ignore
//! // Equality
//! GET /users?filter[name]=alice
//! // -> {"name": "alice"}
//!
//! // Comparison, with the raw value coerced to a number
//! GET /users?filter[age]=21&operator[age]=gte&type[age]=number
//! // -> {"age": {"gte": 21}}
//!
//! // `eq` is the same as no operator
//! GET /users?filter[age]=21&operator[age]=eq
//! // -> {"age": "21"}
//! ```
//!
//! ### Projection and Sorting
//! ```rust,ignore
//! GET /users?fields=name,email
//! // -> projection "name email"
//!
//! GET /users?sort=-createdAt,name
//! // -> sort "-createdAt name"
//! ```
//!
//! ### Pagination
//! ```rust,ignore
//! GET /users?skip=20&limit=10
//! // -> skip 20, limit 10; anything unparsable becomes 0
//! ```

pub mod conditions;
pub mod pagination;
pub mod projection;
pub mod sort;

pub use conditions::parse_conditions;
pub use pagination::{parse_int, parse_limit, parse_skip};
pub use projection::parse_projection;
pub use sort::parse_sort;

use serde_json::Value;

/// Whether a raw value counts as "given": `null`, `false`, `0` and `""` do
/// not, arrays and mappings always do (even when empty).
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Shared by projection and sort: commas become spaces in strings, empty
/// strings and falsy non-strings are dropped.
fn space_delimited(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(text) => {
            let delimited = text.replace(',', " ");
            if delimited.is_empty() {
                None
            } else {
                Some(Value::String(delimited))
            }
        }
        other if is_truthy(other) => Some(other.clone()),
        _ => None,
    }
}
