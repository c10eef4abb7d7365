use serde_json::Value;

use super::space_delimited;

/// Parse the field selection.
///
/// Commas become spaces so `fields=name,email` and `fields=name email` select
/// the same fields. An empty string or a falsy value yields `None`, which a
/// [`ParsedQuery`](crate::ParsedQuery) serialises as `null`. Non-string values
/// (repeated `fields` keys) are passed through untouched.
#[must_use]
pub fn parse_projection(value: Option<&Value>) -> Option<Value> {
    space_delimited(value)
}
