use serde_json::Value;

use super::space_delimited;

/// Parse the sort specification.
///
/// Same comma handling as [`parse_projection`](super::parse_projection), but
/// an empty result means "no sort requested" and is left out of the
/// serialised [`QueryOptions`](crate::QueryOptions) instead of being `null`.
#[must_use]
pub fn parse_sort(value: Option<&Value>) -> Option<Value> {
    space_delimited(value)
}
