use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use std::collections::HashMap;
use utoipa::IntoParams;

use crate::config::QueryKeys;
use crate::query_string;

/// Query parameters as handed over by the HTTP layer, before translation.
///
/// Every field is optional and kept as a raw JSON value: the query string
/// decoder produces strings, nested mappings (`filter[age]=5`) and arrays
/// (repeated keys), and each parser decides what it accepts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawQuery {
    /// Field values to filter on, e.g. `filter[age]=5`
    pub filter: Option<Value>,
    /// Comparison operator per field, e.g. `operator[age]=gt`
    pub operator: Option<Value>,
    /// Declared value type per field, e.g. `type[age]=number`
    #[serde(rename = "type")]
    pub types: Option<Value>,
    /// Comma or space separated field selection
    pub fields: Option<Value>,
    /// Comma or space separated sort fields, `-` prefix for descending
    pub sort: Option<Value>,
    /// Number of records to skip
    pub skip: Option<Value>,
    /// Maximum number of records to return
    pub limit: Option<Value>,
}

impl RawQuery {
    /// Pick the recognised parameters out of a decoded query mapping.
    #[must_use]
    pub fn from_map(mut map: Map<String, Value>, keys: &QueryKeys) -> Self {
        Self {
            filter: map.remove(&keys.filter),
            operator: map.remove(&keys.operator),
            types: map.remove(&keys.types),
            fields: map.remove(&keys.fields),
            sort: map.remove(&keys.sort),
            skip: map.remove(&keys.skip),
            limit: map.remove(&keys.limit),
        }
    }

    /// Decode a raw URL query component (without the leading `?`).
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        Self::from_map(query_string::decode(query), &QueryKeys::default())
    }
}

/// Criteria for a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Direct equality; serialises as the bare value
    Eq(Value),
    /// Operator-tagged comparison; serialises as `{ operator: value }`
    Operator { operator: String, value: Value },
}

impl Condition {
    /// Operator name, `"eq"` for direct equality
    #[must_use]
    pub fn operator(&self) -> &str {
        match self {
            Self::Eq(_) => "eq",
            Self::Operator { operator, .. } => operator,
        }
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::Eq(value) | Self::Operator { value, .. } => value,
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Eq(value) => value.serialize(serializer),
            Self::Operator { operator, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(operator, value)?;
                map.end()
            }
        }
    }
}

/// Per-field conditions in the order the fields appeared in the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    entries: Vec<(String, Condition)>,
}

impl Conditions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a condition for a field not yet present.
    pub(crate) fn push(&mut self, field: String, condition: Condition) {
        self.entries.push((field, condition));
    }

    /// Set the condition for `field`, replacing an earlier one in place.
    pub fn insert(&mut self, field: impl Into<String>, condition: Condition) {
        let field = field.into();
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            slot.1 = condition;
        } else {
            self.entries.push((field, condition));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, condition)| condition)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.entries
            .iter()
            .map(|(name, condition)| (name.as_str(), condition))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Conditions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, condition) in &self.entries {
            map.serialize_entry(field, condition)?;
        }
        map.end()
    }
}

/// Sort and pagination options
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryOptions {
    /// Space separated sort fields; omitted when no sort was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    /// Records to skip, `0` when absent or unparsable
    pub skip: i64,
    /// Record limit, `0` when absent or unparsable
    pub limit: i64,
}

/// Result of translating a [`RawQuery`].
///
/// Serialises as `{ "conditions": ..., "projection": ..., "options": ... }`.
/// `conditions` and `options.sort` are left out when absent while
/// `projection` is written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    pub projection: Option<Value>,
    pub options: QueryOptions,
}

/// Documentation of the query parameters understood by the translator.
///
/// This type is not used for extraction (bracketed keys need the decoder in
/// [`query_string`]); it exists so handlers can list the parameters in their
/// `OpenAPI` description:
///
/// ```rust,ignore
/// #[utoipa::path(get, path = "/items", params(querycrate::QueryParams))]
/// async fn list_items(query: querycrate::ParsedQuery) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct QueryParams {
    /// Field values to filter on, written as `filter[field]=value`.
    #[param(style = DeepObject, explode, example = json!({"age": "5", "name": "alice"}))]
    pub filter: Option<HashMap<String, String>>,
    /// Comparison operator per filtered field (`gt`, `gte`, `lt`, `lte`, `ne`, `in`, ...).
    ///
    /// `eq` or a missing entry means direct equality.
    #[param(style = DeepObject, explode, example = json!({"age": "gt"}))]
    pub operator: Option<HashMap<String, String>>,
    /// Value type per filtered field (`string`, `number`, `integer`, `boolean`, `date`, `json`, `array`).
    #[serde(rename = "type")]
    #[param(style = DeepObject, explode, example = json!({"age": "number"}))]
    pub types: Option<HashMap<String, String>>,
    /// Fields to return, separated by commas or spaces.
    ///
    /// Example: `name,email`
    #[param(example = "name,email")]
    pub fields: Option<String>,
    /// Sort fields separated by commas or spaces, prefix `-` for descending.
    ///
    /// Example: `-createdAt,name`
    #[param(example = "-createdAt,name")]
    pub sort: Option<String>,
    /// Number of records to skip.
    #[param(example = "20")]
    pub skip: Option<String>,
    /// Maximum number of records to return, `0` for no limit.
    #[param(example = "10")]
    pub limit: Option<String>,
}

/// Kind name of a JSON value, for error messages
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
