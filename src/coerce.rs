//! # Value Coercion
//!
//! Query strings only carry text, so `filter[age]=5` arrives as `"5"`. A
//! `type[age]=number` entry asks the translator to convert the raw value
//! before it becomes a condition. The conversion itself is pluggable through
//! the [`Coerce`] trait; [`ValueCoercer`] is the default.
//!
//! ## Supported types (case-insensitive)
//!
//! | Type                             | Result                                            |
//! |----------------------------------|---------------------------------------------------|
//! | `string`                         | the value as text                                 |
//! | `number`, `float`, `double`      | JSON number, integer when the text is integral    |
//! | `int`, `integer`                 | JSON integer (decimal part rejected)              |
//! | `boolean`, `bool`                | `true`/`1`/`yes`/`on`, `false`/`0`/`no`/`off`     |
//! | `date`, `datetime`               | RFC 3339 string (`YYYY-MM-DD` means midnight UTC) |
//! | `json`                           | the text parsed as JSON                           |
//! | `array`                          | comma separated items as strings                  |
//! | `null`                           | `null`                                            |
//!
//! Arrays (repeated keys) are coerced element by element.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Number, Value};

use crate::errors::CoerceError;

/// Converts a raw query value into the declared type
pub trait Coerce {
    /// # Errors
    ///
    /// Returns [`CoerceError`] if the type is unknown or the value does not fit it.
    fn coerce(&self, ty: &str, raw: &Value) -> Result<Value, CoerceError>;
}

impl<F> Coerce for F
where
    F: Fn(&str, &Value) -> Result<Value, CoerceError>,
{
    fn coerce(&self, ty: &str, raw: &Value) -> Result<Value, CoerceError> {
        self(ty, raw)
    }
}

/// Default [`Coerce`] implementation, see the module docs for the type table
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCoercer;

impl Coerce for ValueCoercer {
    fn coerce(&self, ty: &str, raw: &Value) -> Result<Value, CoerceError> {
        let kind = ty.trim().to_ascii_lowercase();
        if let Value::Array(items) = raw
            && kind != "array"
            && kind != "json"
        {
            return items
                .iter()
                .map(|item| coerce_scalar(ty, &kind, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        }
        coerce_scalar(ty, &kind, raw)
    }
}

fn coerce_scalar(ty: &str, kind: &str, raw: &Value) -> Result<Value, CoerceError> {
    let invalid = || CoerceError::InvalidValue {
        ty: ty.to_string(),
        value: text_of(raw),
    };

    match kind {
        "string" => Ok(Value::String(text_of(raw))),
        "number" | "float" | "double" => match raw {
            Value::Number(_) => Ok(raw.clone()),
            _ => parse_number(&text_of(raw)).ok_or_else(invalid),
        },
        "int" | "integer" => match raw {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(raw.clone()),
            _ => text_of(raw)
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid()),
        },
        "boolean" | "bool" => match raw {
            Value::Bool(_) => Ok(raw.clone()),
            _ => parse_bool(&text_of(raw)).map(Value::Bool).ok_or_else(invalid),
        },
        "date" | "datetime" => parse_date(&text_of(raw))
            .map(|date| Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
            .ok_or_else(invalid),
        "json" => match raw {
            Value::String(text) => serde_json::from_str(text).map_err(|_| invalid()),
            _ => Ok(raw.clone()),
        },
        "array" => match raw {
            Value::Array(_) => Ok(raw.clone()),
            _ => Ok(Value::Array(
                text_of(raw)
                    .split(',')
                    .map(|item| Value::String(item.trim().to_string()))
                    .collect(),
            )),
        },
        "null" => Ok(Value::Null),
        _ => Err(CoerceError::UnknownType { ty: ty.to_string() }),
    }
}

/// Text form of a value; strings are taken verbatim
fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::from(int));
    }
    let float = trimmed.parse::<f64>().ok()?;
    Number::from_f64(float).map(Value::Number)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce(ty: &str, raw: Value) -> Result<Value, CoerceError> {
        ValueCoercer.coerce(ty, &raw)
    }

    #[test]
    fn test_number() {
        assert_eq!(coerce("number", json!("5")).unwrap(), json!(5));
        assert_eq!(coerce("Number", json!(" 2.5 ")).unwrap(), json!(2.5));
        assert_eq!(coerce("float", json!(7)).unwrap(), json!(7));
        assert!(coerce("number", json!("five")).is_err());
    }

    #[test]
    fn test_integer_rejects_fraction() {
        assert_eq!(coerce("integer", json!("-12")).unwrap(), json!(-12));
        assert_eq!(
            coerce("int", json!("1.5")),
            Err(CoerceError::InvalidValue {
                ty: "int".to_string(),
                value: "1.5".to_string(),
            })
        );
    }

    #[test]
    fn test_boolean() {
        assert_eq!(coerce("boolean", json!("true")).unwrap(), json!(true));
        assert_eq!(coerce("bool", json!("0")).unwrap(), json!(false));
        assert_eq!(coerce("BOOLEAN", json!("Off")).unwrap(), json!(false));
        assert!(coerce("boolean", json!("maybe")).is_err());
    }

    #[test]
    fn test_date_normalised_to_utc() {
        assert_eq!(
            coerce("date", json!("2024-01-15")).unwrap(),
            json!("2024-01-15T00:00:00Z")
        );
        assert_eq!(
            coerce("datetime", json!("2024-01-15T12:30:00+02:00")).unwrap(),
            json!("2024-01-15T10:30:00Z")
        );
        assert!(coerce("date", json!("yesterday")).is_err());
    }

    #[test]
    fn test_string_and_null() {
        assert_eq!(coerce("string", json!(5)).unwrap(), json!("5"));
        assert_eq!(coerce("null", json!("anything")).unwrap(), Value::Null);
    }

    #[test]
    fn test_json_and_array() {
        assert_eq!(
            coerce("json", json!(r#"{"a":[1,2]}"#)).unwrap(),
            json!({"a": [1, 2]})
        );
        assert!(coerce("json", json!("{broken")).is_err());
        assert_eq!(
            coerce("array", json!("a, b,c")).unwrap(),
            json!(["a", "b", "c"])
        );
    }

    #[test]
    fn test_repeated_values_coerced_element_wise() {
        assert_eq!(
            coerce("number", json!(["1", "2.5"])).unwrap(),
            json!([1, 2.5])
        );
        assert!(coerce("number", json!(["1", "x"])).is_err());
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(
            coerce("money", json!("5")),
            Err(CoerceError::UnknownType {
                ty: "money".to_string()
            })
        );
    }

    #[test]
    fn test_closure_coercer() {
        let upper =
            |_: &str, raw: &Value| Ok::<_, CoerceError>(Value::String(text_of(raw).to_uppercase()));
        assert_eq!(upper.coerce("any", &json!("abc")).unwrap(), json!("ABC"));
    }
}
