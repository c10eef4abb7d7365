use serde_json::Value;

/// Read a leading integer the lenient way query strings usually get parsed:
/// leading whitespace and a sign are allowed, a `0x` prefix switches to hex,
/// and reading stops at the first character that is not a digit.
///
/// `"12abc"` is `12`, `"  -3"` is `-3`, `"abc"` and `""` have no value.
/// Numbers are truncated toward zero; repeated keys (arrays) are read as
/// their comma-joined text so the first entry wins. Out of range values
/// saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::String(text) => parse_int_str(text),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(int)
            } else if number.is_u64() {
                Some(i64::MAX)
            } else {
                number.as_f64().map(|float| float.trunc() as i64)
            }
        }
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            parse_int_str(&joined)
        }
        Value::Null | Value::Bool(_) | Value::Object(_) => None,
    }
}

fn parse_int_str(text: &str) -> Option<i64> {
    let mut rest = text.trim_start();
    let negative = if let Some(stripped) = rest.strip_prefix('-') {
        rest = stripped;
        true
    } else {
        rest = rest.strip_prefix('+').unwrap_or(rest);
        false
    };

    let radix = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => {
            rest = hex;
            16
        }
        None => 10,
    };

    let mut magnitude: Option<i64> = None;
    for digit in rest.chars().map_while(|c| c.to_digit(radix)) {
        let current = magnitude.unwrap_or(0);
        magnitude = Some(
            current
                .saturating_mul(i64::from(radix))
                .saturating_add(i64::from(digit)),
        );
    }

    magnitude.map(|n| if negative { n.saturating_neg() } else { n })
}

/// Number of records to skip; `0` when absent, unparsable or zero.
#[must_use]
pub fn parse_skip(value: Option<&Value>) -> i64 {
    value.and_then(parse_int).unwrap_or(0)
}

/// Maximum number of records; `0` when absent, unparsable or zero.
#[must_use]
pub fn parse_limit(value: Option<&Value>) -> i64 {
    value.and_then(parse_int).unwrap_or(0)
}
