use sea_orm::{
    Condition,
    sea_query::{Alias, Expr, SimpleExpr, Value as SqlValue},
};
use serde_json::Value;

use crate::errors::QueryError;
use crate::filtering::is_truthy;
use crate::models::{Condition as FieldCondition, Conditions};

/// Convert a JSON scalar to a bind value. Arrays and mappings are bound as
/// their JSON text.
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::String(None),
        Value::Bool(flag) => SqlValue::from(*flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                SqlValue::from(int)
            } else if let Some(uint) = number.as_u64() {
                SqlValue::from(uint)
            } else {
                SqlValue::from(number.as_f64().unwrap_or_default())
            }
        }
        Value::String(text) => SqlValue::from(text.clone()),
        other => SqlValue::from(other.to_string()),
    }
}

/// Items for `IN` / `NOT IN`: array entries, or a comma separated string
fn list_values(value: &Value) -> Vec<SqlValue> {
    match value {
        Value::Array(items) => items.iter().map(to_sql_value).collect(),
        Value::String(text) => text
            .split(',')
            .map(|item| SqlValue::from(item.trim().to_string()))
            .collect(),
        other => vec![to_sql_value(other)],
    }
}

fn like_pattern(value: &Value) -> String {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if text.contains('%') {
        text
    } else {
        format!("%{text}%")
    }
}

fn wants_existing(value: &Value) -> bool {
    match value {
        Value::String(text) => !matches!(text.trim(), "" | "0" | "false"),
        other => is_truthy(other),
    }
}

/// Build the SQL expression for one field condition.
///
/// # Errors
///
/// Returns [`QueryError::UnsupportedOperator`] for operators outside the
/// table in the [module docs](super).
pub fn condition_expr(field: &str, condition: &FieldCondition) -> Result<SimpleExpr, QueryError> {
    let column = Expr::col(Alias::new(field));
    let value = condition.value();
    let operator = condition.operator();

    let expr = match operator.strip_prefix('$').unwrap_or(operator) {
        "eq" if value.is_null() => column.is_null(),
        "eq" => column.eq(to_sql_value(value)),
        "ne" | "neq" if value.is_null() => column.is_not_null(),
        "ne" | "neq" => column.ne(to_sql_value(value)),
        "gt" => column.gt(to_sql_value(value)),
        "gte" => column.gte(to_sql_value(value)),
        "lt" => column.lt(to_sql_value(value)),
        "lte" => column.lte(to_sql_value(value)),
        "in" => column.is_in(list_values(value)),
        "nin" => column.is_not_in(list_values(value)),
        "like" => column.like(like_pattern(value)),
        "exists" if wants_existing(value) => column.is_not_null(),
        "exists" => column.is_null(),
        _ => {
            return Err(QueryError::UnsupportedOperator {
                field: field.to_string(),
                operator: operator.to_string(),
            });
        }
    };
    Ok(expr)
}

/// AND together every field condition.
///
/// # Errors
///
/// See [`condition_expr`].
pub fn to_condition(conditions: &Conditions) -> Result<Condition, QueryError> {
    conditions
        .iter()
        .try_fold(Condition::all(), |all, (field, condition)| {
            Ok(all.add(condition_expr(field, condition)?))
        })
}
