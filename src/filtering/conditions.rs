use serde_json::{Map, Value};

use super::is_truthy;
use crate::coerce::Coerce;
use crate::errors::QueryError;
use crate::models::{Condition, Conditions, kind_of};

/// Operator that means plain equality
const EQUALITY_OPERATOR: &str = "eq";

/// Operator for `field`, if one other than equality was given
fn operator_for<'a>(operators: Option<&'a Map<String, Value>>, field: &str) -> Option<&'a str> {
    operators?
        .get(field)?
        .as_str()
        .filter(|op| !op.is_empty() && *op != EQUALITY_OPERATOR)
}

/// Declared type for `field`, if any
fn type_for<'a>(types: Option<&'a Map<String, Value>>, field: &str) -> Option<&'a str> {
    types?.get(field)?.as_str().filter(|ty| !ty.is_empty())
}

/// Build per-field conditions from the `filter`, `operator` and `type` mappings.
///
/// - `filter` absent or anything other than a mapping: `Ok(None)`
/// - `filter` an empty mapping: `Ok(Some(empty))`
/// - `operators` and `types` are optional and ignored unless they are mappings
///
/// Fields keep the order they have in `filter`.
///
/// # Errors
///
/// Returns [`QueryError::Coercion`] if the coercer rejects a typed value.
pub fn parse_conditions<C>(
    filter: Option<&Value>,
    operators: Option<&Value>,
    types: Option<&Value>,
    coercer: &C,
) -> Result<Option<Conditions>, QueryError>
where
    C: Coerce + ?Sized,
{
    let values = match filter {
        None => return Ok(None),
        Some(Value::Object(values)) => values,
        Some(other) => {
            if is_truthy(other) {
                tracing::debug!(found = kind_of(other), "Ignoring filter that is not a mapping");
            }
            return Ok(None);
        }
    };

    let operators = operators.and_then(Value::as_object);
    let types = types.and_then(Value::as_object);

    let mut conditions = Conditions::new();
    for (field, raw) in values {
        let value = match type_for(types, field) {
            Some(ty) => coercer
                .coerce(ty, raw)
                .map_err(|err| QueryError::coercion(field, err))?,
            None => raw.clone(),
        };

        let condition = match operator_for(operators, field) {
            Some(operator) => Condition::Operator {
                operator: operator.to_string(),
                value,
            },
            None => Condition::Eq(value),
        };
        tracing::trace!(field = %field, operator = condition.operator(), "Parsed filter condition");
        conditions.push(field.clone(), condition);
    }

    Ok(Some(conditions))
}
