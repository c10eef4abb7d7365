use sea_orm::{
    Order,
    sea_query::{Alias, SelectStatement},
};
use serde_json::Value;

use super::condition::to_condition;
use crate::errors::QueryError;
use crate::models::ParsedQuery;

/// Whitespace separated field list; repeated keys arrive as arrays of names.
fn field_list(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

/// Split a sort specification into columns and directions.
///
/// `"-createdAt name +age"` gives `createdAt DESC, name ASC, age ASC`.
#[must_use]
pub fn sort_fields(list: &str) -> Vec<(String, Order)> {
    list.split_whitespace()
        .filter_map(|token| {
            let (name, order) = match token.strip_prefix('-') {
                Some(name) => (name, Order::Desc),
                None => (token.strip_prefix('+').unwrap_or(token), Order::Asc),
            };
            (!name.is_empty()).then(|| (name.to_string(), order))
        })
        .collect()
}

/// Fields selected by a projection. Excluded fields (`-password`) cannot be
/// expressed as a column list and are skipped.
#[must_use]
pub fn projection_fields(list: &str) -> Vec<String> {
    list.split_whitespace()
        .filter(|token| !token.starts_with('-'))
        .map(|token| token.strip_prefix('+').unwrap_or(token))
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Add the parsed conditions as the `WHERE` clause.
///
/// # Errors
///
/// Returns [`QueryError::UnsupportedOperator`] for an operator with no SQL
/// counterpart.
pub fn apply_conditions(
    parsed: &ParsedQuery,
    stmt: &mut SelectStatement,
) -> Result<(), QueryError> {
    if let Some(conditions) = &parsed.conditions {
        stmt.cond_where(to_condition(conditions)?);
    }
    Ok(())
}

/// Select the projected columns, if any inclusion fields were given.
pub fn apply_projection(parsed: &ParsedQuery, stmt: &mut SelectStatement) {
    let Some(projection) = &parsed.projection else {
        return;
    };
    let fields = projection_fields(&field_list(projection));
    if !fields.is_empty() {
        stmt.columns(fields.into_iter().map(Alias::new));
    }
}

pub fn apply_sort(parsed: &ParsedQuery, stmt: &mut SelectStatement) {
    let Some(sort) = &parsed.options.sort else {
        return;
    };
    for (column, order) in sort_fields(&field_list(sort)) {
        stmt.order_by(Alias::new(column), order);
    }
}

/// Apply `skip` and `limit`. Zero or negative values mean "not set".
pub fn apply_pagination(parsed: &ParsedQuery, stmt: &mut SelectStatement) {
    if let Ok(skip) = u64::try_from(parsed.options.skip)
        && skip > 0
    {
        stmt.offset(skip);
    }
    if let Ok(limit) = u64::try_from(parsed.options.limit)
        && limit > 0
    {
        stmt.limit(limit);
    }
}

/// Apply conditions, projection, sorting and pagination.
///
/// For Sea-ORM selects, which already list every entity column, use the
/// individual functions and skip [`apply_projection`].
///
/// # Errors
///
/// See [`apply_conditions`].
pub fn apply_to_select(parsed: &ParsedQuery, stmt: &mut SelectStatement) -> Result<(), QueryError> {
    apply_conditions(parsed, stmt)?;
    apply_projection(parsed, stmt);
    apply_sort(parsed, stmt);
    apply_pagination(parsed, stmt);
    tracing::trace!("Applied parsed query to select statement");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryOptions;
    use crate::translator::QueryTranslator;
    use sea_orm::sea_query::{Query, SqliteQueryBuilder};
    use serde_json::json;

    fn render(parsed: &ParsedQuery) -> String {
        let mut stmt = Query::select().from(Alias::new("users")).to_owned();
        apply_to_select(parsed, &mut stmt).unwrap();
        stmt.to_string(SqliteQueryBuilder)
    }

    #[test]
    fn test_sort_fields() {
        assert_eq!(
            sort_fields("-createdAt name +age"),
            vec![
                ("createdAt".to_string(), Order::Desc),
                ("name".to_string(), Order::Asc),
                ("age".to_string(), Order::Asc),
            ]
        );
        assert!(sort_fields("  - ").is_empty());
    }

    #[test]
    fn test_projection_fields_skip_exclusions() {
        assert_eq!(
            projection_fields("name -password +email"),
            vec!["name".to_string(), "email".to_string()]
        );
        assert!(projection_fields("-password").is_empty());
    }

    #[test]
    fn test_full_statement() {
        let parsed = QueryTranslator::new()
            .parse_query_str(
                "filter[age]=21&operator[age]=gte&type[age]=integer&fields=id,name&sort=-age,name&skip=20&limit=10",
            )
            .unwrap();
        let sql = render(&parsed);
        assert!(sql.starts_with(r#"SELECT "id", "name" FROM "users""#), "{sql}");
        assert!(sql.contains(r#"WHERE "age" >= 21"#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "age" DESC, "name" ASC"#), "{sql}");
        assert!(sql.contains("LIMIT 10"), "{sql}");
        assert!(sql.contains("OFFSET 20"), "{sql}");
    }

    #[test]
    fn test_negative_and_zero_pagination_ignored() {
        let parsed = ParsedQuery {
            projection: Some(json!("id")),
            options: QueryOptions {
                skip: -5,
                limit: 0,
                ..QueryOptions::default()
            },
            ..ParsedQuery::default()
        };
        let sql = render(&parsed);
        assert!(!sql.contains("LIMIT"), "{sql}");
        assert!(!sql.contains("OFFSET"), "{sql}");
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn test_repeated_sort_keys() {
        let parsed = ParsedQuery {
            projection: Some(json!(["id"])),
            options: QueryOptions {
                sort: Some(json!(["-age", "name"])),
                ..QueryOptions::default()
            },
            ..ParsedQuery::default()
        };
        let sql = render(&parsed);
        assert!(sql.contains(r#"ORDER BY "age" DESC, "name" ASC"#), "{sql}");
    }
}
