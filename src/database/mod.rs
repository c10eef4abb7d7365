//! # Sea-ORM Binding
//!
//! Applies a [`ParsedQuery`](crate::ParsedQuery) to a `sea_query`
//! [`SelectStatement`](sea_orm::sea_query::SelectStatement). Sea-ORM selects
//! expose their statement through `QueryTrait::query`, so the same functions
//! work on `Entity::find()`:
//!
//! ```rust,ignore
//! use sea_orm::{EntityTrait, QueryTrait};
//!
//! let mut select = users::Entity::find();
//! querycrate::database::apply_conditions(&parsed, select.query())?;
//! querycrate::database::apply_sort(&parsed, select.query());
//! querycrate::database::apply_pagination(&parsed, select.query());
//! let rows = select.all(&db).await?;
//! ```
//!
//! ## Operators
//!
//! | Operator       | SQL                                          |
//! |----------------|----------------------------------------------|
//! | `eq`, none     | `=` (`IS NULL` for `null`)                   |
//! | `ne`, `neq`    | `<>` (`IS NOT NULL` for `null`)              |
//! | `gt`, `gte`    | `>`, `>=`                                    |
//! | `lt`, `lte`    | `<`, `<=`                                    |
//! | `in`, `nin`    | `IN`, `NOT IN` (arrays or comma lists)       |
//! | `like`         | `LIKE`, wrapped in `%` unless it has one     |
//! | `exists`       | `IS NOT NULL` / `IS NULL`                    |
//!
//! A leading `$` is accepted (`$gt`), so Mongo-style operator names work too.

pub mod condition;
pub mod select;

pub use condition::{condition_expr, to_condition};
pub use select::{
    apply_conditions, apply_pagination, apply_projection, apply_sort, apply_to_select,
    projection_fields, sort_fields,
};
