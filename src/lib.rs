//! # querycrate
//!
//! Translate HTTP query strings into filter conditions, a field projection,
//! sorting and pagination for a data-access layer.
//!
//! ```rust,ignore
//! // GET /users?filter[age]=21&operator[age]=gte&type[age]=number&fields=name,email&sort=-age&limit=10
//! let parsed = querycrate::parse(&RawQuery::from_query_str(query))?;
//! // {
//! //   "conditions": {"age": {"gte": 21}},
//! //   "projection": "name email",
//! //   "options": {"sort": "-age", "skip": 0, "limit": 10}
//! // }
//! ```
//!
//! See [`middleware`] for Axum integration and [`database`] for applying the
//! result to a Sea-ORM select.

pub mod coerce;
pub mod config;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod middleware;
pub mod models;
pub mod query_string;
pub mod translator;

pub use coerce::{Coerce, ValueCoercer};
pub use config::{QueryKeys, TranslatorConfig};
pub use errors::{CoerceError, QueryError};
pub use middleware::{ParseQueryLayer, ParseQueryService, parse_query_middleware};
pub use models::{Condition, Conditions, ParsedQuery, QueryOptions, QueryParams, RawQuery};
pub use translator::QueryTranslator;

/// Translate `query` with the default coercer and parameter names.
///
/// # Errors
///
/// Returns [`QueryError`] if a typed filter value fails coercion or `filter`
/// is not a mapping.
pub fn parse(query: &RawQuery) -> Result<ParsedQuery, QueryError> {
    QueryTranslator::new().parse(query)
}
