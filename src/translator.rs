use crate::coerce::{Coerce, ValueCoercer};
use crate::config::{QueryKeys, TranslatorConfig};
use crate::errors::QueryError;
use crate::filtering::{parse_conditions, parse_limit, parse_projection, parse_skip, parse_sort};
use crate::models::{Conditions, ParsedQuery, QueryOptions, RawQuery};
use crate::query_string;

/// Translates raw query parameters into a [`ParsedQuery`].
///
/// Holds no per-request state: one translator can serve every request, and
/// the middleware shares it behind an `Arc`.
///
/// ```rust,ignore
/// let translator = QueryTranslator::new();
/// let parsed = translator.parse_query_str("filter[age]=21&operator[age]=gte&type[age]=number")?;
/// assert_eq!(serde_json::to_value(&parsed.conditions)?, json!({"age": {"gte": 21}}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryTranslator<C = ValueCoercer> {
    coercer: C,
    config: TranslatorConfig,
}

impl QueryTranslator {
    /// Translator with the default coercer and parameter names
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: TranslatorConfig) -> Self {
        Self {
            coercer: ValueCoercer,
            config,
        }
    }
}

impl<C: Coerce> QueryTranslator<C> {
    /// Replace the coercer used for `type[field]` declarations
    #[must_use]
    pub fn with_coercer<D: Coerce>(self, coercer: D) -> QueryTranslator<D> {
        QueryTranslator {
            coercer,
            config: self.config,
        }
    }

    #[must_use]
    pub const fn keys(&self) -> &QueryKeys {
        &self.config.keys
    }

    /// Translate already-decoded query parameters.
    ///
    /// # Errors
    ///
    /// See [`parse_conditions`]: a typed value failed coercion, or `filter`
    /// is not a mapping.
    pub fn parse(&self, query: &RawQuery) -> Result<ParsedQuery, QueryError> {
        let parsed = ParsedQuery {
            conditions: parse_conditions(
                query.filter.as_ref(),
                query.operator.as_ref(),
                query.types.as_ref(),
                &self.coercer,
            )?,
            projection: parse_projection(query.fields.as_ref()),
            options: QueryOptions {
                sort: parse_sort(query.sort.as_ref()),
                skip: parse_skip(query.skip.as_ref()),
                limit: parse_limit(query.limit.as_ref()),
            },
        };

        tracing::debug!(
            conditions = parsed.conditions.as_ref().map_or(0, Conditions::len),
            projection = parsed.projection.is_some(),
            sort = parsed.options.sort.is_some(),
            skip = parsed.options.skip,
            limit = parsed.options.limit,
            "Translated query"
        );
        Ok(parsed)
    }

    /// Decode a URL query component with the configured parameter names and
    /// translate it.
    ///
    /// # Errors
    ///
    /// Same as [`QueryTranslator::parse`].
    pub fn parse_query_str(&self, query: &str) -> Result<ParsedQuery, QueryError> {
        let decoded = query_string::decode_with_depth(query, self.config.max_depth);
        let raw = RawQuery::from_map(decoded, self.keys());
        self.parse(&raw)
    }
}
