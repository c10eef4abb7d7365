//! Translator configuration.
//!
//! Both types deserialise with serde, so they can live in whatever config
//! file the application already loads; missing keys fall back to the defaults.
//!
//! ```rust,ignore
//! let config: TranslatorConfig = serde_json::from_str(r#"{"keys": {"filter": "where"}}"#)?;
//! let translator = QueryTranslator::with_config(config);
//! ```

use serde::Deserialize;

use crate::query_string;

/// Names of the query parameters the translator reads
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryKeys {
    pub filter: String,
    pub operator: String,
    #[serde(rename = "type")]
    pub types: String,
    pub fields: String,
    pub sort: String,
    pub skip: String,
    pub limit: String,
}

impl Default for QueryKeys {
    fn default() -> Self {
        Self {
            filter: "filter".to_string(),
            operator: "operator".to_string(),
            types: "type".to_string(),
            fields: "fields".to_string(),
            sort: "sort".to_string(),
            skip: "skip".to_string(),
            limit: "limit".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub keys: QueryKeys,
    /// Bracket segments decoded into nested mappings; deeper segments stay
    /// part of a literal key
    pub max_depth: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            keys: QueryKeys::default(),
            max_depth: query_string::DEFAULT_MAX_DEPTH,
        }
    }
}
