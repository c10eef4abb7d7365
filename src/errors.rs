//! # Error Handling
//!
//! Translation is a pure transform, so the only thing that can go wrong while
//! parsing a query is a declared field type that cannot be applied to the raw
//! value ([`CoerceError`]).
//!
//! A second error, [`QueryError::UnsupportedOperator`], is raised when parsed
//! conditions are bound to a `sea_query` condition.
//!
//! [`QueryError`] implements [`IntoResponse`] so the middleware and the
//! extractor can reject a request with `400 Bad Request`. Details are logged
//! with the `tracing` crate; set up a subscriber to see them:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Failure of a [`Coerce`](crate::coerce::Coerce) implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// The declared type is not known to the coercer
    UnknownType {
        /// Type name as given in the query (e.g. `type[age]=money`)
        ty: String,
    },

    /// The raw value cannot be represented as the declared type
    InvalidValue {
        /// Declared type
        ty: String,
        /// Raw value, rendered for the message
        value: String,
    },
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { ty } => write!(f, "unknown value type '{ty}'"),
            Self::InvalidValue { ty, value } => {
                write!(f, "value '{value}' cannot be converted to type '{ty}'")
            }
        }
    }
}

impl std::error::Error for CoerceError {}

/// Error produced while translating or binding a query
#[derive(Debug)]
pub enum QueryError {
    /// A value failed coercion to its declared type
    Coercion {
        /// Field whose value failed
        field: String,
        /// Error reported by the coercer
        source: CoerceError,
    },

    /// A condition uses an operator the database binding cannot express
    UnsupportedOperator {
        /// Field the condition applies to
        field: String,
        /// Operator name as given in the query
        operator: String,
    },
}

impl QueryError {
    pub(crate) fn coercion(field: impl Into<String>, source: CoerceError) -> Self {
        Self::Coercion {
            field: field.into(),
            source,
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Coercion { .. } | Self::UnsupportedOperator { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coercion { field, source } => write!(f, "invalid filter '{field}': {source}"),
            Self::UnsupportedOperator { field, operator } => {
                write!(f, "unsupported operator '{operator}' on filter '{field}'")
            }
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Coercion { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error response sent to clients
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(
            error = %self,
            status = %status,
            "Rejected query string"
        );

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
