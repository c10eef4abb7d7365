//! # Axum Integration
//!
//! Three ways to get a [`ParsedQuery`] into a handler:
//!
//! - [`parse_query_middleware`]: a plain function for
//!   [`axum::middleware::from_fn`], using the default translator.
//! - [`ParseQueryLayer`]: a tower layer carrying a configured
//!   [`QueryTranslator`].
//! - The [`ParsedQuery`] extractor, which reuses what either middleware stored
//!   in the request extensions and otherwise translates the URI itself.
//!
//! Both middlewares store the result in the request extensions and then hand
//! the request on. A translation error answers `400 Bad Request` without
//! calling the inner service.
//!
//! ```rust,ignore
//! use axum::{Router, middleware, routing::get};
//! use querycrate::{ParsedQuery, ParseQueryLayer, parse_query_middleware};
//!
//! async fn list(query: ParsedQuery) -> String {
//!     format!("{:?}", query.options)
//! }
//!
//! let app = Router::new()
//!     .route("/items", get(list))
//!     .layer(middleware::from_fn(parse_query_middleware));
//!
//! // or, with a configured translator
//! let app = Router::new()
//!     .route("/items", get(list))
//!     .layer(ParseQueryLayer::with_translator(translator));
//! ```

use axum::{
    extract::{FromRequestParts, Request},
    http::{self, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    future::{self, Future},
    pin::Pin,
    sync::{Arc, LazyLock},
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::coerce::{Coerce, ValueCoercer};
use crate::errors::QueryError;
use crate::models::ParsedQuery;
use crate::translator::QueryTranslator;

static DEFAULT_TRANSLATOR: LazyLock<QueryTranslator> = LazyLock::new(QueryTranslator::new);

fn query_of(uri: &http::Uri) -> &str {
    uri.query().unwrap_or_default()
}

/// Translate the request's query string and store the result in the request
/// extensions, then run the rest of the stack.
///
/// # Errors
///
/// Returns the [`QueryError`] (rendered as `400 Bad Request`) when the query
/// cannot be translated; the next handler is not called in that case.
pub async fn parse_query_middleware(mut req: Request, next: Next) -> Result<Response, QueryError> {
    let parsed = DEFAULT_TRANSLATOR.parse_query_str(query_of(req.uri()))?;
    req.extensions_mut().insert(parsed);
    Ok(next.run(req).await)
}

/// Layer that translates the query string with a shared [`QueryTranslator`].
pub struct ParseQueryLayer<C = ValueCoercer> {
    translator: Arc<QueryTranslator<C>>,
}

impl ParseQueryLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_translator(QueryTranslator::new())
    }
}

impl Default for ParseQueryLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ParseQueryLayer<C> {
    #[must_use]
    pub fn with_translator(translator: QueryTranslator<C>) -> Self {
        Self {
            translator: Arc::new(translator),
        }
    }
}

impl<C> Clone for ParseQueryLayer<C> {
    fn clone(&self) -> Self {
        Self {
            translator: Arc::clone(&self.translator),
        }
    }
}

impl<S, C> Layer<S> for ParseQueryLayer<C> {
    type Service = ParseQueryService<S, C>;

    fn layer(&self, inner: S) -> Self::Service {
        ParseQueryService {
            inner,
            translator: Arc::clone(&self.translator),
        }
    }
}

/// Service produced by [`ParseQueryLayer`].
///
/// Errors from the inner service are returned unchanged to the caller.
pub struct ParseQueryService<S, C = ValueCoercer> {
    inner: S,
    translator: Arc<QueryTranslator<C>>,
}

impl<S: Clone, C> Clone for ParseQueryService<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            translator: Arc::clone(&self.translator),
        }
    }
}

impl<S, C, B> Service<http::Request<B>> for ParseQueryService<S, C>
where
    S: Service<http::Request<B>, Response = Response>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    C: Coerce,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        match self.translator.parse_query_str(query_of(req.uri())) {
            Ok(parsed) => {
                req.extensions_mut().insert(parsed);
                Box::pin(self.inner.call(req))
            }
            Err(err) => Box::pin(future::ready(Ok(err.into_response()))),
        }
    }
}

impl<S> FromRequestParts<S> for ParsedQuery
where
    S: Send + Sync,
{
    type Rejection = QueryError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(parsed) = parts.extensions.get::<Self>() {
            return Ok(parsed.clone());
        }
        DEFAULT_TRANSLATOR.parse_query_str(query_of(&parts.uri))
    }
}
