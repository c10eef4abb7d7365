//! Minimal query translation API with Axum
//!
//! ```bash
//! cargo run --example minimal
//! ```
//!
//! Then visit:
//! - **Translation**: <http://localhost:3000/items?filter[age]=21&operator[age]=gte&type[age]=number&fields=name,email&sort=-age&limit=10>
//! - **OpenAPI**: <http://localhost:3000/openapi.json>

use axum::{Json, Router, routing::get};
use querycrate::{ParseQueryLayer, ParsedQuery, QueryParams};
use utoipa::OpenApi;

/// Echo the translated query
#[utoipa::path(get, path = "/items", params(QueryParams), responses((status = 200, description = "Translated query")))]
async fn list_items(query: ParsedQuery) -> Json<ParsedQuery> {
    Json(query)
}

#[derive(OpenApi)]
#[openapi(paths(list_items))]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "querycrate=debug".into()),
        )
        .init();

    let app = Router::new()
        .route("/items", get(list_items))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .layer(ParseQueryLayer::new());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("Listening on http://localhost:3000/items");
    axum::serve(listener, app).await?;
    Ok(())
}
