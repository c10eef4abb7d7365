#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use querycrate::{ParsedQuery, database, parse_query_middleware};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, QueryTrait, Schema};

pub mod user_entity;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(user_entity::Entity)))
        .await?;

    db.execute_unprepared(
        "INSERT INTO users (name, age, city) VALUES \
         ('alice', 34, 'Lausanne'), \
         ('bob', 19, 'Geneva'), \
         ('carol', 27, 'Lausanne'), \
         ('dave', 45, 'Zurich'), \
         ('erin', 23, 'Geneva')",
    )
    .await?;

    Ok(db)
}

async fn list_users(
    State(db): State<DatabaseConnection>,
    query: ParsedQuery,
) -> Result<Json<Vec<user_entity::Model>>, Response> {
    let mut select = user_entity::Entity::find();
    database::apply_conditions(&query, QueryTrait::query(&mut select))
        .map_err(IntoResponse::into_response)?;
    database::apply_sort(&query, QueryTrait::query(&mut select));
    database::apply_pagination(&query, QueryTrait::query(&mut select));

    let users = select
        .all(&db)
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response())?;
    Ok(Json(users))
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let api = Router::new()
        .route("/users", get(list_users))
        .layer(middleware::from_fn(parse_query_middleware))
        .with_state(db);

    Router::new().nest("/api/v1", api)
}

/// Handler echoing whatever the translator produced
pub async fn echo(query: ParsedQuery) -> Json<ParsedQuery> {
    Json(query)
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
