use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use querycrate::{
    ParseQueryLayer, ParsedQuery, QueryTranslator, TranslatorConfig, parse_query_middleware,
};
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tower::{Layer, ServiceExt, service_fn};

mod common;
use common::{body_json, echo};

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_from_fn_middleware_sets_extension() {
    async fn handler(Extension(parsed): Extension<ParsedQuery>) -> axum::Json<ParsedQuery> {
        axum::Json(parsed)
    }

    let app = Router::new()
        .route("/items", get(handler))
        .layer(middleware::from_fn(parse_query_middleware));

    let response = app
        .oneshot(get_request("/items?filter[age]=5&operator[age]=gt&fields=a,b&skip=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "conditions": {"age": {"gt": "5"}},
            "projection": "a b",
            "options": {"skip": 10, "limit": 0}
        })
    );
}

#[tokio::test]
async fn test_extractor_without_middleware() {
    let app = Router::new().route("/items", get(echo));

    let response = app
        .oneshot(get_request("/items?sort=-createdAt,name&limit=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "projection": null,
            "options": {"sort": "-createdAt name", "skip": 0, "limit": 0}
        })
    );
}

#[tokio::test]
async fn test_extractor_rejects_bad_coercion() {
    let app = Router::new().route("/items", get(echo));

    let response = app
        .oneshot(get_request("/items?filter[age]=old&type[age]=integer"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn test_layer_uses_configured_keys() {
    let config: TranslatorConfig =
        serde_json::from_value(json!({"keys": {"filter": "where", "limit": "take"}})).unwrap();
    let app = Router::new()
        .route("/items", get(echo))
        .layer(ParseQueryLayer::with_translator(QueryTranslator::with_config(config)));

    let response = app
        .oneshot(get_request("/items?where[city]=Geneva&take=3&limit=99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "conditions": {"city": "Geneva"},
            "projection": null,
            "options": {"skip": 0, "limit": 3}
        })
    );
}

#[tokio::test]
async fn test_layer_rejects_without_calling_inner_service() {
    let called = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&called);
    let inner = service_fn(move |_req: Request<Body>| {
        flag.store(true, Ordering::SeqCst);
        async { Ok::<Response, std::convert::Infallible>(StatusCode::OK.into_response()) }
    });

    let response = ParseQueryLayer::new()
        .layer(inner)
        .oneshot(get_request("/items?filter[active]=maybe&type[active]=boolean"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_layer_exposes_parsed_query_to_inner_service() {
    let inner = service_fn(|req: Request<()>| async move {
        let limit = req
            .extensions()
            .get::<ParsedQuery>()
            .map(|parsed| parsed.options.limit);
        Ok::<Response, std::convert::Infallible>(format!("{limit:?}").into_response())
    });

    let response = ParseQueryLayer::new()
        .layer(inner)
        .oneshot(Request::builder().uri("/items?limit=25").body(()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Some(25)");
}

#[tokio::test]
async fn test_layer_propagates_inner_service_error() {
    let inner = service_fn(|_req: Request<()>| async {
        Err::<Response, _>(std::io::Error::other("downstream failed"))
    });

    let result = ParseQueryLayer::new()
        .layer(inner)
        .oneshot(Request::builder().uri("/items?skip=1").body(()).unwrap())
        .await;
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "downstream failed");
}
