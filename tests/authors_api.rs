//! End-to-end checks of `/api/authors/{author_id}` through the full router.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use shelf_db::{sqlx, AuthorConnection, AuthorRecord, AuthorStore, BookRecord, DbError, Lookup};
use shelf_kernel::{settings::Settings, ModuleRegistry};
use tower::ServiceExt;

/// One author with two books; everything else is missing.
struct OrwellOnly;

struct OrwellConnection;

#[async_trait]
impl AuthorStore for OrwellOnly {
    async fn connect(&self) -> Result<Box<dyn AuthorConnection>, DbError> {
        Ok(Box::new(OrwellConnection))
    }
}

#[async_trait]
impl AuthorConnection for OrwellConnection {
    async fn fetch_author(&mut self, id: i64) -> Lookup<AuthorRecord> {
        if id == 1 {
            Lookup::Found(AuthorRecord {
                name: "George Orwell".to_string(),
                biography: "English novelist and essayist".to_string(),
            })
        } else {
            Lookup::NotFound
        }
    }

    async fn fetch_books(&mut self, author_id: i64) -> Result<Vec<BookRecord>, DbError> {
        if author_id != 1 {
            return Ok(Vec::new());
        }
        Ok(vec![
            BookRecord {
                title: "1984".to_string(),
                year: 1949,
            },
            BookRecord {
                title: "Animal Farm".to_string(),
                year: 1945,
            },
        ])
    }
}

/// Store whose database is down.
struct Unreachable;

#[async_trait]
impl AuthorStore for Unreachable {
    async fn connect(&self) -> Result<Box<dyn AuthorConnection>, DbError> {
        Err(DbError::Connect(sqlx::Error::PoolTimedOut))
    }
}

/// Store whose author query outlives any sensible request timeout.
struct Stalled;

struct StalledConnection;

#[async_trait]
impl AuthorStore for Stalled {
    async fn connect(&self) -> Result<Box<dyn AuthorConnection>, DbError> {
        Ok(Box::new(StalledConnection))
    }
}

#[async_trait]
impl AuthorConnection for StalledConnection {
    async fn fetch_author(&mut self, _id: i64) -> Lookup<AuthorRecord> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Lookup::NotFound
    }

    async fn fetch_books(&mut self, _author_id: i64) -> Result<Vec<BookRecord>, DbError> {
        Ok(Vec::new())
    }
}

fn app(store: Arc<dyn AuthorStore>, settings: &Settings) -> Router {
    let mut registry = ModuleRegistry::new();
    shelf_app::register_all(&mut registry, store);
    shelf_http::build_router(&registry, settings)
}

type Reply = (StatusCode, HeaderMap, Vec<u8>);

async fn send(store: Arc<dyn AuthorStore>, method: Method, uri: &str) -> Reply {
    send_with(store, &Settings::default(), method, uri).await
}

async fn send_with(
    store: Arc<dyn AuthorStore>,
    settings: &Settings,
    method: Method,
    uri: &str,
) -> Reply {
    let response = app(store, settings)
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn existing_author_is_returned_with_books() {
    let (status, headers, body) =
        send(Arc::new(OrwellOnly), Method::GET, "/api/authors/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, OPTIONS, PUT, DELETE"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
    assert_eq!(
        json(&body),
        serde_json::json!({
            "author_id": 1,
            "name": "George Orwell",
            "biography": "English novelist and essayist",
            "books": [
                {"title": "1984", "year": 1949},
                {"title": "Animal Farm", "year": 1945}
            ]
        })
    );
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let store: Arc<dyn AuthorStore> = Arc::new(OrwellOnly);
    let (_, _, first) = send(store.clone(), Method::GET, "/api/authors/1").await;
    let (_, _, second) = send(store, Method::GET, "/api/authors/1").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_author_is_404() {
    let (status, _, body) = send(Arc::new(OrwellOnly), Method::GET, "/api/authors/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, br#"{"error":"author not found"}"#);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let (status, _, body) = send(Arc::new(OrwellOnly), Method::GET, "/api/authors/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, br#"{"error":"invalid author id"}"#);
}

#[tokio::test]
async fn undecodable_id_is_400_envelope() {
    let (status, headers, body) =
        send(Arc::new(OrwellOnly), Method::GET, "/api/authors/%FF").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body, br#"{"error":"invalid author id"}"#);
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let (_, headers, _) = send(Arc::new(OrwellOnly), Method::GET, "/api/authors/999").await;

    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn stalled_query_times_out_as_generic_500() {
    let mut settings = Settings::default();
    settings.server.request_timeout_ms = 50;

    let (status, headers, body) =
        send_with(Arc::new(Stalled), &settings, Method::GET, "/api/authors/1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body, br#"{"error":"something went wrong"}"#);
}

#[tokio::test]
async fn unreachable_store_is_generic_500() {
    let (status, _, body) = send(Arc::new(Unreachable), Method::GET, "/api/authors/1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, br#"{"error":"something went wrong"}"#);
}

#[tokio::test]
async fn options_preflight_is_empty_200_with_cors_headers() {
    let (status, headers, body) =
        send(Arc::new(Unreachable), Method::OPTIONS, "/api/authors/1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn author_route_is_documented() {
    let (status, _, body) =
        send(Arc::new(OrwellOnly), Method::GET, "/docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let spec = json(&body);
    assert!(spec["paths"]["/api/authors/{author_id}"]["get"].is_object());
    assert!(spec["components"]["schemas"]["AuthorWithBooks"].is_object());
}
