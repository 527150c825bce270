//! API tests against the router over an in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookstore_server::{
    api,
    models::{Permission, UserClaims},
    services::Services,
    AppConfig, AppState,
};

fn app() -> (Router, String) {
    let config = AppConfig::default();
    let secret = config.auth.jwt_secret.clone();
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::in_memory()),
    };
    (api::router(state), secret)
}

fn token(secret: &str, permissions: &[Permission]) -> String {
    UserClaims::new("admin", permissions, 1)
        .create_token(secret)
        .expect("Failed to create token")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();

    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_missing_token() {
    let (app, _) = app();
    let (status, _) = send(&app, "GET", "/api/v1/authors", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token() {
    let (app, _) = app();
    let bad = token("some-other-secret", &Permission::all());
    let (status, _) = send(&app, "GET", "/api/v1/authors", Some(&bad), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_permission() {
    let (app, secret) = app();
    let reader = token(&secret, &[Permission::Authors]);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/authors",
        Some(&reader),
        Some(json!({ "name": "Orwell", "birth_date": "1903-06-25" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn test_author_lifecycle() {
    let (app, secret) = app();
    let admin = token(&secret, &Permission::all());

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/authors",
        Some(&admin),
        Some(json!({
            "name": "George Orwell",
            "birth_date": "1903-06-25",
            "short_bio": "English novelist"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "George Orwell");
    let id = created["id"].as_str().expect("No id in response").to_string();

    let (status, fetched) = send(&app, "GET", &format!("/api/v1/authors/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/authors/{}", id),
        Some(&admin),
        Some(json!({ "name": "Eric Blair", "birth_date": "1903-06-25" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = send(&app, "GET", &format!("/api/v1/authors/{}", id), Some(&admin), None).await;
    assert_eq!(fetched["name"], "Eric Blair");
    assert_eq!(fetched["short_bio"], Value::Null);

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/authors/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/v1/authors/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_duplicate_author_conflict() {
    let (app, secret) = app();
    let admin = token(&secret, &Permission::all());
    let author = json!({ "name": "Tolkien", "birth_date": "1892-01-03" });

    let (status, _) = send(&app, "POST", "/api/v1/authors", Some(&admin), Some(author.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/v1/authors", Some(&admin), Some(author)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AuthorAlreadyExists");
}

#[tokio::test]
async fn test_blank_author_name() {
    let (app, secret) = app();
    let admin = token(&secret, &Permission::all());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/authors",
        Some(&admin),
        Some(json!({ "name": "   ", "birth_date": "1892-01-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidArgument");
}

#[tokio::test]
async fn test_list_authors_query() {
    let (app, secret) = app();
    let admin = token(&secret, &Permission::all());

    for name in ["Tolkien", "Orwell", "Tolstoy"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/authors",
            Some(&admin),
            Some(json!({ "name": name, "birth_date": "1900-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(
        &app,
        "GET",
        "/api/v1/authors?filter=tol&sort=name%20desc&take=1",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 2);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["items"][0]["name"], "Tolstoy");

    let (status, _) = send(&app, "GET", "/api/v1/authors?sort=id;drop", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_books_with_author_lookup() {
    let (app, secret) = app();
    let admin = token(&secret, &Permission::all());

    let (_, author) = send(
        &app,
        "POST",
        "/api/v1/authors",
        Some(&admin),
        Some(json!({ "name": "Aldous Huxley", "birth_date": "1894-07-26" })),
    )
    .await;
    let author_id = author["id"].as_str().expect("No id in response").to_string();

    let (status, lookup) = send(&app, "GET", "/api/v1/books/author-lookup", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup[0]["name"], "Aldous Huxley");

    let (status, book) = send(
        &app,
        "POST",
        "/api/v1/books",
        Some(&admin),
        Some(json!({
            "name": "Brave New World",
            "book_type": "dystopia",
            "publish_date": "1932-01-01",
            "price": 19.84,
            "author_id": author_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["author_name"], "Aldous Huxley");

    let (status, page) = send(&app, "GET", "/api/v1/books", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["items"][0]["name"], "Brave New World");
    assert_eq!(page["items"][0]["book_type"], "dystopia");
}
