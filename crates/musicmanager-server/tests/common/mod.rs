// Shared test utilities for integration tests
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use musicmanager_db::AppState;
use musicmanager_migration::Migrator;
use musicmanager_server::config::ServerConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router over a fresh in-memory SQLite database with the schema applied.
pub async fn test_app() -> Router {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    db.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .unwrap();
    Migrator::up(&db, None).await.unwrap();

    musicmanager_server::app(Arc::new(AppState { db }), &ServerConfig::default())
}

/// Send one request and return the status and decoded JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, None).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Create a record and return its id, looked up by exact name.
pub async fn create(app: &Router, resource: &str, body: Value) -> i64 {
    let name = body["name"].as_str().unwrap().to_string();
    let (status, _) = post(app, &format!("/api/{resource}"), body).await;
    assert_eq!(status, StatusCode::OK, "creating {resource} {name}");
    let (_, list) = get(app, &format!("/api/{resource}")).await;
    list.as_array()
        .unwrap()
        .iter()
        .rev()
        .find(|r| r["name"] == name.as_str())
        .and_then(|r| r["id"].as_i64())
        .unwrap()
}
