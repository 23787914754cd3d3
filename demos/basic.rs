//! Minimal tsulog example: the logger middleware in front of a few routes.
//!
//! Run with:
//!   RUST_LOG=tsulog=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:1323/
//!   curl -H 'X-Real-IP: 1.2.3.4' http://localhost:1323/users/42
//!   curl http://localhost:1323/users/7                        # 404, logged
//!   curl -X POST http://localhost:1323/users -d '{"name":"alice"}'
//!   curl http://localhost:1323/boom                           # 500, logged

use http::{Method, StatusCode};
use tracing_subscriber::EnvFilter;
use tsulog::middleware::{http_error_handler, request_logger};
use tsulog::sink::TracingSink;
use tsulog::{ContentType, Context, Error, HttpError, Router, Server};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Router::new()
        .with(request_logger(TracingSink))
        .error_handler(http_error_handler(TracingSink))
        .on(Method::GET,  "/",           hello)
        .on(Method::GET,  "/users/{id}", get_user)
        .on(Method::POST, "/users",      create_user)
        .on(Method::GET,  "/boom",       boom);

    Server::bind("0.0.0.0:1323").serve(app).await
}

async fn hello(ctx: Context) -> Result<(), Error> {
    ctx.string(StatusCode::OK, "Hello, World!\n")
}

// GET /users/{id}: only user 42 exists.
async fn get_user(ctx: Context) -> Result<(), Error> {
    match ctx.param("id") {
        Some("42") => ctx.blob(StatusCode::OK, ContentType::Json, r#"{"id":"42","name":"alice"}"#),
        Some(id) => Err(HttpError::new(StatusCode::NOT_FOUND, format!("user {id} not found")).into()),
        None => Err(HttpError::from_status(StatusCode::BAD_REQUEST).into()),
    }
}

// POST /users: the error handler logs the placeholder, not this body.
async fn create_user(ctx: Context) -> Result<(), Error> {
    if ctx.request().body().is_empty() {
        return Err(HttpError::new(StatusCode::BAD_REQUEST, "empty body").into());
    }
    ctx.header(http::header::LOCATION, http::HeaderValue::from_static("/users/99"));
    ctx.blob(StatusCode::CREATED, ContentType::Json, r#"{"id":"99"}"#)
}

async fn boom(_ctx: Context) -> Result<(), Error> {
    Err(Error::other("database unreachable"))
}
