//! # tsulog
//!
//! Request/response logging for a minimal hyper-based HTTP framework.
//!
//! Two pieces of middleware, both writing to a [`LogSink`](sink::LogSink)
//! you hand in:
//!
//! - [`request_logger`](middleware::request_logger) logs every request's
//!   wire dump at debug level and a one-line summary of the response at
//!   info level: client address, method, path, status, latency, size.
//! - [`http_error_handler`](middleware::http_error_handler) answers the
//!   client when a handler fails and logs the error with its context.
//!
//! The sink is a three-method trait. [`TracingSink`](sink::TracingSink)
//! forwards to `tracing`; anything else (a JSON writer, a test recorder)
//! just implements the trait.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::{Method, StatusCode};
//! use tsulog::middleware::{http_error_handler, request_logger};
//! use tsulog::sink::TracingSink;
//! use tsulog::{Context, Error, HttpError, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let app = Router::new()
//!         .with(request_logger(TracingSink))
//!         .error_handler(http_error_handler(TracingSink))
//!         .on(Method::GET, "/",            hello)
//!         .on(Method::GET, "/users/{id}",  get_user);
//!
//!     Server::bind("0.0.0.0:1323").serve(app).await
//! }
//!
//! async fn hello(ctx: Context) -> Result<(), Error> {
//!     ctx.string(StatusCode::OK, "Hello, World!\n")
//! }
//!
//! async fn get_user(ctx: Context) -> Result<(), Error> {
//!     match ctx.param("id") {
//!         Some("42") => ctx.string(StatusCode::OK, "alice"),
//!         _ => Err(HttpError::new(StatusCode::NOT_FOUND, "no such user").into()),
//!     }
//! }
//! ```

mod context;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod dump;
pub mod middleware;
pub mod sink;

pub use context::Context;
pub use error::{Error, HttpError};
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, Middleware, from_fn};
pub use request::Request;
pub use response::{ContentType, Response};
pub use router::Router;
pub use server::Server;
