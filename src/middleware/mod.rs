//! Middleware layer.
//!
//! Two pieces, both taking the [`LogSink`](crate::sink::LogSink) they write to:
//!
//! - [`request_logger`] — wraps the handler chain; logs the raw request at
//!   debug level and a one-line response summary at info level.
//! - [`http_error_handler`] — the router's error handler; turns an
//!   [`Error`] into a client response and an error-level log event.
//!
//! ```rust,no_run
//! use tsulog::middleware::{http_error_handler, request_logger};
//! use tsulog::sink::TracingSink;
//! use tsulog::Router;
//!
//! let app = Router::new()
//!     .with(request_logger(TracingSink))
//!     .error_handler(http_error_handler(TracingSink));
//! ```

mod error_handler;
mod logger;

use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;

pub use error_handler::{NON_GET_PLACEHOLDER, default_error_handler, http_error_handler};
pub use logger::request_logger;

/// Called by the framework with every error a request produces.
///
/// Any `Fn(Error, &Context)` qualifies. Implementations are terminal: they
/// write what they can to the response and report, but never fail.
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(&self, err: Error, ctx: &Context);
}

impl<F> ErrorHandler for F
where
    F: Fn(Error, &Context) + Send + Sync + 'static,
{
    fn handle(&self, err: Error, ctx: &Context) {
        self(err, ctx)
    }
}

pub(crate) type BoxedErrorHandler = Arc<dyn ErrorHandler>;
