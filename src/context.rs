//! Per-request context shared by middleware and the handler.
//!
//! A [`Context`] is an `Arc` handle: the logging middleware keeps one clone,
//! passes another down the chain, and reads the response back after the
//! handler finishes. The response sits behind a mutex that is only ever held
//! for the duration of a single read or write, never across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::middleware::{BoxedErrorHandler, ErrorHandler};
use crate::request::Request;
use crate::response::{ContentType, Response};

/// Everything one request needs: the request itself, the response being
/// built, the matched route and the router's error handler.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    request: Request,
    response: Mutex<Response>,
    route: Option<BoxedHandler>,
    error_handler: BoxedErrorHandler,
}

impl Context {
    /// Creates a context outside of a running server, e.g. to drive a
    /// middleware chain in tests.
    pub fn new(request: Request, error_handler: impl ErrorHandler) -> Self {
        Self::with_route(request, None, Arc::new(error_handler))
    }

    pub(crate) fn with_route(
        request: Request,
        route: Option<BoxedHandler>,
        error_handler: BoxedErrorHandler,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                request,
                response: Mutex::new(Response::new()),
                route,
                error_handler,
            }),
        }
    }

    pub fn request(&self) -> &Request { &self.inner.request }

    /// Shortcut for `ctx.request().param(key)`.
    pub fn param(&self, key: &str) -> Option<&str> { self.inner.request.param(key) }

    pub(crate) fn route(&self) -> Option<&BoxedHandler> { self.inner.route.as_ref() }

    // ── Response accessors ────────────────────────────────────────────────────

    pub fn status(&self) -> StatusCode { self.response().status() }
    pub fn size(&self) -> usize { self.response().size() }
    pub fn committed(&self) -> bool { self.response().committed() }

    /// Runs `f` against the response under the lock.
    pub fn with_response<T>(&self, f: impl FnOnce(&Response) -> T) -> T {
        let res = self.response();
        f(&*res)
    }

    // ── Response writers ──────────────────────────────────────────────────────

    /// Adds a response header. Has no effect once the response is committed.
    pub fn header(&self, name: HeaderName, value: HeaderValue) {
        self.response().insert_header(name, value);
    }

    /// Writes a `text/plain` body.
    pub fn string(&self, status: StatusCode, body: impl Into<String>) -> Result<(), Error> {
        self.response().write(status, Some(ContentType::Text), Bytes::from(body.into()))
    }

    /// Writes a body with an explicit content type.
    pub fn blob(&self, status: StatusCode, content_type: ContentType, body: impl Into<Bytes>) -> Result<(), Error> {
        self.response().write(status, Some(content_type), body.into())
    }

    /// Commits the response with `status` and an empty body.
    pub fn no_content(&self, status: StatusCode) -> Result<(), Error> {
        self.response().write(status, None, Bytes::new())
    }

    // ── Error dispatch ────────────────────────────────────────────────────────

    /// Hands `err` to the router's error handler.
    ///
    /// This is how middleware reports a failure without aborting the chain:
    /// the error handler writes the client response and logs, and the
    /// middleware carries on.
    pub fn error(&self, err: Error) {
        self.inner.error_handler.handle(err, self);
    }

    pub(crate) fn take_response(&self) -> Response {
        std::mem::replace(&mut *self.response(), Response::new())
    }

    fn response(&self) -> MutexGuard<'_, Response> {
        // A poisoned lock only means a handler panicked mid-write; the
        // response state itself is still consistent.
        self.inner.response.lock().unwrap_or_else(|e| e.into_inner())
    }
}
