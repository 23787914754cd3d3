//! Outgoing response state.
//!
//! Handlers never build a [`Response`] by hand. They write through the
//! [`Context`](crate::Context) (`ctx.string(..)`, `ctx.blob(..)`), which fills
//! in the response owned by that request. Once the server sends it, the
//! response is gone. Middleware can read `status`, `size` and `committed` at
//! any point.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

use crate::error::Error;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`Context::blob`](crate::Context::blob).
pub enum ContentType {
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream  (binary / file download)
    Text,         // text/plain; charset=utf-8
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// The response being assembled for one request.
///
/// Starts as `200 OK` with no body. The first body write commits it; a
/// committed response refuses further writes with [`Error::Committed`]
/// rather than appending a second body to the first.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    committed: bool,
}

impl Response {
    pub(crate) fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            committed: false,
        }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Number of body bytes written.
    pub fn size(&self) -> usize { self.body.len() }

    /// `true` once a body has been written for this request.
    pub fn committed(&self) -> bool { self.committed }

    /// Adds a header. Ignored once the response is committed.
    pub(crate) fn insert_header(&mut self, name: http::HeaderName, value: HeaderValue) {
        if !self.committed {
            self.headers.append(name, value);
        }
    }

    pub(crate) fn write(
        &mut self,
        status: StatusCode,
        content_type: Option<ContentType>,
        body: Bytes,
    ) -> Result<(), Error> {
        if self.committed {
            return Err(Error::Committed);
        }
        if let Some(content_type) = content_type {
            self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
        }
        self.status = status;
        self.body = body;
        self.committed = true;
        Ok(())
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}
