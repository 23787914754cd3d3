//! Unified error type.

use std::fmt;

use http::StatusCode;

/// The error type returned by handlers and by the server itself.
///
/// A handler that fails returns one of these; the framework hands it to the
/// router's error handler, which decides what the client sees. Only
/// [`Error::Http`] carries a status code of its own, every other variant is
/// answered with `500 Internal Server Error`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error with an explicit HTTP status and client-facing message.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Binding, accepting or writing on a socket failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The request body could not be read off the connection.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// A body was written to a response that had already been written.
    #[error("response already committed")]
    Committed,

    /// A handler panicked while serving the request.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// Any other application error.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps an arbitrary application error.
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Other(err.into())
    }
}

/// An error that maps onto a specific HTTP status.
///
/// `Display` renders both parts as `code=<status>, message=<message>`, so
/// the logged error text always tells the status apart from the reply body.
///
/// ```rust
/// use tsulog::HttpError;
/// use http::StatusCode;
///
/// let err = HttpError::new(StatusCode::NOT_FOUND, "user 42 does not exist");
/// assert_eq!(err.to_string(), "code=404, message=user 42 does not exist");
///
/// let err = HttpError::from_status(StatusCode::FORBIDDEN);
/// assert_eq!(err.message(), "Forbidden");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpError {
    code: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// An error whose message is the status code's canonical reason phrase.
    pub fn from_status(code: StatusCode) -> Self {
        Self::new(code, code.canonical_reason().unwrap_or_default())
    }

    pub fn code(&self) -> StatusCode { self.code }
    pub fn message(&self) -> &str { &self.message }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code={}, message={}", self.code.as_u16(), self.message)
    }
}

impl std::error::Error for HttpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_code_and_message() {
        let err = Error::from(HttpError::new(StatusCode::CONFLICT, "already exists"));
        assert_eq!(err.to_string(), "code=409, message=already exists");
    }

    #[test]
    fn from_status_uses_reason_phrase() {
        let err = HttpError::from_status(StatusCode::NOT_FOUND);
        assert_eq!(err.code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Not Found");
    }

    #[test]
    fn other_wraps_plain_strings() {
        let err = Error::other("database unreachable");
        assert_eq!(err.to_string(), "database unreachable");
    }
}
