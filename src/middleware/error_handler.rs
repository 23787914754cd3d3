//! Error handlers: the logging one and the framework default.

use http::{Method, StatusCode};

use crate::context::Context;
use crate::dump::dump_request;
use crate::error::Error;
use crate::sink::{Fields, LogSink};

/// Logged in place of the request dump for anything but `GET`.
///
/// By the time an error surfaces the handler may already have consumed or
/// acted on the body; the dump is only taken for requests that carry none
/// by convention.
pub const NON_GET_PLACEHOLDER: &str = "Request body dumped only for GET requests";

/// An error handler that answers the client and logs one error event.
///
/// [`Error::Http`] decides the status and body; every other error becomes
/// `500 Internal Server Error`. The body is only written if the response is
/// not committed yet.
///
/// The event is `error("error")` with `code`, `msg` and `request`. When the
/// error's own text differs from `msg` it is logged first, as `err`; when
/// they match, `err` is left out. [`HttpError`](crate::HttpError) renders as
/// `code=.., message=..`, so typed errors always carry `err`.
pub fn http_error_handler<S: LogSink>(sink: S) -> impl Fn(Error, &Context) + Send + Sync + 'static {
    move |err: Error, ctx: &Context| {
        let (code, message) = resolve(&err);
        write_body(ctx, code, &message);

        let request = if *ctx.request().method() == Method::GET {
            dump_request(ctx.request(), true)
        } else {
            NON_GET_PLACEHOLDER.to_owned()
        };

        let raw = err.to_string();
        let mut fields = Fields::new();
        if raw != message {
            fields = fields.with("err", raw);
        }
        sink.error(
            "error",
            &fields
                .with("code", code)
                .with("msg", message)
                .with("request", request),
        );
    }
}

/// The handler a [`Router`](crate::Router) uses when none is configured:
/// same status resolution and body write as [`http_error_handler`], no log.
pub fn default_error_handler(err: Error, ctx: &Context) {
    let (code, message) = resolve(&err);
    write_body(ctx, code, &message);
}

fn resolve(err: &Error) -> (StatusCode, String) {
    match err {
        Error::Http(he) => (he.code(), he.message().to_owned()),
        _ => {
            let code = StatusCode::INTERNAL_SERVER_ERROR;
            (code, code.canonical_reason().unwrap_or_default().to_owned())
        }
    }
}

fn write_body(ctx: &Context, code: StatusCode, message: &str) {
    if ctx.committed() {
        return;
    }
    if let Err(e) = ctx.string(code, message) {
        tracing::warn!(error = %e, "error response not written");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;

    #[test]
    fn typed_errors_keep_their_status() {
        let err = Error::from(HttpError::new(StatusCode::NOT_FOUND, "Not Found"));
        assert_eq!(resolve(&err), (StatusCode::NOT_FOUND, "Not Found".to_owned()));
    }

    #[test]
    fn everything_else_is_500() {
        assert_eq!(
            resolve(&Error::other("boom")),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned()),
        );
        assert_eq!(resolve(&Error::Panic("oops".into())).0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
