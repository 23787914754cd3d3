//! Request/response logging middleware.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;

use crate::context::Context;
use crate::dump::dump_request;
use crate::error::Error;
use crate::handler::{BoxedHandler, from_fn};
use crate::sink::{Fields, LogSink};

/// Logs every request that passes through the chain.
///
/// Per request, in order:
///
/// 1. `debug("request")` with the full wire dump, body included, under `request`;
/// 2. the next handler runs, timed;
/// 3. `info("response")` with `remoteAddr`, `method`, `path`, `status`,
///    `time` and `size`.
///
/// `remoteAddr` is [`Request::real_ip`](crate::Request::real_ip). An empty
/// path is logged as `/`.
///
/// A handler error is passed to [`Context::error`] and not returned: the
/// wrapped handler always resolves to `Ok(())`, so the rest of the chain
/// keeps going. A handler panic is caught and dispatched the same way as
/// [`Error::Panic`], so the response summary is still logged exactly once.
pub fn request_logger<S: LogSink>(sink: S) -> impl Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static {
    let sink = Arc::new(sink);
    move |next: BoxedHandler| {
        let sink = Arc::clone(&sink);
        from_fn(move |ctx: Context| {
            let sink = Arc::clone(&sink);
            let next = Arc::clone(&next);
            async move {
                let req = ctx.request();
                sink.debug("request", &Fields::new().with("request", dump_request(req, true)));

                let remote_addr = req.real_ip();

                let start = Instant::now();
                match AssertUnwindSafe(async { next.call(ctx.clone()).await }).catch_unwind().await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => ctx.error(err),
                    Err(panic) => ctx.error(Error::Panic(panic_message(&*panic))),
                }
                let elapsed = start.elapsed();

                let path = match req.path() {
                    "" => "/",
                    path => path,
                };

                sink.info(
                    "response",
                    &Fields::new()
                        .with("remoteAddr", remote_addr)
                        .with("method", req.method())
                        .with("path", path)
                        .with("status", ctx.status())
                        .with("time", elapsed)
                        .with("size", ctx.size()),
                );
                Ok::<_, Error>(())
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
