//! Radix-tree request router and the composed application.
//!
//! One tree per HTTP method, O(path-length) lookup. The router also carries
//! the middleware stack and the error handler; [`Router::compose`] folds the
//! middleware around the routing endpoint once, when the server starts.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::context::Context;
use crate::error::{Error, HttpError};
use crate::handler::{BoxedHandler, Handler, Middleware, from_fn};
use crate::middleware::{BoxedErrorHandler, ErrorHandler, default_error_handler};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain naturally.
///
/// ```rust,no_run
/// # use tsulog::{Context, Error, Router};
/// # use http::Method;
/// # async fn get_user(_: Context) -> Result<(), Error> { Ok(()) }
/// # async fn create_user(_: Context) -> Result<(), Error> { Ok(()) }
/// Router::new()
///     .on(Method::GET,  "/users/{id}", get_user)
///     .on(Method::POST, "/users",      create_user);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    middleware: Vec<Arc<dyn Middleware>>,
    error_handler: BoxedErrorHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            middleware: Vec::new(),
            error_handler: Arc::new(default_error_handler),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `ctx.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with an existing
    /// one. Routes are fixed at startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Appends a middleware. The first one added is the outermost.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Replaces the error handler (default: [`default_error_handler`]).
    pub fn error_handler(mut self, handler: impl ErrorHandler) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Freezes the router into a ready-to-serve application.
    ///
    /// The endpoint at the bottom of the chain runs the matched route, or
    /// fails with 404 when the request matched none.
    pub(crate) fn compose(self) -> App {
        let endpoint = from_fn(|ctx: Context| async move {
            match ctx.route() {
                Some(handler) => handler.call(ctx.clone()).await,
                None => Err(HttpError::from_status(StatusCode::NOT_FOUND).into()),
            }
        });
        let chain = self.middleware.iter().rev().fold(endpoint, |next, mw| mw.wrap(next));

        App {
            routes: self.routes,
            chain,
            error_handler: self.error_handler,
            method_not_allowed: from_fn(|_ctx: Context| async {
                Err::<(), Error>(HttpError::from_status(StatusCode::METHOD_NOT_ALLOWED).into())
            }),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// A composed router: routing tables plus the prebuilt handler chain.
pub(crate) struct App {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    chain: BoxedHandler,
    error_handler: BoxedErrorHandler,
    method_not_allowed: BoxedHandler,
}

impl App {
    /// Runs one request through the chain and returns the finished response.
    ///
    /// An error that escapes the chain goes to the error handler here, so a
    /// router without logging middleware still answers with a status.
    pub(crate) async fn dispatch(&self, mut req: Request) -> Response {
        let route = match self.lookup(&req.method, req.path()) {
            Some((handler, params)) => {
                req.params = params;
                Some(handler)
            }
            None if self.allowed_elsewhere(&req.method, req.path()) => Some(Arc::clone(&self.method_not_allowed)),
            None => None,
        };

        let ctx = Context::with_route(req, route, Arc::clone(&self.error_handler));
        if let Err(err) = self.chain.call(ctx.clone()).await {
            ctx.error(err);
        }
        ctx.take_response()
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    fn allowed_elsewhere(&self, method: &Method, path: &str) -> bool {
        self.routes.iter()
            .any(|(m, tree)| m != method && tree.at(path).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    async fn hello(ctx: Context) -> Result<(), Error> {
        let name = ctx.param("name").unwrap_or("world").to_owned();
        ctx.string(StatusCode::OK, format!("hello {name}"))
    }

    fn request(method: Method, uri: &str) -> Request {
        let req = http::Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap();
        Request::from_http(req, "127.0.0.1:5000".parse().unwrap())
    }

    fn app() -> App {
        Router::new()
            .on(Method::GET, "/hello/{name}", hello)
            .compose()
    }

    #[tokio::test]
    async fn routes_with_params() {
        let res = app().dispatch(request(Method::GET, "/hello/alice")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body(), b"hello alice");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let res = app().dispatch(request(Method::GET, "/nope")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), b"Not Found");
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let res = app().dispatch(request(Method::DELETE, "/hello/alice")).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.body(), b"Method Not Allowed");
    }

    #[tokio::test]
    async fn first_middleware_is_outermost() {
        use std::sync::Mutex;

        let order = Arc::new(Mutex::new(Vec::new()));
        let layer = |name: &'static str| {
            let order = Arc::clone(&order);
            move |next: BoxedHandler| {
                let order = Arc::clone(&order);
                from_fn(move |ctx: Context| {
                    order.lock().unwrap().push(name);
                    next.call(ctx)
                })
            }
        };

        let app = Router::new()
            .with(layer("outer"))
            .with(layer("inner"))
            .on(Method::GET, "/hello/{name}", hello)
            .compose();
        app.dispatch(request(Method::GET, "/hello/bob")).await;

        assert_eq!(*order.lock().unwrap(), ["outer", "inner"]);
    }

    #[tokio::test]
    async fn unmatched_requests_still_pass_through_middleware() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = {
            let seen = Arc::clone(&seen);
            move |next: BoxedHandler| {
                let seen = Arc::clone(&seen);
                from_fn(move |ctx: Context| {
                    let seen = Arc::clone(&seen);
                    let next = Arc::clone(&next);
                    async move {
                        let outcome = next.call(ctx.clone()).await;
                        let code = match &outcome {
                            Err(Error::Http(he)) => he.code(),
                            _ => StatusCode::OK,
                        };
                        seen.lock().unwrap().push(code);
                        outcome
                    }
                })
            }
        };

        let app = Router::new()
            .with(recorder)
            .on(Method::GET, "/hello/{name}", hello)
            .compose();
        let res = app.dispatch(request(Method::GET, "/nope")).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), b"Not Found");
        assert_eq!(*seen.lock().unwrap(), [StatusCode::NOT_FOUND]);
    }
}
