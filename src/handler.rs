//! Handler trait, type erasure and the middleware shape.
//!
//! # How async handlers are stored
//!
//! The router holds handlers of *different* types in a single radix tree, so
//! each one is hidden behind a trait object (`dyn ErasedHandler`). Middleware
//! works on the same erased type: it takes the next handler and returns a new
//! one with the identical signature, which is what lets middleware nest.
//!
//! ```text
//! async fn hello(ctx: Context) -> Result<(), Error> { … }   ← user writes this
//!        ↓ router.on(Method::GET, "/", hello)
//! hello.into_boxed_handler()                                ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                                ← BoxedHandler
//!        ↓ request_logger(sink)(handler)
//! Arc::new(FnHandler(|ctx| { …; next.call(ctx).await; … }))  ← still a BoxedHandler
//! ```
//!
//! Per request that is one virtual call per layer; the chain itself is built
//! once, when the server starts.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;

/// A heap-allocated, type-erased future resolving to the handler outcome.
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'static>>;

/// Dispatch interface behind [`BoxedHandler`].
pub trait ErasedHandler {
    fn call(&self, ctx: Context) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Wraps the next handler in the chain and returns the replacement.
///
/// Any `Fn(BoxedHandler) -> BoxedHandler` is a middleware; see
/// [`request_logger`](crate::middleware::request_logger) for a real one.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Automatically satisfied by any `async fn` (or closure returning a future)
/// with the signature:
///
/// ```text
/// async fn name(ctx: Context) -> Result<(), Error>
/// ```
///
/// The trait is **sealed**: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
}

impl<F, Fut> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Erases a handler function, for middleware that builds its wrapper
/// from a closure.
pub fn from_fn(handler: impl Handler) -> BoxedHandler {
    handler.into_boxed_handler()
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture {
        Box::pin((self.0)(ctx))
    }
}
