//! Middleware layer.
//!
//! A [`Middleware`] is a function from handler to handler: it receives the
//! next handler in the chain and returns a new handler that runs around it.
//! That is the right place for cross-cutting concerns such as tracing,
//! request-id injection or authentication-header checks.
//!
//! Two ways to write one:
//!
//! ```rust
//! use apibuilder::{BoxedHandler, Middleware, Request, Response};
//! use http::StatusCode;
//!
//! // "around" form: pre-logic, call next, post-logic
//! let require_auth = Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
//!     if req.header("authorization").is_none() {
//!         return Response::status(StatusCode::UNAUTHORIZED);
//!     }
//!     next.call(req).await
//! });
//!
//! // handler -> handler form
//! let passthrough = Middleware::new(|next: BoxedHandler| next);
//! # let _ = (require_auth, passthrough);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::IntoResponse;

/// A cloneable `BoxedHandler -> BoxedHandler` transform.
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static>);

impl Middleware {
    /// Builds a middleware from a function that wraps the next handler.
    pub fn new<F, H>(f: F) -> Self
    where
        F: Fn(BoxedHandler) -> H + Send + Sync + 'static,
        H: Handler,
    {
        Self(Arc::new(move |next: BoxedHandler| f(next).into_boxed_handler()))
    }

    /// Builds a middleware from an async function that receives the request
    /// and the next handler, and decides whether and when to call it.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, BoxedHandler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + Send + 'static,
    {
        let f = Arc::new(f);
        Self::new(move |next: BoxedHandler| {
            let f = Arc::clone(&f);
            move |req: Request| (*f)(req, next.clone())
        })
    }

    /// Applies this middleware to `next`.
    pub fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        (self.0)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Middleware({:p})", Arc::as_ptr(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::Response;

    fn req() -> Request {
        http::Request::get("/").body(Bytes::new()).unwrap().into()
    }

    async fn ok(_req: Request) -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn from_fn_can_short_circuit() {
        let deny = Middleware::from_fn(|_req: Request, _next: BoxedHandler| async {
            Response::status(StatusCode::FORBIDDEN)
        });
        let res = deny.wrap(ok.into_boxed_handler()).call(req()).await;
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn from_fn_sees_the_response_on_the_way_out() {
        let tag = Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
            let mut res = next.call(req).await;
            res.headers_mut().insert("x-tagged", http::HeaderValue::from_static("1"));
            res
        });
        let res = tag.wrap(ok.into_boxed_handler()).call(req()).await;
        assert_eq!(res.header("x-tagged"), Some("1"));
        assert_eq!(res.body(), b"ok");
    }

    #[test]
    fn identity_middleware_returns_next_unchanged() {
        let h = ok.into_boxed_handler();
        let id = Middleware::new(|next: BoxedHandler| next);
        assert!(id.wrap(h.clone()).ptr_eq(&h));
    }
}
