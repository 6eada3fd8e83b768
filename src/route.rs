//! A finished route and the builder that produces it.

use std::fmt;

use http::StatusCode;
use tracing::warn;

use crate::compose::compose;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// Separates methods that share one route, e.g. `"GET;HEAD;OPTIONS"`.
pub const METHOD_DELIMITER: char = ';';

// ── Route ─────────────────────────────────────────────────────────────────────

/// A built route: method(s), path, and the handler with all of its
/// middleware already composed in.
///
/// Immutable once built. A consumer registers it with a real router:
///
/// ```text
/// GET;HEAD  /api/v1/users  auth → log → list_users
/// ```
#[derive(Clone)]
pub struct Route {
    method: String,
    path: String,
    handler: BoxedHandler,
}

impl Route {
    /// The method string exactly as registered, delimiter included.
    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }

    /// The final handler. Middleware runs in the order it was declared.
    pub fn handler(&self) -> &BoxedHandler { &self.handler }

    /// Splits [`method`](Route::method) on [`METHOD_DELIMITER`].
    ///
    /// No validation: `"GET;;POST"` yields `["GET", "", "POST"]`.
    pub fn methods(&self) -> Vec<&str> {
        self.method.split(METHOD_DELIMITER).collect()
    }

    /// Typed view of [`methods`](Route::methods) for consumers that need it.
    /// Fails on the first empty or unknown token.
    pub fn parse_methods(&self) -> Result<Vec<Method>, Error> {
        self.methods().into_iter().map(str::parse::<Method>).collect()
    }

    pub fn into_parts(self) -> (String, String, BoxedHandler) {
        (self.method, self.path, self.handler)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ── RouteBuilder ──────────────────────────────────────────────────────────────

/// Accumulates one route. Consumed by [`build`](RouteBuilder::build).
///
/// ```rust
/// # use apibuilder::{Middleware, Request, RouteBuilder};
/// # async fn list_users(_: Request) -> &'static str { "[]" }
/// # let auth = Middleware::new(|next| next);
/// # let log = Middleware::new(|next| next);
/// let route = RouteBuilder::new("GET;HEAD")
///     .path("/api/v1/users")
///     .handler(list_users)
///     .middleware(auth)
///     .middleware(log)
///     .build();
///
/// assert_eq!(route.methods(), ["GET", "HEAD"]);
/// ```
#[must_use]
pub struct RouteBuilder {
    method: String,
    path: String,
    handler: Option<BoxedHandler>,
    middleware: Vec<Middleware>,
}

impl RouteBuilder {
    /// Starts a route. Several methods may be joined with `;`.
    pub fn new(method: impl AsRef<str>) -> Self {
        Self {
            method: method.as_ref().to_owned(),
            path: String::new(),
            handler: None,
            middleware: Vec::new(),
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn handler(mut self, handler: impl Handler) -> Self {
        self.handler = Some(handler.into_boxed_handler());
        self
    }

    /// Appends one middleware. Earlier calls run first.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends several middleware, in order, after any already added.
    pub fn middlewares(mut self, middleware: impl IntoIterator<Item = Middleware>) -> Self {
        self.middleware.extend(middleware);
        self
    }

    /// Composes the middleware onto the handler and freezes the route.
    ///
    /// A route without a handler answers `501 Not Implemented`.
    pub fn build(self) -> Route {
        let handler = self.handler.unwrap_or_else(|| {
            warn!(method = %self.method, path = %self.path, "route built without a handler");
            not_implemented.into_boxed_handler()
        });
        Route {
            handler: compose(handler, &self.middleware),
            method: self.method,
            path: self.path,
        }
    }
}

async fn not_implemented(_req: Request) -> Response {
    Response::status(StatusCode::NOT_IMPLEMENTED)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn req() -> Request {
        http::Request::get("/testMiddleware").body(Bytes::new()).unwrap().into()
    }

    #[derive(Clone, Default)]
    struct Stack(Vec<&'static str>);

    fn push(label: &'static str) -> Middleware {
        Middleware::from_fn(move |mut req: Request, next: BoxedHandler| async move {
            let mut stack = req.context::<Stack>().cloned().unwrap_or_default();
            stack.0.push(label);
            req.insert_context(stack);
            next.call(req).await
        })
    }

    async fn echo_stack(req: Request) -> Response {
        match req.context::<Stack>() {
            Some(stack) => Response::text(stack.0.join(",")),
            None        => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    #[test]
    fn accessors_return_what_was_built() {
        let route = RouteBuilder::new("GET").path("/api/test").handler(echo_stack).build();
        assert_eq!(route.method(), "GET");
        assert_eq!(route.path(), "/api/test");
        assert_eq!(route.methods(), ["GET"]);
    }

    #[test]
    fn methods_split_on_delimiter_without_validation() {
        let route = RouteBuilder::new("GET;POST;PUT").build();
        assert_eq!(route.methods(), ["GET", "POST", "PUT"]);

        let odd = RouteBuilder::new(";GET;;POST;").build();
        assert_eq!(odd.methods(), ["", "GET", "", "POST", ""]);
    }

    #[test]
    fn join_then_split_round_trips() {
        let tokens = ["GET", "HEAD", "OPTIONS", "PATCH"];
        let delimiter = METHOD_DELIMITER.to_string();
        for n in 1..=tokens.len() {
            let joined = tokens[..n].join(delimiter.as_str());
            assert_eq!(RouteBuilder::new(joined).build().methods(), &tokens[..n]);
        }
    }

    #[test]
    fn parse_methods_is_typed() {
        let route = RouteBuilder::new("GET;DELETE").build();
        assert_eq!(route.parse_methods(), Ok(vec![Method::Get, Method::Delete]));

        let bad = RouteBuilder::new("GET;;POST").build();
        assert_eq!(bad.parse_methods(), Err(Error::EmptyMethod));
    }

    #[test]
    fn empty_method_and_path_pass_through() {
        let route = RouteBuilder::new("").build();
        assert_eq!(route.method(), "");
        assert_eq!(route.path(), "");
        assert_eq!(route.methods(), [""]);
    }

    #[tokio::test]
    async fn handler_without_middleware_runs_bare() {
        let route = RouteBuilder::new("GET").handler(echo_stack).build();
        let res = route.handler().call(req()).await;
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn middleware_calls_accumulate_in_order() {
        let route = RouteBuilder::new("GET")
            .handler(echo_stack)
            .middleware(push("1"))
            .middlewares([push("2"), push("3")])
            .middleware(push("4"))
            .build();
        let res = route.handler().call(req()).await;
        assert_eq!(res.body(), b"1,2,3,4");
    }

    #[tokio::test]
    async fn missing_handler_answers_not_implemented() {
        let route = RouteBuilder::new("GET").path("/todo").middleware(push("1")).build();
        let res = route.handler().call(req()).await;
        assert_eq!(res.status_code(), StatusCode::NOT_IMPLEMENTED);
    }
}
