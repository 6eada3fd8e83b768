//! Ordered collection of built routes.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::group::Group;
use crate::handler::Handler;
use crate::middleware::Middleware;
use crate::registrar::Registrar;
use crate::route::{Route, RouteBuilder};

/// An append-only, ordered set of [`Route`]s.
///
/// `RouteSet` is a handle: clones (and every [`Group`] derived from it) append
/// to the same underlying list. Construction happens on one thread, so there
/// is no locking; take a [`snapshot`](RouteSet::snapshot) once done and hand
/// the routes (which are `Send + Sync`) to your server.
///
/// ```rust
/// use apibuilder::{Method, Request, RouteSet};
///
/// async fn list(_: Request) -> &'static str { "[]" }
/// async fn create(_: Request) -> &'static str { "{}" }
///
/// let routes = RouteSet::new();
/// routes
///     .api(Method::Get,  "/api/v1/users", list)
///     .api(Method::Post, "/api/v1/users", create);
///
/// assert_eq!(routes.snapshot().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct RouteSet {
    routes: Rc<RefCell<Vec<Route>>>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and appends a route. Returns `self` for chaining.
    pub fn api(&self, method: impl AsRef<str>, path: &str, handler: impl Handler) -> &Self {
        self.api_with(method, path, handler, [])
    }

    /// Like [`api`](RouteSet::api), with per-route middleware run in the
    /// given order before `handler`.
    pub fn api_with(
        &self,
        method: impl AsRef<str>,
        path: &str,
        handler: impl Handler,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &Self {
        let route = RouteBuilder::new(method)
            .path(path)
            .handler(handler)
            .middlewares(middleware)
            .build();
        debug!(method = route.method(), path = route.path(), "route registered");
        self.routes.borrow_mut().push(route);
        self
    }

    /// Starts a group whose routes all run `middleware` first.
    pub fn with(&self, middleware: impl IntoIterator<Item = Middleware>) -> Group {
        Group::new(self).with(middleware)
    }

    /// Starts a group with no shared middleware.
    pub fn group(&self) -> Group {
        Group::new(self)
    }

    /// Copy of every route, in registration order.
    pub fn snapshot(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.routes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.borrow().is_empty()
    }

    /// Hands a snapshot to `registrar`.
    pub fn register_into<R: Registrar + ?Sized>(&self, registrar: &mut R) {
        registrar.register(self.snapshot());
    }
}
