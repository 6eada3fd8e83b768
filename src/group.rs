//! Shared middleware for a batch of routes.
//!
//! A [`Group`] carries a middleware prefix and a handle to a [`RouteSet`].
//! Every route registered through it runs the prefix first, then its own
//! middleware, then the handler. Groups nest; a derived group copies its
//! parent's prefix and extends the copy, so parents never change.
//!
//! ```text
//! let api   = routes.with([request_id]);        request_id
//! let users = api.with([auth]);                 request_id → auth
//! let admin = users.with([require_admin]);      request_id → auth → require_admin
//! admin.api_with("DELETE", "/users/{id}", delete_user, [audit]);
//!                                               request_id → auth → require_admin → audit → delete_user
//! ```

use tracing::trace;

use crate::compose::compose;
use crate::handler::Handler;
use crate::middleware::Middleware;
use crate::route::METHOD_DELIMITER;
use crate::route_set::RouteSet;

/// A middleware prefix bound to a [`RouteSet`].
#[derive(Clone)]
#[must_use]
pub struct Group {
    middleware: Vec<Middleware>,
    routes: RouteSet,
}

impl Group {
    /// A group with no middleware that registers into `routes`.
    pub fn new(routes: &RouteSet) -> Self {
        Self { middleware: Vec::new(), routes: routes.clone() }
    }

    /// Derives a nested group: this group's middleware followed by `middleware`.
    /// `self` is left untouched, and both groups register into the same set.
    pub fn with(&self, middleware: impl IntoIterator<Item = Middleware>) -> Group {
        let mut inherited = self.middleware.clone();
        inherited.extend(middleware);
        trace!(depth = inherited.len(), "group derived");
        Group { middleware: inherited, routes: self.routes.clone() }
    }

    /// Registers a single-method route.
    ///
    /// # Panics
    ///
    /// Panics if `method` contains [`METHOD_DELIMITER`]; use
    /// [`apis`](Group::apis) for several methods.
    pub fn api(&self, method: impl AsRef<str>, path: &str, handler: impl Handler) -> &Self {
        self.api_with(method, path, handler, [])
    }

    /// Like [`api`](Group::api), with per-route middleware that runs after
    /// the group's middleware and before `handler`.
    ///
    /// # Panics
    ///
    /// Panics if `method` contains [`METHOD_DELIMITER`].
    pub fn api_with(
        &self,
        method: impl AsRef<str>,
        path: &str,
        handler: impl Handler,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &Self {
        let method = method.as_ref();
        if method.contains(METHOD_DELIMITER) {
            panic!("multi-method route `{method} {path}` registered through `Group::api`; use `Group::apis`");
        }
        self.apis_with([method], path, handler, middleware)
    }

    /// Registers one route answering every method in `methods`.
    pub fn apis<M>(&self, methods: impl IntoIterator<Item = M>, path: &str, handler: impl Handler) -> &Self
    where
        M: AsRef<str>,
    {
        self.apis_with(methods, path, handler, [])
    }

    /// Like [`apis`](Group::apis), with per-route middleware.
    pub fn apis_with<M>(
        &self,
        methods: impl IntoIterator<Item = M>,
        path: &str,
        handler: impl Handler,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> &Self
    where
        M: AsRef<str>,
    {
        let mut method = String::new();
        for (i, m) in methods.into_iter().enumerate() {
            if i > 0 {
                method.push(METHOD_DELIMITER);
            }
            method.push_str(m.as_ref());
        }

        let per_route: Vec<Middleware> = middleware.into_iter().collect();
        let handler = compose(compose(handler.into_boxed_handler(), &per_route), &self.middleware);

        self.routes.api(method, path, handler);
        self
    }

    /// The group's middleware, outermost first.
    pub fn middleware(&self) -> &[Middleware] {
        &self.middleware
    }

    /// Returns the route set this group registers into.
    pub fn end(&self) -> RouteSet {
        self.routes.clone()
    }
}
