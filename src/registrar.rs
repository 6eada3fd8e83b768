//! The receiving side: whatever turns built routes into a running server.

use crate::route::Route;

/// Accepts the finished routes and registers each one with a real router.
///
/// apibuilder does no routing itself. Implement this for your router, or
/// pass a closure:
///
/// ```rust
/// use apibuilder::{Request, Route, RouteSet};
///
/// async fn ping(_: Request) -> &'static str { "pong" }
///
/// let routes = RouteSet::new();
/// routes.api("GET;HEAD", "/ping", ping);
///
/// let mut table = Vec::new();
/// routes.register_into(&mut |routes: Vec<Route>| {
///     for route in routes {
///         for method in route.methods() {
///             table.push(format!("{method} {}", route.path()));
///         }
///     }
/// });
/// assert_eq!(table, ["GET /ping", "HEAD /ping"]);
/// ```
pub trait Registrar {
    fn register(&mut self, routes: Vec<Route>);
}

/// Collects the routes as-is.
impl Registrar for Vec<Route> {
    fn register(&mut self, routes: Vec<Route>) {
        self.extend(routes);
    }
}

impl<F> Registrar for F
where
    F: FnMut(Vec<Route>),
{
    fn register(&mut self, routes: Vec<Route>) {
        (self)(routes)
    }
}
