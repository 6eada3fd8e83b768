//! # apibuilder
//!
//! Declare HTTP routes with a fluent API and share middleware across groups
//! of them, without hand-nesting handler wrappers.
//!
//! ## The contract
//!
//! apibuilder produces `(method, path, handler)` routes. Everything else
//! belongs to the server you hand them to:
//!
//! - **Routing and path parameters**: your router
//! - **Duplicate and conflict detection**: your router
//! - **Transport, TLS, timeouts**: your server
//!
//! What's left is the part that repeats between routes: which middleware runs
//! in front of which handler, and in what order. Middleware always runs in the
//! order it was declared, group middleware before per-route middleware.
//!
//! ## Quick start
//!
//! ```rust
//! use apibuilder::{BoxedHandler, Method, Middleware, Request, Response, RouteSet};
//! use http::StatusCode;
//!
//! async fn list_users(_req: Request) -> Response {
//!     Response::json(b"[]".to_vec())
//! }
//!
//! async fn delete_user(_req: Request) -> StatusCode {
//!     StatusCode::NO_CONTENT
//! }
//!
//! let auth = Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
//!     if req.header("authorization").is_none() {
//!         return Response::status(StatusCode::UNAUTHORIZED);
//!     }
//!     next.call(req).await
//! });
//!
//! let routes = RouteSet::new();
//! routes
//!     .with([auth])
//!     .apis([Method::Get, Method::Head], "/api/v1/users", list_users)
//!     .api(Method::Delete, "/api/v1/users/{id}", delete_user);
//!
//! for route in routes.snapshot() {
//!     // register route.methods(), route.path(), route.handler() with your router
//!     # let _ = route;
//! }
//! ```

mod compose;
mod error;
mod group;
mod handler;
mod method;
mod registrar;
mod request;
mod response;
mod route;
mod route_set;

pub mod middleware;

pub use compose::compose;
pub use error::Error;
pub use group::Group;
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use method::Method;
pub use middleware::Middleware;
pub use registrar::Registrar;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use route::{METHOD_DELIMITER, Route, RouteBuilder};
pub use route_set::RouteSet;
