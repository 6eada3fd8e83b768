//! Folding a middleware sequence and a terminal handler into one handler.

use crate::handler::BoxedHandler;
use crate::middleware::Middleware;

/// Wraps `terminal` in `middleware`, preserving declaration order at request
/// time: `middleware[0]` runs first, `terminal` runs last.
///
/// ```text
/// compose(h, [m1, m2, m3])  ==  m1(m2(m3(h)))
/// request:  m1 → m2 → m3 → h
/// response: h → m3 → m2 → m1
/// ```
///
/// An empty slice returns `terminal` itself. Composition nests:
/// `compose(&compose(h, inner), outer)` behaves like `compose(h, outer ++ inner)`.
pub fn compose(terminal: BoxedHandler, middleware: &[Middleware]) -> BoxedHandler {
    middleware
        .iter()
        .rev()
        .fold(terminal, |next, m| m.wrap(next))
}
