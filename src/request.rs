//! Request type handed to handlers and middleware.

use bytes::Bytes;
use http::{Extensions, HeaderMap};

/// An HTTP request with a fully buffered body.
///
/// Besides the usual accessors it carries a request-scoped key/value context
/// ([`context`](Request::context) / [`insert_context`](Request::insert_context)),
/// backed by [`http::Extensions`]. Middleware uses it to pass values such as
/// an authenticated user down to the handler. Values live exactly as long as
/// the request, so concurrent requests never share them.
#[derive(Debug)]
pub struct Request {
    inner: http::Request<Bytes>,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self { inner }
    }

    pub fn method(&self) -> &http::Method { self.inner.method() }
    pub fn path(&self) -> &str { self.inner.uri().path() }
    pub fn headers(&self) -> &HeaderMap { self.inner.headers() }
    pub fn body(&self) -> &Bytes { self.inner.body() }
    pub fn extensions(&self) -> &Extensions { self.inner.extensions() }
    pub fn extensions_mut(&mut self) -> &mut Extensions { self.inner.extensions_mut() }

    /// Case-insensitive header lookup. Non-UTF-8 values are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the request-scoped value of type `T`, if an upstream
    /// middleware stored one.
    pub fn context<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.extensions().get::<T>()
    }

    /// Stores a request-scoped value, returning the previous one of the same type.
    pub fn insert_context<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.inner.extensions_mut().insert(value)
    }

    pub fn into_inner(self) -> http::Request<Bytes> {
        self.inner
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(inner: http::Request<Bytes>) -> Self {
        Self::new(inner)
    }
}
