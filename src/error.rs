//! Unified error type.

use std::fmt;

/// The error type returned by apibuilder's fallible operations.
///
/// Building routes never fails. This type only surfaces when a consumer asks
/// for typed methods via [`Route::parse_methods`](crate::Route::parse_methods)
/// or parses a [`Method`](crate::Method) from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A method token was empty, e.g. the middle of `"GET;;POST"`.
    EmptyMethod,
    /// A method token is not a known HTTP method.
    UnknownMethod(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMethod      => f.write_str("empty method token"),
            Self::UnknownMethod(m) => write!(f, "unknown method `{m}`"),
        }
    }
}

impl std::error::Error for Error {}
