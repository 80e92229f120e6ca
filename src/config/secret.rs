//! Redacting wrapper for credentials held in configuration.
//!
//! Upstream secrets (OAuth client id/secret, API keys) travel through the
//! config structs, which are logged at startup and may show up in `Debug`
//! output. Wrapping them in [`Sensitive`] keeps the value usable for
//! outbound calls while every formatting path prints `[REDACTED]`.

use serde::Deserialize;
use std::fmt;

/// A value that must never be printed, logged, or echoed to a client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the wrapped value. Only call this where the value leaves the
    /// process towards the upstream it belongs to.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl Sensitive<String> {
    /// Wrap a string, treating blank input as absent.
    pub fn non_empty(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
