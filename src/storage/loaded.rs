//! Load outcomes
//!
//! Reads from the durable medium never fail outright: a missing or unreadable
//! blob degrades to a default. [`Loaded`] records which path was taken so
//! callers and tests can tell a stored value from a fallback.

use std::fmt;

/// Why a load fell back to a default value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Nothing was stored under the key
    Missing,
    /// A blob was stored but could not be decoded
    Corrupt(String),
    /// The medium itself could not be read
    Unavailable(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Missing => write!(f, "nothing stored"),
            FallbackReason::Corrupt(e) => write!(f, "corrupt blob: {}", e),
            FallbackReason::Unavailable(e) => write!(f, "storage unavailable: {}", e),
        }
    }
}

/// Result of loading a value that always has a usable default
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// Value decoded from storage
    Stored(T),
    /// Default value used instead
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Loaded<T> {
    /// Borrow the value regardless of origin
    pub fn value(&self) -> &T {
        match self {
            Loaded::Stored(value) => value,
            Loaded::Fallback { value, .. } => value,
        }
    }

    /// Take the value regardless of origin
    pub fn into_inner(self) -> T {
        match self {
            Loaded::Stored(value) => value,
            Loaded::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Loaded::Fallback { .. })
    }

    /// The fallback reason, if any
    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Loaded::Stored(_) => None,
            Loaded::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        match self {
            Loaded::Stored(value) => Loaded::Stored(f(value)),
            Loaded::Fallback { value, reason } => Loaded::Fallback {
                value: f(value),
                reason,
            },
        }
    }
}
