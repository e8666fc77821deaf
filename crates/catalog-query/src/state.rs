//! Query lifecycle states.

use std::fmt;
use std::rc::Rc;

/// Status of a cache entry, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Success,
    /// The last request failed.
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a cache entry.
///
/// Payloads are shared with the store: cloning a state never copies the
/// data or the error.
#[derive(Debug)]
pub enum QueryState<T, E> {
    Idle,
    Loading,
    Success(Rc<T>),
    Error(Rc<E>),
}

impl<T, E> QueryState<T, E> {
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Idle => QueryStatus::Idle,
            Self::Loading => QueryStatus::Loading,
            Self::Success(_) => QueryStatus::Success,
            Self::Error(_) => QueryStatus::Error,
        }
    }

    pub fn data(&self) -> Option<&Rc<T>> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Rc<E>> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Success or Error.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }
}

impl<T, E> Clone for QueryState<T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Success(data) => Self::Success(Rc::clone(data)),
            Self::Error(error) => Self::Error(Rc::clone(error)),
        }
    }
}

impl<T, E> Default for QueryState<T, E> {
    fn default() -> Self {
        Self::Idle
    }
}
