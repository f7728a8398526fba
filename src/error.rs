use std::fmt::Display;

use serde::Serialize;

/// Domain error taxonomy shared by every workflow operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum ComicsError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    OperationFailed(String),
}

impl ComicsError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ComicsError::InvalidArgument(message.into())
    }

    pub fn not_found(kind: &str, id: &str) -> Self {
        ComicsError::NotFound(format!("{kind} '{id}' not found"))
    }

    pub fn failed(cause: impl Display) -> Self {
        ComicsError::OperationFailed(cause.to_string())
    }
}

impl From<anyhow::Error> for ComicsError {
    fn from(err: anyhow::Error) -> Self {
        ComicsError::OperationFailed(format!("{err:#}"))
    }
}

/// Result of an operation that may still be pending on a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Error(ComicsError),
    Loading,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Outcome::Loading)
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Error(_) | Outcome::Loading => None,
        }
    }

    pub fn error(&self) -> Option<&ComicsError> {
        match self {
            Outcome::Error(err) => Some(err),
            Outcome::Success(_) | Outcome::Loading => None,
        }
    }

    pub fn map<U>(self, transform: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(transform(value)),
            Outcome::Error(err) => Outcome::Error(err),
            Outcome::Loading => Outcome::Loading,
        }
    }

    pub fn on_success(self, action: impl FnOnce(&T)) -> Self {
        if let Outcome::Success(value) = &self {
            action(value);
        }
        self
    }

    pub fn on_error(self, action: impl FnOnce(&ComicsError)) -> Self {
        if let Outcome::Error(err) = &self {
            action(err);
        }
        self
    }
}

impl<T> From<Result<T, ComicsError>> for Outcome<T> {
    fn from(result: Result<T, ComicsError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::Error(err),
        }
    }
}

/// Unwraps `Outcome::Success`, returning early with the same `Error` or
/// `Loading` from the enclosing function otherwise.
#[macro_export]
macro_rules! ready {
    ($outcome:expr) => {
        match $outcome {
            $crate::error::Outcome::Success(value) => value,
            $crate::error::Outcome::Error(err) => return $crate::error::Outcome::Error(err),
            $crate::error::Outcome::Loading => return $crate::error::Outcome::Loading,
        }
    };
}
