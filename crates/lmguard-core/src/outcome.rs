//! Explicit success/failure values for the result-returning calling convention.

use serde::{Deserialize, Serialize};

use crate::errors::GuardError;

/// Outcome of a `safe_*` operation.
///
/// Serializes as `{"status":"success","data":...}` or
/// `{"status":"failure","error":{...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
#[must_use]
pub enum Outcome<T> {
    Success { data: T },
    Failure { error: GuardError },
}

impl<T> Outcome<T> {
    pub const fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub const fn failure(error: GuardError) -> Self {
        Self::Failure { error }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Convert into a `Result` for `?` propagation.
    pub fn into_result(self) -> Result<T, GuardError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error } => Err(error),
        }
    }

    pub fn data(self) -> Option<T> {
        self.into_result().ok()
    }

    pub fn error(&self) -> Option<&GuardError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success { data } => Outcome::Success { data: f(data) },
            Self::Failure { error } => Outcome::Failure { error },
        }
    }
}

impl<T> From<Result<T, GuardError>> for Outcome<T> {
    fn from(result: Result<T, GuardError>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(error) => Self::Failure { error },
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, GuardError> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}
