//! Error types for the access-control SDK.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single permission or role fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The attempt did not finish within its deadline.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered 2xx with a body that is not the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Only timeouts are worth retrying; everything else fails closed at once.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }

    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Misuse of the access-control API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Permission predicates were requested outside a `PermissionProvider` scope.
    #[error("permission store requested outside of a PermissionProvider scope")]
    OutsideProvider,
}
