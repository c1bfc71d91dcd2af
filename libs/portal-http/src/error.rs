use std::time::Duration;
use thiserror::Error;

/// Why a request URL was rejected before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// Not a syntactically valid URI
    ParseError,
    /// No host to connect to
    MissingAuthority,
    /// Relative URL without `http`/`https`
    MissingScheme,
}

/// Errors returned by [`HttpClient`](crate::HttpClient).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("could not assemble request: {0}")]
    RequestBuild(#[from] http::Error),

    /// Invalid header name
    #[error("header name rejected: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    /// Invalid header value
    #[error("header value rejected: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Request timed out before the response head arrived
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection refused, reset, DNS failure and the like
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// TLS error
    #[error("TLS setup failed: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Body longer than `max_body_size`
    #[error("Response body too large: limit {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// HTTP non-2xx status
    #[error("backend answered {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
    },

    #[error("response is not the expected JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// URL rejected before sending
    ///
    /// Match on `kind`; `reason` is a diagnostic message for logging only.
    #[error("bad URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    /// Scheme not permitted by the configured `TransportSecurity`
    #[error("scheme '{scheme}' refused: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl HttpError {
    /// `true` if the request was abandoned because it ran out of time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout(_))
    }

    /// HTTP status for [`HttpError::HttpStatus`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            HttpError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<hyper::Error> for HttpError {
    fn from(source: hyper::Error) -> Self {
        Self::Transport(Box::new(source))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(source: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(source))
    }
}
