use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Maximum number of body bytes kept in `HttpError::HttpStatus::body_preview`
const BODY_PREVIEW_LIMIT: usize = 256;

/// Response whose body reads are capped at `max_body_size`.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<Incoming>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        self.inner.status()
    }

    /// Turn a non-2xx response into [`HttpError::HttpStatus`].
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` with a short body preview if status is not 2xx.
    pub async fn error_for_status(self) -> Result<Self, HttpError> {
        if self.inner.status().is_success() {
            return Ok(self);
        }

        let status = self.inner.status();
        let limit = self.max_body_size.min(BODY_PREVIEW_LIMIT * 16);
        // Preview is best-effort: a body read failure still reports the status.
        let body_preview = read_body_limited(self.inner, limit)
            .await
            .map(|bytes| preview(&bytes))
            .unwrap_or_default();

        Err(HttpError::HttpStatus {
            status,
            body_preview,
        })
    }

    /// Read response body as bytes without status check
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the body exceeds the configured limit.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner, self.max_body_size).await
    }

    /// Parse response body as JSON with status check
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if the body exceeds the configured limit.
    /// Returns `HttpError::Json` if parsing fails.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let response = self.error_for_status().await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn read_body_limited(response: Response<Incoming>, limit: usize) -> Result<Bytes, HttpError> {
    let body = Limited::new(response.into_body(), limit);
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<http_body_util::LengthLimitError>() => {
            Err(HttpError::BodyTooLarge { limit })
        }
        Err(e) => Err(HttpError::Transport(e)),
    }
}

fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut preview: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();
    if text.chars().count() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview
}
