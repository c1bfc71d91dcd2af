use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;

use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;

pub(crate) type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

pub(crate) struct ClientInner {
    pub(crate) hyper: HyperClient,
    pub(crate) user_agent: http::HeaderValue,
    pub(crate) request_timeout: Duration,
    pub(crate) max_body_size: usize,
    pub(crate) transport: TransportSecurity,
}

/// HTTP client for the portal backend.
///
/// `HttpClient` is `Clone + Send + Sync`; cloning shares the connection pool.
/// Store it directly, no `Mutex` needed.
///
/// # Example
///
/// ```ignore
/// struct RolesApi {
///     http: HttpClient,
/// }
///
/// impl RolesApi {
///     async fn roles(&self, token: &str) -> Result<RolesResponse, HttpError> {
///         self.http
///             .get("https://portal.example.com/api/auth/user-roles")
///             .bearer_auth(token)
///             .send()
///             .await?
///             .json()
///             .await
///     }
/// }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("request_timeout", &self.inner.request_timeout)
            .field("max_body_size", &self.inner.max_body_size)
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start a GET.
    ///
    /// The URL must be absolute (scheme and host). `http://` URLs are
    /// rejected unless the client allows insecure HTTP.
    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), http::Method::GET, url.to_owned())
    }

    pub(crate) fn transport(&self) -> TransportSecurity {
        self.inner.transport
    }

    pub(crate) fn max_body_size(&self) -> usize {
        self.inner.max_body_size
    }

    /// Send a fully built request, bounded by the configured request timeout.
    pub(crate) async fn execute(
        &self,
        mut request: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, HttpError> {
        if !request.headers().contains_key(http::header::USER_AGENT) {
            request
                .headers_mut()
                .insert(http::header::USER_AGENT, self.inner.user_agent.clone());
        }

        let timeout = self.inner.request_timeout;
        let method = request.method().clone();
        let uri = request.uri().clone();

        match tokio::time::timeout(timeout, self.inner.hyper.request(request)).await {
            Ok(Ok(response)) => {
                tracing::debug!(%method, %uri, status = %response.status(), "HTTP response");
                Ok(response)
            }
            Ok(Err(e)) => {
                tracing::debug!(%method, %uri, error = %e, "HTTP transport error");
                Err(HttpError::from(e))
            }
            Err(_) => {
                tracing::debug!(%method, %uri, ?timeout, "HTTP request timed out");
                Err(HttpError::Timeout(timeout))
            }
        }
    }
}
