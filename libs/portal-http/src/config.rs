use std::time::Duration;

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("dds-portal-http/", env!("CARGO_PKG_VERSION"));

/// Largest response body read into memory, 1 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Which URL schemes the client will connect to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// `https` only
    #[default]
    TlsOnly,
    /// `http` too, for local backends and mock servers
    ///
    /// **WARNING**: Never use against a production backend; bearer tokens
    /// travel in clear text.
    AllowInsecureHttp,
}

/// Settings consumed by [`HttpClientBuilder`](crate::HttpClientBuilder).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Timeout for a single request up to the response head (default: 30 seconds)
    pub request_timeout: Duration,

    /// User-Agent header value (default: `dds-portal-http/<version>`)
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 1 MiB)
    pub max_body_size: usize,

    /// Transport security mode (default: `TlsOnly`)
    pub transport: TransportSecurity,

    /// Maximum idle connections kept per host (default: 8)
    pub pool_max_idle_per_host: usize,

    /// How long idle pooled connections are kept (default: 90 seconds)
    pub pool_idle_timeout: Option<Duration>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            transport: TransportSecurity::TlsOnly,
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl HttpClientConfig {
    /// Configuration for the portal REST backend.
    ///
    /// Shorter request timeout than the default; the permission store adds
    /// its own per-attempt deadline on top.
    #[must_use]
    pub fn backend() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }

    /// Configuration for tests against local mock servers (plain HTTP allowed).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            transport: TransportSecurity::AllowInsecureHttp,
            pool_idle_timeout: None,
            ..Default::default()
        }
    }
}
