#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP client for the DDS portal backend.
//!
//! A small hyper-based client with:
//! - TLS via rustls with webpki roots (HTTPS only by default)
//! - Connection pooling
//! - Per-request timeout
//! - Bearer authentication helper
//! - Size-limited JSON body decoding
//!
//! Retries are deliberately not part of this client: callers that need a
//! retry policy (the permission store) drive it themselves so that paired
//! requests are retried together.
//!
//! # Example
//!
//! ```ignore
//! use portal_http::HttpClientBuilder;
//! use std::time::Duration;
//!
//! let client = HttpClientBuilder::new()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let body: MyData = client
//!     .get("https://portal.example.com/api/auth/user-roles")
//!     .bearer_auth(token.expose())
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use request::RequestBuilder;
pub use response::HttpResponse;
