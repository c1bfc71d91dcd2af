//! Access-control SDK
//!
//! This crate provides the public contract of the access-control module:
//! - `PermissionSource` trait, the seam to the REST backend
//! - Wire models (`PermissionsResponse`, `RolesResponse`)
//! - `AccessSnapshot`, the immutable state published by the permission store
//! - Error types (`FetchError`, `AccessError`)

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::PermissionSource;
pub use errors::{AccessError, FetchError};
pub use models::{AccessSnapshot, PermissionsResponse, RolesResponse};
