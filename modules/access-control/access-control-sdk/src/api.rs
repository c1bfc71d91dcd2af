//! `PermissionSource` trait definition.

use async_trait::async_trait;
use portal_security::{AccessToken, NameSet};

use crate::errors::FetchError;

/// Backend that knows the current user's permission and role names.
///
/// The permission store calls both methods concurrently for one attempt and
/// owns timeouts and retries; implementations make a single request each.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Permission names held by the token's user.
    async fn fetch_permissions(&self, token: &AccessToken) -> Result<NameSet, FetchError>;

    /// Role names held by the token's user.
    async fn fetch_roles(&self, token: &AccessToken) -> Result<NameSet, FetchError>;
}
