//! Wire models and the published store snapshot.

use portal_security::{AccessCheck, AccessState, Grants};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/auth/user-permissions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsResponse {
    pub permissions: Vec<String>,
}

/// Body of `GET /api/auth/user-roles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

/// Immutable view of the permission store at one point in time.
///
/// A new snapshot is published on every transition; readers never see a
/// half-applied update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessSnapshot {
    pub grants: Grants,
    /// `true` from fetch start until a terminal success or failure.
    pub loading: bool,
    /// Timeout retries performed so far in the current fetch cycle.
    pub retry_count: u32,
    /// Fetch cycle that produced this snapshot.
    pub generation: u64,
}

impl AccessSnapshot {
    /// State before the session source has resolved: no grants, loading.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            grants: Grants::empty(),
            loading: true,
            retry_count: 0,
            generation: 0,
        }
    }

    /// Cleared state after logout: no grants, not loading.
    #[must_use]
    pub fn cleared(generation: u64) -> Self {
        Self {
            grants: Grants::empty(),
            loading: false,
            retry_count: 0,
            generation,
        }
    }

    /// Terminal state of a fetch cycle.
    #[must_use]
    pub fn settled(grants: Grants, generation: u64) -> Self {
        Self {
            grants,
            loading: false,
            retry_count: 0,
            generation,
        }
    }
}

impl AccessCheck for AccessSnapshot {
    fn has_permission(&self, name: &str) -> bool {
        self.grants.has_permission(name)
    }

    fn has_role(&self, name: &str) -> bool {
        self.grants.has_role(name)
    }
}

impl AccessState for AccessSnapshot {
    fn is_loading(&self) -> bool {
        self.loading
    }
}
