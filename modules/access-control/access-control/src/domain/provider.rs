//! Task-scoped access to the permission store.
//!
//! Views reach the store through [`use_permissions`] instead of a global.
//! The store is installed for a task with [`PermissionProvider::scope`];
//! asking for it anywhere else is a programming error reported as
//! [`AccessError::OutsideProvider`].

use std::future::Future;

use access_control_sdk::AccessError;
use portal_security::Session;

use super::store::PermissionStore;

tokio::task_local! {
    static CURRENT_STORE: PermissionStore;
}

/// Owns a [`PermissionStore`] and makes it visible to code running inside
/// its scopes.
#[derive(Debug, Clone)]
pub struct PermissionProvider {
    store: PermissionStore,
}

impl PermissionProvider {
    #[must_use]
    pub fn new(store: PermissionStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &PermissionStore {
        &self.store
    }

    /// Forward a session transition to the store.
    pub fn on_session(&self, session: &Session) {
        self.store.on_session(session);
    }

    /// Run `fut` with this provider's store installed.
    pub async fn scope<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_STORE.scope(self.store.clone(), fut).await
    }

    /// Synchronous form of [`PermissionProvider::scope`].
    pub fn sync_scope<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_STORE.sync_scope(self.store.clone(), f)
    }
}

/// The store installed by the enclosing [`PermissionProvider`] scope.
///
/// # Errors
/// Returns [`AccessError::OutsideProvider`] when called outside any scope.
pub fn use_permissions() -> Result<PermissionStore, AccessError> {
    CURRENT_STORE
        .try_with(PermissionStore::clone)
        .map_err(|_| AccessError::OutsideProvider)
}
