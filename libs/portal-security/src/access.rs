use serde::{Deserialize, Serialize};

use crate::names::NameSet;
use crate::requirement::AccessRequirement;

/// Permission and role predicates over the current user's grants.
///
/// Only `has_permission` and `has_role` are required; the list forms derive
/// from them.
pub trait AccessCheck {
    fn has_permission(&self, name: &str) -> bool;

    fn has_role(&self, name: &str) -> bool;

    /// OR over `names`.
    fn has_any_permission(&self, names: &[String]) -> bool {
        names.iter().any(|n| self.has_permission(n))
    }

    /// AND over `names`.
    fn has_all_permissions(&self, names: &[String]) -> bool {
        names.iter().all(|n| self.has_permission(n))
    }

    /// OR over `names`.
    fn has_any_role(&self, names: &[String]) -> bool {
        names.iter().any(|n| self.has_role(n))
    }

    /// AND over `names`.
    fn has_all_roles(&self, names: &[String]) -> bool {
        names.iter().all(|n| self.has_role(n))
    }
}

/// Access predicates plus the loading flag guards need to pick a view.
pub trait AccessState: AccessCheck {
    /// `true` while a permission fetch is in flight.
    fn is_loading(&self) -> bool;
}

/// The user's permission and role sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants {
    pub permissions: NameSet,
    pub roles: NameSet,
}

impl Grants {
    #[must_use]
    pub fn new(permissions: NameSet, roles: NameSet) -> Self {
        Self { permissions, roles }
    }

    /// No permissions, no roles: the fail-closed value.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty()
    }
}

impl AccessCheck for Grants {
    fn has_permission(&self, name: &str) -> bool {
        self.permissions.contains(name)
    }

    fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }
}

/// Evaluate `requirement` against `access`.
///
/// 1. `permission` must be held, if set.
/// 2. `permissions`: all (`require_all`) or any of them, if non-empty.
/// 3. `role` must be held, if set.
/// 4. `roles`: all (`require_all`) or any of them, if non-empty.
///
/// Groups are ANDed. A requirement with no groups evaluates to `true`.
pub fn evaluate<A: AccessCheck + ?Sized>(requirement: &AccessRequirement, access: &A) -> bool {
    let mut granted = true;

    if let Some(permission) = requirement.single_permission() {
        granted &= access.has_permission(permission);
    }

    let permissions = requirement.permissions();
    if !permissions.is_empty() {
        granted &= if requirement.require_all() {
            access.has_all_permissions(permissions)
        } else {
            access.has_any_permission(permissions)
        };
    }

    if let Some(role) = requirement.single_role() {
        granted &= access.has_role(role);
    }

    let roles = requirement.roles();
    if !roles.is_empty() {
        granted &= if requirement.require_all() {
            access.has_all_roles(roles)
        } else {
            access.has_any_role(roles)
        };
    }

    granted
}
