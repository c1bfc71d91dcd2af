use portal_security::{AccessRequirement, AccessState, evaluate};

use crate::config::DEFAULT_ADMIN_ROLES;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Permissions are still being fetched; show the loading view.
    Loading,
    Granted,
    Denied,
}

/// Picks between a `children`, `fallback` and `loading` view.
///
/// While the store is loading the guard renders `loading` and never
/// `children`. Once settled it renders `children` if the requirement passes,
/// `fallback` otherwise. A missing view renders as `None`.
///
/// Guards only hide UI. They do not replace backend authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard<V> {
    requirement: AccessRequirement,
    children: V,
    fallback: Option<V>,
    loading: Option<V>,
}

impl<V> Guard<V> {
    #[must_use]
    pub fn new(requirement: AccessRequirement, children: V) -> Self {
        Self {
            requirement,
            children,
            fallback: None,
            loading: None,
        }
    }

    #[must_use]
    pub fn permission(name: impl Into<String>, children: V) -> Self {
        Self::new(AccessRequirement::permission(name), children)
    }

    #[must_use]
    pub fn any_permission<I, S>(names: I, children: V) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(AccessRequirement::any_permission(names), children)
    }

    #[must_use]
    pub fn role(name: impl Into<String>, children: V) -> Self {
        Self::new(AccessRequirement::role(name), children)
    }

    #[must_use]
    pub fn any_role<I, S>(names: I, children: V) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(AccessRequirement::any_role(names), children)
    }

    /// Any of `admin`, `superadmin`.
    #[must_use]
    pub fn admin(children: V) -> Self {
        Self::admin_for(DEFAULT_ADMIN_ROLES, children)
    }

    /// Any of `admin_roles`. Pass `AccessControlConfig::admin_roles` to agree
    /// with the administration menu built by `navigation_for_admins`.
    #[must_use]
    pub fn admin_for<I, S>(admin_roles: I, children: V) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::any_role(admin_roles, children)
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: V) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_loading(mut self, loading: V) -> Self {
        self.loading = Some(loading);
        self
    }

    #[must_use]
    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }

    pub fn decide<A: AccessState + ?Sized>(&self, access: &A) -> GuardDecision {
        if access.is_loading() {
            GuardDecision::Loading
        } else if evaluate(&self.requirement, access) {
            GuardDecision::Granted
        } else {
            GuardDecision::Denied
        }
    }

    pub fn render<A: AccessState + ?Sized>(&self, access: &A) -> Option<&V> {
        match self.decide(access) {
            GuardDecision::Loading => self.loading.as_ref(),
            GuardDecision::Granted => Some(&self.children),
            GuardDecision::Denied => self.fallback.as_ref(),
        }
    }

    /// Owned form of [`Guard::render`].
    pub fn into_view<A: AccessState + ?Sized>(self, access: &A) -> Option<V> {
        match self.decide(access) {
            GuardDecision::Loading => self.loading,
            GuardDecision::Granted => Some(self.children),
            GuardDecision::Denied => self.fallback,
        }
    }
}

/// An action (button, menu command) shown and invokable only when its
/// requirement passes on a settled store.
///
/// Hidden actions render nothing; there is no disabled state.
#[derive(Debug, Clone)]
pub struct GuardedAction<F> {
    requirement: AccessRequirement,
    action: F,
}

impl<F> GuardedAction<F> {
    #[must_use]
    pub fn new(requirement: AccessRequirement, action: F) -> Self {
        Self {
            requirement,
            action,
        }
    }

    #[must_use]
    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }

    pub fn is_visible<A: AccessState + ?Sized>(&self, access: &A) -> bool {
        !access.is_loading() && evaluate(&self.requirement, access)
    }

    /// Run the action if visible; `None` when hidden.
    pub fn invoke<A, R>(&self, access: &A) -> Option<R>
    where
        A: AccessState + ?Sized,
        F: Fn() -> R,
    {
        self.is_visible(access).then(|| (self.action)())
    }
}
