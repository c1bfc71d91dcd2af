use serde::{Deserialize, Serialize};

/// Access requirement attached to a guard or a navigation entry.
///
/// Every present group must pass (permission, permissions, role, roles are
/// ANDed together). Inside a list, `require_all` selects AND (`true`) or OR
/// (`false`, the default).
///
/// The record is normalized on construction: blank names are dropped and an
/// empty list is the same as an absent one. A requirement with no groups at
/// all is *unrestricted* and always passes; check
/// [`is_unrestricted`](Self::is_unrestricted) when that matters.
///
/// # Example
///
/// ```
/// use portal_security::AccessRequirement;
///
/// let req = AccessRequirement::builder()
///     .roles(["admin", "finance"])
///     .require_all(true)
///     .build();
/// assert!(!req.is_unrestricted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRequirement", into = "RawRequirement")]
pub struct AccessRequirement {
    permission: Option<String>,
    permissions: Vec<String>,
    role: Option<String>,
    roles: Vec<String>,
    require_all: bool,
}

impl AccessRequirement {
    #[must_use]
    pub fn builder() -> AccessRequirementBuilder {
        AccessRequirementBuilder::default()
    }

    /// Requirement that grants access to everyone.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Single permission.
    #[must_use]
    pub fn permission(name: impl Into<String>) -> Self {
        Self::builder().permission(name).build()
    }

    /// Any of the given permissions.
    #[must_use]
    pub fn any_permission<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().permissions(names).build()
    }

    /// Single role.
    #[must_use]
    pub fn role(name: impl Into<String>) -> Self {
        Self::builder().role(name).build()
    }

    /// Any of the given roles.
    #[must_use]
    pub fn any_role<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().roles(names).build()
    }

    #[must_use]
    pub fn single_permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    #[must_use]
    pub fn single_role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub fn require_all(&self) -> bool {
        self.require_all
    }

    /// `true` when no group is set, i.e. the requirement always passes.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.permission.is_none()
            && self.permissions.is_empty()
            && self.role.is_none()
            && self.roles.is_empty()
    }
}

/// Builder producing a normalized [`AccessRequirement`].
#[derive(Debug, Default)]
pub struct AccessRequirementBuilder {
    permission: Option<String>,
    permissions: Vec<String>,
    role: Option<String>,
    roles: Vec<String>,
    require_all: bool,
}

impl AccessRequirementBuilder {
    #[must_use]
    pub fn permission(mut self, name: impl Into<String>) -> Self {
        self.permission = Some(name.into());
        self
    }

    #[must_use]
    pub fn permissions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn role(mut self, name: impl Into<String>) -> Self {
        self.role = Some(name.into());
        self
    }

    #[must_use]
    pub fn roles<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(names.into_iter().map(Into::into));
        self
    }

    /// AND (`true`) vs OR (`false`) within the `permissions` and `roles` lists.
    #[must_use]
    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    #[must_use]
    pub fn build(self) -> AccessRequirement {
        AccessRequirement {
            permission: normalize_name(self.permission),
            permissions: normalize_list(self.permissions),
            role: normalize_name(self.role),
            roles: normalize_list(self.roles),
            require_all: self.require_all,
        }
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty())
}

fn normalize_list(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter_map(|n| normalize_name(Some(n)))
        .collect()
}

/// Wire shape: all fields optional, flattened onto guards and menu entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawRequirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    permission: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    roles: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    require_all: bool,
}

impl From<RawRequirement> for AccessRequirement {
    fn from(raw: RawRequirement) -> Self {
        let mut builder = AccessRequirement::builder()
            .permissions(raw.permissions)
            .roles(raw.roles)
            .require_all(raw.require_all);
        if let Some(permission) = raw.permission {
            builder = builder.permission(permission);
        }
        if let Some(role) = raw.role {
            builder = builder.role(role);
        }
        builder.build()
    }
}

impl From<AccessRequirement> for RawRequirement {
    fn from(req: AccessRequirement) -> Self {
        Self {
            permission: req.permission,
            permissions: req.permissions,
            role: req.role,
            roles: req.roles,
            require_all: req.require_all,
        }
    }
}
