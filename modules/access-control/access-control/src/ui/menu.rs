use portal_security::{AccessCheck, AccessRequirement, AccessState, evaluate};
use serde::{Deserialize, Serialize};

/// Navigation entry. Requirement fields sit directly on the entry:
///
/// ```yaml
/// label: Invoices
/// href: /invoices
/// permissions: [invoice.view, invoice.create]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub requirement: AccessRequirement,
}

impl MenuNode {
    #[must_use]
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            icon: None,
            requirement: AccessRequirement::unrestricted(),
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn requires(mut self, requirement: AccessRequirement) -> Self {
        self.requirement = requirement;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuGroup {
    pub label: String,
    pub items: Vec<MenuNode>,
    #[serde(flatten)]
    pub requirement: AccessRequirement,
}

impl MenuGroup {
    #[must_use]
    pub fn new(label: impl Into<String>, items: Vec<MenuNode>) -> Self {
        Self {
            label: label.into(),
            items,
            requirement: AccessRequirement::unrestricted(),
        }
    }

    #[must_use]
    pub fn requires(mut self, requirement: AccessRequirement) -> Self {
        self.requirement = requirement;
        self
    }
}

/// Keep the groups and items `access` may see, in source order.
///
/// A group survives only if its own requirement passes and at least one of
/// its items does.
pub fn filter_menu<A: AccessCheck + ?Sized>(groups: &[MenuGroup], access: &A) -> Vec<MenuGroup> {
    groups
        .iter()
        .filter(|group| evaluate(&group.requirement, access))
        .filter_map(|group| {
            let items: Vec<MenuNode> = group
                .items
                .iter()
                .filter(|item| evaluate(&item.requirement, access))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| MenuGroup {
                label: group.label.clone(),
                items,
                requirement: group.requirement.clone(),
            })
        })
        .collect()
}

/// Filtered tree for the current state; empty while loading.
pub fn use_filtered_menu<A: AccessState + ?Sized>(groups: &[MenuGroup], access: &A) -> Vec<MenuGroup> {
    if access.is_loading() {
        return Vec::new();
    }
    filter_menu(groups, access)
}

/// Render-prop form of [`use_filtered_menu`].
#[derive(Debug, Clone, Copy)]
pub struct MenuFilter<'a> {
    groups: &'a [MenuGroup],
}

impl<'a> MenuFilter<'a> {
    #[must_use]
    pub fn new(groups: &'a [MenuGroup]) -> Self {
        Self { groups }
    }

    /// Hand the filtered tree to `render`.
    pub fn render<A, R, F>(&self, access: &A, render: F) -> R
    where
        A: AccessState + ?Sized,
        F: FnOnce(&[MenuGroup]) -> R,
    {
        let visible = use_filtered_menu(self.groups, access);
        render(&visible)
    }
}
