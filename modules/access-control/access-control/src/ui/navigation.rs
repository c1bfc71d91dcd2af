use portal_security::AccessRequirement;

use super::menu::{MenuGroup, MenuNode};
use crate::config::DEFAULT_ADMIN_ROLES;

/// The portal's sidebar, administration gated on `admin` / `superadmin`.
#[must_use]
pub fn default_navigation() -> Vec<MenuGroup> {
    navigation_for_admins(&DEFAULT_ADMIN_ROLES)
}

/// The portal's sidebar with a custom set of administrator roles.
#[must_use]
pub fn navigation_for_admins<S: AsRef<str>>(admin_roles: &[S]) -> Vec<MenuGroup> {
    let admins: Vec<String> = admin_roles.iter().map(|r| r.as_ref().to_owned()).collect();
    let analysts = admins
        .iter()
        .cloned()
        .chain(["accounting".to_owned(), "finance".to_owned()]);

    vec![
        MenuGroup::new(
            "Main",
            vec![MenuNode::new("Dashboard", "/dashboard").icon("home")],
        ),
        MenuGroup::new(
            "Documents",
            vec![
                MenuNode::new("Invoices", "/invoices")
                    .icon("file-text")
                    .requires(AccessRequirement::permission("invoice.view")),
                MenuNode::new("Create Invoice", "/invoices/create")
                    .icon("file-plus")
                    .requires(AccessRequirement::permission("invoice.create")),
                MenuNode::new("Additional Documents", "/additional-documents")
                    .icon("files")
                    .requires(AccessRequirement::permission("additional-document.view")),
                MenuNode::new("Suppliers", "/suppliers")
                    .icon("truck")
                    .requires(AccessRequirement::permission("supplier.view")),
            ],
        ),
        MenuGroup::new(
            "Distribution",
            vec![
                MenuNode::new("Distributions", "/distributions")
                    .icon("send")
                    .requires(AccessRequirement::permission("distribution.view")),
                MenuNode::new("Create Distribution", "/distributions/create")
                    .icon("plus")
                    .requires(AccessRequirement::permission("distribution.create")),
            ],
        ),
        MenuGroup::new(
            "Reports",
            vec![
                MenuNode::new("Invoice Analytics", "/reports/invoices")
                    .icon("bar-chart")
                    .requires(AccessRequirement::any_permission([
                        "report.view",
                        "invoice.view",
                    ])),
                MenuNode::new("Distribution Analytics", "/reports/distributions")
                    .icon("pie-chart")
                    .requires(AccessRequirement::any_permission([
                        "report.view",
                        "distribution.view",
                    ])),
            ],
        )
        .requires(AccessRequirement::any_role(analysts)),
        MenuGroup::new(
            "Administration",
            vec![
                MenuNode::new("Users", "/admin/users")
                    .icon("users")
                    .requires(AccessRequirement::permission("user.view")),
                MenuNode::new("Roles", "/admin/roles")
                    .icon("shield")
                    .requires(AccessRequirement::permission("role.view")),
                MenuNode::new("Permissions", "/admin/permissions")
                    .icon("key")
                    .requires(AccessRequirement::permission("permission.view")),
            ],
        )
        .requires(AccessRequirement::any_role(admins)),
    ]
}
