#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use access_control_sdk::AccessSnapshot;
    use portal_security::{AccessRequirement, Grants};

    use super::super::menu::{MenuFilter, MenuGroup, MenuNode, filter_menu, use_filtered_menu};
    use super::super::navigation::{default_navigation, navigation_for_admins};

    fn settled(permissions: &[&str], roles: &[&str]) -> AccessSnapshot {
        AccessSnapshot::settled(
            Grants::new(
                permissions.iter().copied().collect(),
                roles.iter().copied().collect(),
            ),
            1,
        )
    }

    fn labels(groups: &[MenuGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.label.as_str()).collect()
    }

    fn item_labels(group: &MenuGroup) -> Vec<&str> {
        group.items.iter().map(|i| i.label.as_str()).collect()
    }

    fn finance_group(require_all: bool) -> MenuGroup {
        MenuGroup::new("Finance", vec![MenuNode::new("Ledger", "/ledger")]).requires(
            AccessRequirement::builder()
                .roles(["admin", "finance"])
                .require_all(require_all)
                .build(),
        )
    }

    #[test]
    fn require_all_roles_needs_both() {
        let groups = vec![finance_group(true)];
        assert!(filter_menu(&groups, &settled(&[], &["admin"])).is_empty());
        assert_eq!(
            labels(&filter_menu(&groups, &settled(&[], &["admin", "finance"]))),
            vec!["Finance"]
        );
    }

    #[test]
    fn any_role_needs_one() {
        let groups = vec![finance_group(false)];
        assert_eq!(labels(&filter_menu(&groups, &settled(&[], &["finance"]))), vec!["Finance"]);
        assert!(filter_menu(&groups, &settled(&[], &["clerk"])).is_empty());
    }

    #[test]
    fn group_with_no_visible_items_is_dropped() {
        let groups = vec![MenuGroup::new(
            "Documents",
            vec![
                MenuNode::new("Invoices", "/invoices")
                    .requires(AccessRequirement::permission("invoice.view")),
            ],
        )];
        assert!(filter_menu(&groups, &settled(&["supplier.view"], &[])).is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let groups = vec![
            MenuGroup::new(
                "B",
                vec![
                    MenuNode::new("b2", "/b2"),
                    MenuNode::new("hidden", "/h").requires(AccessRequirement::permission("nope")),
                    MenuNode::new("b1", "/b1"),
                ],
            ),
            MenuGroup::new("A", vec![MenuNode::new("a1", "/a1")]),
        ];
        let visible = filter_menu(&groups, &settled(&[], &[]));
        assert_eq!(labels(&visible), vec!["B", "A"]);
        assert_eq!(item_labels(&visible[0]), vec!["b2", "b1"]);
    }

    #[test]
    fn loading_yields_empty_tree_in_both_forms() {
        let groups = default_navigation();
        let loading = AccessSnapshot::initial();

        assert!(use_filtered_menu(&groups, &loading).is_empty());
        let rendered = MenuFilter::new(&groups).render(&loading, <[MenuGroup]>::len);
        assert_eq!(rendered, 0);
    }

    #[test]
    fn hook_and_render_prop_agree() {
        let groups = default_navigation();
        let access = settled(&["invoice.view", "distribution.view"], &["finance"]);

        let hooked = use_filtered_menu(&groups, &access);
        let rendered = MenuFilter::new(&groups).render(&access, <[MenuGroup]>::to_vec);
        assert_eq!(hooked, rendered);
    }

    #[test]
    fn default_navigation_for_clerk() {
        let access = settled(&["invoice.view", "invoice.create"], &["clerk"]);
        let visible = use_filtered_menu(&default_navigation(), &access);

        assert_eq!(labels(&visible), vec!["Main", "Documents"]);
        assert_eq!(item_labels(&visible[1]), vec!["Invoices", "Create Invoice"]);
    }

    #[test]
    fn administration_follows_admin_roles() {
        let access = settled(&["user.view"], &["owner"]);

        let default_visible = use_filtered_menu(&default_navigation(), &access);
        assert!(!labels(&default_visible).contains(&"Administration"));

        let custom = navigation_for_admins(&["owner"]);
        let custom_visible = use_filtered_menu(&custom, &access);
        assert!(labels(&custom_visible).contains(&"Administration"));
        // reports need a report or document permission as well
        assert!(!labels(&custom_visible).contains(&"Reports"));
    }

    #[test]
    fn requirement_fields_flatten_onto_entries() {
        let json = r#"[{
            "label": "Reports",
            "roles": ["admin", "finance"],
            "require_all": true,
            "items": [
                {"label": "Analytics", "href": "/reports", "icon": "chart", "permission": "report.view"}
            ]
        }]"#;
        let groups: Vec<MenuGroup> = serde_json::from_str(json).unwrap();

        assert_eq!(groups[0].requirement.roles(), ["admin", "finance"]);
        assert!(groups[0].requirement.require_all());
        assert_eq!(groups[0].items[0].requirement.single_permission(), Some("report.view"));
        assert_eq!(groups[0].items[0].icon.as_deref(), Some("chart"));

        let back = serde_json::to_value(&groups[0].items[0]).unwrap();
        assert_eq!(back["permission"], "report.view");
        assert!(back.get("roles").is_none());
    }

    #[test]
    fn entry_without_requirement_is_unrestricted() {
        let node: MenuNode = serde_json::from_str(r#"{"label":"Home","href":"/"}"#).unwrap();
        assert!(node.requirement.is_unrestricted());
        assert_eq!(filter_menu(&[MenuGroup::new("g", vec![node])], &settled(&[], &[])).len(), 1);
    }
}
