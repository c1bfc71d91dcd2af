#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;

    use access_control_sdk::AccessSnapshot;
    use portal_security::{AccessRequirement, Grants};

    use super::super::guard::{Guard, GuardDecision, GuardedAction};
    use super::super::menu::use_filtered_menu;
    use super::super::navigation::navigation_for_admins;

    fn settled(permissions: &[&str], roles: &[&str]) -> AccessSnapshot {
        AccessSnapshot::settled(
            Grants::new(
                permissions.iter().copied().collect(),
                roles.iter().copied().collect(),
            ),
            1,
        )
    }

    #[test]
    fn permission_granted_renders_children() {
        let access = settled(&["invoice.create"], &[]);
        let guard = Guard::permission("invoice.create", "create-button").with_fallback("nothing");
        assert_eq!(guard.decide(&access), GuardDecision::Granted);
        assert_eq!(guard.render(&access), Some(&"create-button"));
    }

    #[test]
    fn missing_role_renders_fallback() {
        let access = settled(&["invoice.create"], &[]);
        let guard = Guard::role("admin", "admin-panel").with_fallback("no-access");
        assert_eq!(guard.decide(&access), GuardDecision::Denied);
        assert_eq!(guard.render(&access), Some(&"no-access"));
    }

    #[test]
    fn denied_without_fallback_renders_nothing() {
        let access = settled(&[], &[]);
        let guard = Guard::permission("invoice.delete", "delete-button");
        assert_eq!(guard.render(&access), None);
    }

    #[test]
    fn loading_never_renders_children() {
        let access = AccessSnapshot::initial();
        let guard = Guard::new(AccessRequirement::unrestricted(), "children")
            .with_fallback("fallback")
            .with_loading("spinner");
        assert_eq!(guard.decide(&access), GuardDecision::Loading);
        assert_eq!(guard.render(&access), Some(&"spinner"));

        let bare = Guard::new(AccessRequirement::unrestricted(), "children");
        assert_eq!(bare.render(&access), None);
    }

    #[test]
    fn configured_admin_roles_match_administration_menu() {
        let owner = settled(&["user.view"], &["owner"]);
        let admin = settled(&["user.view"], &["admin"]);
        let guard = Guard::admin_for(["owner"], "settings");
        let menu_shows_admin = |access: &AccessSnapshot| {
            use_filtered_menu(&navigation_for_admins(&["owner"]), access)
                .iter()
                .any(|g| g.label == "Administration")
        };

        assert_eq!(guard.render(&owner), Some(&"settings"));
        assert!(menu_shows_admin(&owner));
        assert_eq!(guard.render(&admin), None);
        assert!(!menu_shows_admin(&admin));
    }

    #[test]
    fn admin_variant_accepts_either_admin_role() {
        let guard = Guard::admin("settings");
        assert_eq!(guard.render(&settled(&[], &["superadmin"])), Some(&"settings"));
        assert_eq!(guard.render(&settled(&[], &["admin"])), Some(&"settings"));
        assert_eq!(guard.render(&settled(&[], &["finance"])), None);
    }

    #[test]
    fn any_variants_use_or() {
        let access = settled(&["report.view"], &["finance"]);
        assert!(Guard::any_permission(["invoice.view", "report.view"], ()).render(&access).is_some());
        assert!(Guard::any_role(["admin", "finance"], ()).render(&access).is_some());
        assert!(Guard::any_role(["admin", "accounting"], ()).render(&access).is_none());
    }

    #[test]
    fn into_view_moves_chosen_view() {
        let access = settled(&[], &[]);
        let guard = Guard::permission("p", String::from("yes")).with_fallback(String::from("no"));
        assert_eq!(guard.into_view(&access).as_deref(), Some("no"));
    }

    #[test]
    fn guarded_action_runs_only_when_visible() {
        let clicks = Cell::new(0);
        let action = GuardedAction::new(AccessRequirement::permission("invoice.create"), || {
            clicks.set(clicks.get() + 1);
            "created"
        });

        assert_eq!(action.invoke(&settled(&[], &[])), None);
        assert_eq!(action.invoke(&AccessSnapshot::initial()), None);
        assert_eq!(clicks.get(), 0);

        let allowed = settled(&["invoice.create"], &[]);
        assert!(action.is_visible(&allowed));
        assert_eq!(action.invoke(&allowed), Some("created"));
        assert_eq!(clicks.get(), 1);
    }
}
