//! Access control for the DDS portal.
//!
//! The [`PermissionStore`] fetches the user's permission and role names once
//! per authenticated session and publishes immutable snapshots. Guards and the
//! menu filter evaluate [`AccessRequirement`]s against those snapshots.
//!
//! Everything here is presentation-only: hiding a button or a menu entry never
//! replaces the backend's own authorization.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]

pub use access_control_sdk::{
    AccessError, AccessSnapshot, FetchError, PermissionSource, PermissionsResponse, RolesResponse,
};
pub use portal_security::{AccessCheck, AccessRequirement, AccessState, evaluate};

pub mod config;
pub mod domain;
pub mod infra;
pub mod ui;

pub use config::{AccessControlConfig, ConfigError, DEFAULT_ADMIN_ROLES, Endpoints};
pub use domain::backoff::Backoff;
pub use domain::provider::{PermissionProvider, use_permissions};
pub use domain::store::{FetchPolicy, PermissionStore};
pub use infra::http_source::HttpPermissionSource;
pub use ui::guard::{Guard, GuardDecision, GuardedAction};
pub use ui::menu::{MenuFilter, MenuGroup, MenuNode, filter_menu, use_filtered_menu};
pub use ui::navigation::{default_navigation, navigation_for_admins};
