use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::domain::backoff::Backoff;
use crate::domain::store::FetchPolicy;

/// Roles that pass `Guard::admin` and see the administration menu.
pub const DEFAULT_ADMIN_ROLES: [&str; 2] = ["admin", "superadmin"];

/// Access-control settings, usually the `access_control` section of the
/// application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessControlConfig {
    /// Backend origin, e.g. `https://portal.example.com`.
    pub base_url: String,
    pub permissions_path: String,
    pub roles_path: String,
    /// Wait between the session becoming authenticated and the first fetch.
    pub settle_delay_ms: u64,
    /// Deadline for one attempt (both fetches together).
    pub attempt_timeout_ms: u64,
    /// Timeout retries after the initial attempt.
    pub max_retries: u32,
    pub backoff_initial_ms: u64,
    pub backoff_multiplier: f64,
    pub backoff_max_ms: u64,
    pub admin_roles: Vec<String>,
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8000".to_owned(),
            permissions_path: "/api/auth/user-permissions".to_owned(),
            roles_path: "/api/auth/user-roles".to_owned(),
            settle_delay_ms: 100,
            attempt_timeout_ms: 5_000,
            max_retries: 3,
            backoff_initial_ms: 1_000,
            backoff_multiplier: 2.0,
            backoff_max_ms: 8_000,
            admin_roles: DEFAULT_ADMIN_ROLES.iter().map(|r| (*r).to_owned()).collect(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid endpoint path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Absolute URLs of the two backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub permissions: Url,
    pub roles: Url,
}

impl AccessControlConfig {
    /// Check numeric ranges and resolve the endpoint URLs.
    ///
    /// # Errors
    /// Returns `ConfigError` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempt_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "attempt_timeout_ms",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: format!("must be a finite number >= 1.0, got {}", self.backoff_multiplier),
            });
        }
        if self.backoff_initial_ms > self.backoff_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "backoff_max_ms",
                reason: format!(
                    "must not be below backoff_initial_ms ({})",
                    self.backoff_initial_ms
                ),
            });
        }
        self.endpoints().map(|_| ())
    }

    /// Resolve `permissions_path` and `roles_path` against `base_url`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the base URL does not parse or a path is not
    /// an absolute path.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let base = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "cannot be used as a base".to_owned(),
            });
        }

        Ok(Endpoints {
            permissions: join_path(&base, &self.permissions_path)?,
            roles: join_path(&base, &self.roles_path)?,
        })
    }

    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.backoff_initial_ms),
            Duration::from_millis(self.backoff_max_ms),
            self.backoff_multiplier,
        )
    }

    #[must_use]
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
            max_retries: self.max_retries,
            backoff: self.backoff(),
        }
    }
}

fn join_path(base: &Url, path: &str) -> Result<Url, ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::InvalidPath {
            path: path.to_owned(),
            reason: "must start with '/'".to_owned(),
        });
    }
    base.join(path).map_err(|e| ConfigError::InvalidPath {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_portal_backend() {
        let cfg = AccessControlConfig::default();
        assert_eq!(cfg.settle_delay_ms, 100);
        assert_eq!(cfg.attempt_timeout_ms, 5_000);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.admin_roles, vec!["admin", "superadmin"]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn endpoints_join_base_and_paths() {
        let cfg = AccessControlConfig {
            base_url: "https://portal.example.com/ignored".to_owned(),
            ..Default::default()
        };
        let ep = cfg.endpoints().unwrap();
        assert_eq!(
            ep.permissions.as_str(),
            "https://portal.example.com/api/auth/user-permissions"
        );
        assert_eq!(ep.roles.as_str(), "https://portal.example.com/api/auth/user-roles");
    }

    #[test]
    fn relative_path_is_rejected() {
        let cfg = AccessControlConfig {
            roles_path: "api/auth/user-roles".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.endpoints(),
            Err(ConfigError::InvalidPath { .. })
        ));
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        let cfg = AccessControlConfig {
            base_url: "not a url".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = AccessControlConfig {
            attempt_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue {
                field: "attempt_timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn shrinking_multiplier_is_rejected() {
        let cfg = AccessControlConfig {
            backoff_multiplier: 0.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn fetch_policy_converts_units() {
        let policy = AccessControlConfig::default().fetch_policy();
        assert_eq!(policy.settle_delay, Duration::from_millis(100));
        assert_eq!(policy.attempt_timeout, Duration::from_secs(5));
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.backoff.delay(0), Duration::from_secs(1));
    }

    #[test]
    fn partial_yaml_like_input_keeps_defaults() {
        let cfg: AccessControlConfig =
            serde_json::from_str(r#"{"base_url":"https://dds.local","max_retries":1}"#).unwrap();
        assert_eq!(cfg.base_url, "https://dds.local");
        assert_eq!(cfg.max_retries, 1);
        assert_eq!(cfg.roles_path, "/api/auth/user-roles");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_str::<AccessControlConfig>(r#"{"retries":1}"#);
        assert!(res.is_err());
    }
}
