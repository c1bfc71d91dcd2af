//! Layered configuration for the inspector.
//!
//! Sources, later ones win:
//! 1. `AppConfig::default()`
//! 2. YAML file from `--config`
//! 3. environment variables `DDS__<SECTION>__<KEY>` (e.g.
//!    `DDS__ACCESS_CONTROL__BASE_URL`)
//! 4. command-line flags

use std::path::Path;
use std::time::Duration;

use access_control::{AccessControlConfig, MenuGroup};
use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use portal_http::{DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "DDS__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub access_control: AccessControlConfig,
    pub http: HttpSection,
    /// Replaces the built-in portal navigation when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Vec<MenuGroup>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `access_control=debug,warn`.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub request_timeout_ms: u64,
    pub user_agent: String,
    pub max_body_size: usize,
    /// Permit `http://` backends. Bearer tokens travel in clear text.
    pub allow_insecure_http: bool,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            allow_insecure_http: false,
        }
    }
}

impl HttpSection {
    #[must_use]
    pub fn client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            user_agent: self.user_agent.clone(),
            max_body_size: self.max_body_size,
            transport: if self.allow_insecure_http {
                TransportSecurity::AllowInsecureHttp
            } else {
                TransportSecurity::TlsOnly
            },
            ..HttpClientConfig::backend()
        }
    }
}

/// Values from command-line flags that override every other source.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub json_logs: bool,
    pub allow_insecure_http: bool,
}

impl AppConfig {
    /// Defaults, then the optional YAML file, then `DDS__*` environment.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the layered configuration and check the access-control section.
    ///
    /// The transport check waits for [`AppConfig::validate`] so that
    /// `--insecure` can still allow a plain-http backend from the file.
    ///
    /// # Errors
    /// Fails if a source cannot be parsed or the access-control section is
    /// invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(path)
            .extract()
            .context("failed to load configuration")?;
        config
            .access_control
            .validate()
            .context("invalid access_control section")?;
        Ok(config)
    }

    /// # Errors
    /// Returns the first invalid access-control setting, or refuses an
    /// `http://` backend while `http.allow_insecure_http` is off.
    pub fn validate(&self) -> Result<()> {
        let endpoints = self
            .access_control
            .endpoints()
            .and_then(|endpoints| self.access_control.validate().map(|()| endpoints))
            .context("invalid access_control section")?;
        if endpoints.permissions.scheme() == "http" && !self.http.allow_insecure_http {
            bail!(
                "access_control.base_url '{}' is plain http; use https or set \
                 http.allow_insecure_http (--insecure)",
                self.access_control.base_url
            );
        }
        Ok(())
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(base_url) = &cli.base_url {
            self.access_control.base_url.clone_from(base_url);
        }
        if cli.json_logs {
            self.logging.json = true;
        }
        if cli.allow_insecure_http {
            self.http.allow_insecure_http = true;
        }
    }

    /// Navigation tree to filter: the configured one or the portal default.
    #[must_use]
    pub fn navigation(&self) -> Vec<MenuGroup> {
        self.navigation.clone().unwrap_or_else(|| {
            access_control::navigation_for_admins(&self.access_control.admin_roles)
        })
    }

    /// # Errors
    /// Fails if the configuration cannot be serialized.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}
