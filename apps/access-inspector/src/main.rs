mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use access_control::{
    AccessRequirement, Guard, HttpPermissionSource, MenuFilter, MenuGroup, PermissionProvider,
    PermissionStore, use_permissions,
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use portal_http::HttpClientBuilder;
use portal_security::{AccessToken, Session};

use crate::config::{AppConfig, CliOverrides};

/// Inspect what the DDS portal shows to a user
#[derive(Parser)]
#[command(name = "access-inspector")]
#[command(about = "Resolve DDS portal navigation and access checks for a bearer token")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Bearer token of the user to inspect
    #[arg(long, env = "DDS_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Backend origin (overrides access_control.base_url)
    #[arg(long)]
    base_url: Option<String>,

    /// Allow a plain-HTTP backend
    #[arg(long)]
    insecure: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the navigation visible to the token as JSON
    Menu,
    /// Evaluate a requirement; exit code 0 when granted, 1 when denied
    Check {
        /// Permission name (repeatable)
        #[arg(long = "permission")]
        permissions: Vec<String>,
        /// Role name (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,
        /// Require every listed name instead of any
        #[arg(long)]
        require_all: bool,
        /// Require any of the configured `access_control.admin_roles`
        #[arg(long, conflicts_with_all = ["permissions", "roles", "require_all"])]
        admin: bool,
    },
    /// Print the effective configuration (YAML) and exit
    PrintConfig,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        base_url: cli.base_url.clone(),
        json_logs: cli.json_logs,
        allow_insecure_http: cli.insecure,
    });
    config.validate()?;

    logging::init_logging(&config.logging, cli.verbose)?;
    tracing::debug!(base_url = %config.access_control.base_url, "configuration loaded");

    match cli.command {
        Commands::PrintConfig => {
            print!("{}", config.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Menu => {
            let provider = sign_in(&config, cli.token.as_deref()).await?;
            let navigation = config.navigation();
            let rendered = provider
                .scope(async {
                    let store = use_permissions()?;
                    let snapshot = store.snapshot();
                    MenuFilter::new(&navigation)
                        .render(snapshot.as_ref(), serde_json::to_string_pretty::<[MenuGroup]>)
                        .context("failed to render navigation")
                })
                .await;
            provider.store().shutdown();

            println!("{}", rendered?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            permissions,
            roles,
            require_all,
            admin,
        } => {
            let guard = if admin {
                Guard::admin_for(config.access_control.admin_roles.clone(), "granted")
            } else {
                let requirement = AccessRequirement::builder()
                    .permissions(permissions)
                    .roles(roles)
                    .require_all(require_all)
                    .build();
                if requirement.is_unrestricted() {
                    tracing::warn!("no --permission or --role given; requirement always passes");
                }
                Guard::new(requirement, "granted")
            };

            let provider = sign_in(&config, cli.token.as_deref()).await?;
            let snapshot = provider.store().snapshot();
            provider.store().shutdown();

            let verdict = guard
                .with_fallback("denied")
                .into_view(snapshot.as_ref())
                .unwrap_or("denied");
            println!("{verdict}");
            Ok(if verdict == "granted" {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Build the store, open an authenticated session and wait for the first
/// fetch cycle to settle.
async fn sign_in(config: &AppConfig, token: Option<&str>) -> Result<PermissionProvider> {
    let token = token
        .map(AccessToken::new)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("missing access token: pass --token or set DDS_ACCESS_TOKEN"))?;

    let client = HttpClientBuilder::with_config(config.http.client_config())
        .build()
        .context("failed to build HTTP client")?;
    let source = HttpPermissionSource::from_config(&config.access_control, client)?;
    let store = PermissionStore::new(Arc::new(source), config.access_control.fetch_policy());
    let provider = PermissionProvider::new(store);

    provider.on_session(&Session::authenticated("access-inspector", token));
    let snapshot = provider.store().wait_settled().await;
    tracing::info!(
        permissions = snapshot.grants.permissions.len(),
        roles = snapshot.grants.roles.len(),
        "access resolved"
    );
    Ok(provider)
}
