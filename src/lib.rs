pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, UserCommands};
pub use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "across")?
            .extra_field("env", if config.general.debug { "debug" } else { "production" })?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let prometheus_handle = if config.observability.metrics_enabled {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("Failed to install Prometheus recorder")?;
                info!("Prometheus metrics recorder initialized");
                Some(handle)
            } else {
                None
            };

            cli::cmd_serve(config, prometheus_handle).await
        }

        Commands::Migrate { reset } => cli::cmd_migrate(&config, reset).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                firstname,
                lastname,
                password,
                roles,
            } => cli::cmd_user_create(&config, &email, &firstname, &lastname, &password, roles).await,
            UserCommands::List => cli::cmd_user_list(&config).await,
            UserCommands::Grant { email, role } => cli::cmd_user_grant(&config, &email, role).await,
            UserCommands::Revoke { email, role } => {
                cli::cmd_user_revoke(&config, &email, role).await
            }
            UserCommands::Token { email } => cli::cmd_user_token(&config, &email).await,
            UserCommands::ResetToken { email, expires_in } => {
                cli::cmd_user_reset_token(&config, &email, expires_in).await
            }
            UserCommands::Delete { email } => cli::cmd_user_delete(&config, &email).await,
        },
    }
}
