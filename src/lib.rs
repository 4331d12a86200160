pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use cli::{AdminCommands, Cli, Commands, InquiryCommands, ProfileCommands};
pub use config::Config;
use state::SharedState;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    let command = cli.command.unwrap_or(Commands::Serve);

    if matches!(command, Commands::Init) {
        if Config::create_default_if_missing()? {
            println!("Created config.toml with default settings.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    config.validate()?;

    if matches!(command, Commands::Serve) {
        return run_server(config).await;
    }

    let state = SharedState::new(config).await?;

    match command {
        Commands::Profile { command } => match command {
            ProfileCommands::List => cli::cmd_profile_list(&state).await,
            ProfileCommands::Show { id } => cli::cmd_profile_show(&state, &id).await,
            ProfileCommands::Add(args) => cli::cmd_profile_add(&state, args).await,
            ProfileCommands::Edit { id, fields } => {
                cli::cmd_profile_edit(&state, &id, fields).await
            }
            ProfileCommands::Remove { id, yes } => {
                cli::cmd_profile_remove(&state, &id, yes).await
            }
        },
        Commands::Inquiry { command } => match command {
            InquiryCommands::List => cli::cmd_inquiry_list(&state).await,
            InquiryCommands::Remove { id } => cli::cmd_inquiry_remove(&state, &id).await,
        },
        Commands::Admin { command } => match command {
            AdminCommands::Show => cli::cmd_admin_show(&state).await,
            AdminCommands::SetPassword { password } => {
                cli::cmd_admin_set_password(&state, &password).await
            }
        },
        Commands::Serve | Commands::Init => Ok(()),
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("matchcrm v{} starting...", env!("CARGO_PKG_VERSION"));

    if config.is_in_memory() {
        warn!("Storage is in-memory; profiles and inquiries are lost on exit");
    }

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let shared = Arc::new(SharedState::new(config).await?);
    let app = api::router(api::create_app_state(shared));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Web Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
