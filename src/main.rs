//! Automation Engine entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use automation_engine::api::{create_router, AppState};
use automation_engine::config::{Config, Environment};
use automation_engine::error::AppError;
use automation_engine::metrics;
use automation_engine::utils::shutdown_signal;

/// Automation Engine HTTP service.
#[derive(Parser, Debug)]
#[command(name = "automation-engine")]
#[command(about = "Demo HTTP service for CI/CD pipeline integration")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration before logging so LOG_LEVEL can seed the filter
    let config = Config::load().map_err(AppError::from);

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("automation_engine=debug,tower_http=debug,info")
    } else {
        let fallback = config
            .as_ref()
            .map(|c| c.log_level())
            .unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = config?;
    if let Some(port) = args.port {
        config.port = port;
    }

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("AUTOMATION ENGINE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(AppError::InvalidConfig(e).into());
    }
    println!("OK");

    let build = config.build_info();

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Environment: {}", config.app_env);
    println!("  Version: {}", config.app_version);
    println!("  Port: {}", config.port);
    println!("  Debug: {}", config.debug());
    println!("  Log Level: {}", config.log_level());
    println!("  Secret Key: {}", config.masked_secret_key());
    match config.metrics_port {
        Some(port) => println!("  Metrics Port: {}", port),
        None => println!("  Metrics: Disabled"),
    }
    println!("  Commit: {}", build.commit_sha);
    println!("  Build Number: {}", build.build_number);
    println!("  Branch: {}", build.branch);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(AppError::InvalidConfig(e).into());
    }

    metrics::init_metrics();
    if let Some(port) = config.metrics_port {
        if let Err(e) = metrics::install_exporter(port) {
            warn!("Metrics exporter disabled: {}", e);
        }
    }

    if config.debug() {
        warn!("Debug mode enabled");
    }

    if config.app_env == Environment::Production && config.uses_placeholder_secret() {
        warn!("SECRET_KEY is not set; running production with the demo secret key");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app_state = AppState::new(config);
    let router = create_router(app_state);

    let listener = TcpListener::bind(addr).await.map_err(AppError::from)?;
    info!("Starting Automation Engine on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;

    info!("Server stopped");
    Ok(())
}
