//! Valet CLI and REST API entry point.
//!
//! Binary name: `valet`
//!
//! Parses CLI arguments, wires the assistant and services, then starts
//! the REST API server and the background summary job.

mod http;
mod state;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use valet_infra::background::spawn_summary_job;
use valet_infra::config::load_config;

use state::AppState;

/// Personal AI assistant backend.
#[derive(Parser)]
#[command(name = "valet", version, about, long_about = None)]
struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server.
    Serve {
        /// Data directory holding config.toml.
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Override the configured bind port.
        #[arg(long)]
        port: Option<u16>,

        /// Provider API key.
        #[arg(long, env = "VALET_API_KEY", hide_env_values = true)]
        api_key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,valet=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve {
            data_dir,
            port,
            api_key,
        } => {
            let mut config = load_config(&data_dir).await;
            if let Some(port) = port {
                config.port = port;
            }

            let interval = Duration::from_secs(config.background_interval_secs);
            let addr = format!("{}:{}", config.host, config.port);

            let state = AppState::init(config, SecretString::from(api_key))?;
            spawn_summary_job(
                state.assistant(),
                state.broadcaster(),
                interval,
            );

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "Valet API listening");

            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
