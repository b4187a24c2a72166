//! Searchgate - HTTP gateway in front of a document search engine
//!
//! This binary wires configuration, the engine client, the write queue and
//! the HTTP server together.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use searchgate::engine_process::{spawn_engine_process, spawn_readiness_check};
use searchgate_core::config::Config;
use searchgate_engine::EngineClientAccessor;
use searchgate_server::{run_server, AppState};
use searchgate_write_queue::{create_write_queue, spawn_drain_worker};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "searchgate")]
#[command(about = "HTTP gateway for saving and searching documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway (default)
    Serve {
        /// Do not launch the engine process, even if configured to
        #[arg(long)]
        no_launch: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Serve { no_launch }) => serve(cli.config.as_deref(), no_launch).await,
        Some(Commands::Config) => print_config(cli.config.as_deref()),
        None => serve(cli.config.as_deref(), false).await,
    }
}

/// Initialize logging system
///
/// `RUST_LOG` wins when set.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "searchgate={level},searchgate_core={level},searchgate_engine={level},\
             searchgate_write_queue={level},searchgate_server={level},tower_http={level}"
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("{rendered}");
    Ok(())
}

async fn serve(config_path: Option<&Path>, no_launch: bool) -> Result<()> {
    let config = load_config(config_path)?;
    info!(
        "Starting searchgate {} (engine at {})",
        searchgate_core::VERSION,
        config.engine.url
    );

    let accessor = Arc::new(EngineClientAccessor::new(config.engine.clone()));

    let (queue, receiver) = create_write_queue(config.queue.capacity)?;
    let (worker_shutdown_tx, worker_shutdown_rx) = oneshot::channel();
    let worker = spawn_drain_worker(
        receiver,
        accessor.clone(),
        &config.queue,
        worker_shutdown_rx,
    );

    let launcher = if config.engine.auto_launch && !no_launch {
        Some(spawn_engine_process(&config.engine))
    } else {
        info!("Engine auto-launch disabled");
        None
    };
    let readiness = spawn_readiness_check(accessor.clone());

    let state = AppState::new(queue, accessor);
    let server_result = run_server(&config.server, state, shutdown_signal()).await;

    // Pending batches are dropped, not drained
    let _ = worker_shutdown_tx.send(());
    match worker.await {
        Ok(stats) => info!(
            "Drain worker finished: {} persisted, {} failed, {} abandoned",
            stats.persisted, stats.failed, stats.abandoned
        ),
        Err(e) => error!("Drain worker task failed: {e}"),
    }

    readiness.abort();
    if let Some(launcher) = launcher {
        launcher.abort();
        info!("Engine process stopped");
    }

    server_result.context("HTTP server failed")?;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
        Err(e) => error!("Error setting up signal handler: {e}"),
    }
}
