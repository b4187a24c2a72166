//! Launching the local search engine process

use searchgate_core::config::EngineConfig;
use searchgate_core::error::{Error, Result};
use searchgate_engine::{wait_for_engine, EngineClientAccessor};
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long the readiness poll keeps pinging a freshly launched engine
pub const ENGINE_READY_TIMEOUT: Duration = Duration::from_secs(60);
const ENGINE_READY_INTERVAL: Duration = Duration::from_secs(2);

/// Split a launch command line into program and arguments
fn parse_launch_command(command_line: &str) -> Result<(&str, Vec<&str>)> {
    let mut parts = command_line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::process_management("Engine launch command is empty"))?;
    Ok((program, parts.collect()))
}

/// Run the launch command to completion
///
/// The child is killed if the returned future is dropped.
pub async fn run_engine_process(command_line: &str) -> Result<ExitStatus> {
    let (program, args) = parse_launch_command(command_line)?;

    info!("Launching search engine: {command_line}");

    Command::new(program)
        .args(&args)
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| {
            Error::process_management(format!(
                "Failed to start search engine with '{command_line}': {e}"
            ))
        })
}

/// Launch the engine in a background task that logs how the process ended
///
/// Nothing waits on the task; abort the handle to stop the child.
pub fn spawn_engine_process(config: &EngineConfig) -> JoinHandle<()> {
    let command_line = config.launch_command.clone();

    tokio::spawn(async move {
        match run_engine_process(&command_line).await {
            Ok(status) if status.success() => {
                info!("Search engine process exited cleanly");
            }
            Ok(status) => {
                error!("Search engine process exited with {status}");
            }
            Err(e) => {
                error!("{e}");
            }
        }
    })
}

/// Poll the engine in the background and log when it becomes reachable
pub fn spawn_readiness_check(accessor: Arc<EngineClientAccessor>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_engine(&accessor, ENGINE_READY_TIMEOUT, ENGINE_READY_INTERVAL).await {
            Ok(()) => info!("Search engine is ready"),
            Err(e) => warn!("Search engine not ready, requests will retry on demand: {e}"),
        }
    })
}
