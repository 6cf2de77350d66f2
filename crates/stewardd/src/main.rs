//! stewardd — the steward cluster manager daemon.
//!
//! Assembles the manager's subsystems around the builtin scheduler
//! agent:
//! - Cluster state (nodes, partitions, jobs) seeded from a TOML file
//! - Builtin priority queue and first-fit placement
//! - Advance-reservation ledger
//! - The scheduler agent loop, stopped cleanly on ctrl-c
//!
//! # Usage
//!
//! ```text
//! stewardd run --cluster ./cluster.toml
//! ```

mod bootstrap;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use steward_placement::FirstFitSelector;
use steward_sched::{PriorityJobQueue, SchedulerAgent, StaticConfigSource};

#[derive(Parser)]
#[command(name = "stewardd", about = "steward cluster manager daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the manager with the builtin scheduler agent.
    Run {
        /// Cluster bootstrap file (TOML).
        #[arg(long)]
        cluster: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stewardd=debug,steward=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { cluster } => run(cluster).await,
    }
}

async fn run(cluster: PathBuf) -> anyhow::Result<()> {
    info!("steward daemon starting");

    let file = bootstrap::load(&cluster)?;
    let state = bootstrap::build_state(&file).await?;
    info!(
        cluster = %file.cluster.name,
        pending_jobs = state.pending_job_count().await,
        "cluster state seeded"
    );

    let ledger = bootstrap::build_ledger(&file, &state).await?;
    info!(reservations = ledger.len(), "reservation ledger built");

    let config_source = StaticConfigSource {
        scheduling_parameters: file.cluster.scheduling_parameters.clone(),
        message_timeout_secs: file.cluster.message_timeout_secs,
    };

    let agent = SchedulerAgent::new(
        state,
        Arc::new(PriorityJobQueue::new()),
        Arc::new(ledger),
        Arc::new(FirstFitSelector::new()),
        Arc::new(config_source),
    );
    let handle = agent.start();
    info!("scheduler agent running; ctrl-c to stop");

    let signal = handle.signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, stopping scheduler agent");
            signal.request_stop();
        }
    });

    if let Err(e) = handle.join().await {
        // Invalid tunables leave the manager without a scheduler; die loudly.
        error!(error = %e, "scheduler agent failed");
        std::process::exit(1);
    }

    info!("steward daemon stopped");
    Ok(())
}
