//! # DrugDeliveryTwin Session Runtime
//!
//! Runs one session shell over an in-memory ledger.
//!
//! ## Configuration
//!
//! Defaults, then `DDT_INDEX_KEY`, `DDT_RECORD_PREFIX`,
//! `DDT_SIMULATION_TIMEOUT_MS`, `DDT_SIMULATION_DELAY_MS`, then flags.
//! Log verbosity follows `RUST_LOG` (default `info`). Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ddt_runtime::{ConfigOverrides, RuntimeConfig, SessionContainer, SessionController};

/// DrugDeliveryTwin session shell
#[derive(Parser, Debug)]
#[command(name = "ddt-runtime")]
#[command(about = "Record ledger session shell for drug-delivery trial records")]
struct Args {
    /// Ledger key holding the record index
    #[arg(long)]
    index_key: Option<String>,

    /// Prefix of per-record ledger keys
    #[arg(long)]
    record_prefix: Option<String>,

    /// Simulation timeout in milliseconds
    #[arg(long)]
    simulation_timeout_ms: Option<u64>,

    /// Placeholder simulation latency in milliseconds
    #[arg(long)]
    simulation_delay_ms: Option<u64>,

    /// Connect this wallet account at startup
    #[arg(short, long)]
    account: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            index_key: args.index_key,
            record_prefix: args.record_prefix,
            simulation_timeout_ms: args.simulation_timeout_ms,
            simulation_delay_ms: args.simulation_delay_ms,
            account: args.account,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    // Load configuration
    let config = RuntimeConfig::from_env().with_overrides(args.into());
    config.validate().context("invalid runtime configuration")?;

    let mut controller = SessionController::new(SessionContainer::new(&config));
    controller
        .refresh()
        .await
        .context("initial snapshot load failed")?;

    info!("Session ready. Type 'help' for commands.");
    run_shell(&mut controller).await
}

async fn run_shell(controller: &mut SessionController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while controller.is_running() {
        stdout.write_all(b"ddt> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let output = controller.handle_line(&line).await;
        if !output.is_empty() {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
    }

    info!("Session closed");
    Ok(())
}
