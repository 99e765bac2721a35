//! kvsync CLI
//!
//! Synchronizes YAML configuration trees into the Consul KV store.
//!
//! # Commands
//!
//! - `sync` - Write an environment's keys to Consul in transactions
//! - `plan` - Show the keys and batch layout without writing anything
//! - `export` - Print the keys as Consul KV import JSON
//! - `check` - Report keys defined by more than one file

mod client;
mod commands;
mod environments;
mod error;
mod loader;
mod report;

use clap::{Parser, Subcommand};
use kvsync_engine::{SyncConfig, DEFAULT_ADDRESS, DEFAULT_DATACENTER};
use kvsync_protocol::MAX_OPS_PER_TRANSACTION;
use report::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Consul KV synchronization from YAML configuration files.
#[derive(Parser)]
#[command(name = "kvsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the environments file
    #[arg(global = true, short, long, default_value = "./environments.yaml")]
    config: PathBuf,

    /// Environment to operate on
    #[arg(global = true, short, long)]
    env: Option<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the environment's keys to Consul
    Sync {
        /// Consul HTTP address
        #[arg(long, env = "CONSUL_HTTP_ADDR", default_value = DEFAULT_ADDRESS)]
        consul_addr: String,

        /// Consul datacenter
        #[arg(long, default_value = DEFAULT_DATACENTER)]
        datacenter: String,

        /// ACL token
        #[arg(long, env = "CONSUL_HTTP_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Pause between batches in milliseconds (0 disables)
        #[arg(long, default_value = "100")]
        batch_delay_ms: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show what would be synced without contacting Consul
    Plan {
        /// Maximum operations per transaction
        #[arg(long, default_value_t = MAX_OPS_PER_TRANSACTION)]
        max_operations: usize,
    },

    /// Print the keys as Consul KV import JSON
    Export,

    /// Check the environment's files for duplicate keys
    Check {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Sync {
            consul_addr,
            datacenter,
            token,
            timeout_secs,
            batch_delay_ms,
            format,
        } => {
            let env = cli.env.ok_or("--env is required for sync")?;
            let mut config = SyncConfig::new(consul_addr)
                .with_datacenter(datacenter)
                .with_timeout(Duration::from_secs(timeout_secs))
                .with_batch_delay(Duration::from_millis(batch_delay_ms));
            if let Some(token) = token.filter(|t| !t.is_empty()) {
                config = config.with_token(token);
            }
            commands::sync::run(&cli.config, &env, config, format)?;
        }
        Commands::Plan { max_operations } => {
            let env = cli.env.ok_or("--env is required for plan")?;
            commands::plan::run(&cli.config, &env, max_operations)?;
        }
        Commands::Export => {
            let env = cli.env.ok_or("--env is required for export")?;
            commands::export::run(&cli.config, &env)?;
        }
        Commands::Check { format } => {
            let env = cli.env.ok_or("--env is required for check")?;
            commands::check::run(&cli.config, &env, format)?;
        }
        Commands::Version => {
            println!("kvsync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "Max operations per transaction: {}",
                MAX_OPS_PER_TRANSACTION
            );
        }
    }

    Ok(())
}
