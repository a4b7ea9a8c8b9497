//! # mousestats Counter Entry Point
//!
//! Captures mouse button presses in the terminal and appends one record per
//! hour to `data_YYYY_MM.jsonl` under the data directory.
//!
//! ## Usage
//!
//! ```bash
//! # Use the default data directory (~/.local/share/mousestats/)
//! mousestats
//!
//! # Use a specific data directory
//! mousestats --datapath /path/to/data
//! ```
//!
//! Press `q` or `Ctrl+C` in the terminal, or send SIGINT / SIGTERM / SIGHUP,
//! to save the current hour and exit.

use mousestats::config::Config;
use mousestats::event::TerminalSource;
use mousestats::runtime::{self, local_now};
use mousestats::store::MonthLog;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::io::Write;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// mousestats - count mouse button presses per hour
#[derive(Parser, Debug)]
#[command(name = "mousestats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Count mouse button presses per hour", long_about = None)]
struct Args {
    /// Base data directory for storing statistics
    #[arg(long, value_name = "DIR")]
    datapath: Option<PathBuf>,

    /// Path to a configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // The terminal is in raw mode while counting, so lines need an explicit \r
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            write!(buf, "[{} {}] {}\r\n", buf.timestamp(), record.level(), record.args())
        })
        .init();

    let args = Args::parse();

    if let Err(e) = run_application(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(datapath) = &args.datapath {
        config.datapath = datapath.clone();
    }
    Ok(config)
}

async fn run_application(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    let data_dir = config.data_dir();
    info!("Data directory is {}", data_dir.display());

    let mut log = MonthLog::new(data_dir);
    let cancel = CancellationToken::new();
    let signals = runtime::spawn_signal_listener(cancel.clone());

    let source = TerminalSource::new().context("Failed to start mouse capture")?;
    let result = runtime::run(
        source,
        &mut log,
        &config.primary_key,
        config.poll_interval(),
        cancel.clone(),
        local_now,
    )
    .await;

    cancel.cancel();
    let _ = signals.await;

    result.map(|_| ())
}
