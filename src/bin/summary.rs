//! # mousestats Summary
//!
//! Prints monthly, yearly and total sums over the recorded month files,
//! followed by click-rate and life expectancy estimates.
//!
//! ```bash
//! mousestats-summary --datapath ~/.local/share/mousestats/
//! ```

use mousestats::config::Config;
use mousestats::runtime::local_now;
use mousestats::stats::{load_all, render_report, Estimate};
use mousestats::store::find_files;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Summarize recorded mouse statistics
#[derive(Parser, Debug)]
#[command(name = "mousestats-summary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Summarize recorded mouse statistics", long_about = None)]
struct Args {
    /// Base data directory for storing statistics
    #[arg(long, value_name = "DIR")]
    datapath: Option<PathBuf>,

    /// Path to a configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Event key the estimates are computed for
    #[arg(long, value_name = "KEY")]
    primary_key: Option<String>,

    /// Rated number of presses before the button wears out
    #[arg(long, value_name = "CLICKS")]
    rated_life: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(datapath) = args.datapath {
        config.datapath = datapath;
    }
    if let Some(key) = args.primary_key {
        config.primary_key = key;
    }
    if let Some(rated_life) = args.rated_life {
        config.rated_life = rated_life;
    }

    let data_dir = config.data_dir();
    let nfiles = find_files(&data_dir)?.len();
    println!(
        "Datapath is {}, containing {} data files",
        config.datapath.display(),
        nfiles
    );
    if nfiles == 0 {
        eprintln!("Error: Found no data files! No statistics will be calculated.");
        eprintln!("Use the --datapath argument to specify the base data directory");
        return Ok(());
    }

    println!("Summary per month, year and total:");
    let aggregate = load_all(&data_dir)?;
    let estimate = Estimate::compute(
        &aggregate.total,
        aggregate.active_hours,
        &aggregate.flattened,
        local_now(),
        &config.primary_key,
        config.rated_life,
    );
    print!("{}", render_report(&aggregate, &estimate));

    Ok(())
}
