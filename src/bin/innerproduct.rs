//! Dot product benchmark CLI.
//!
//! Usage:
//!   innerproduct                      # 1,000,000 elements
//!   innerproduct 50000000             # custom length
//!   innerproduct 4096 --coarseness 64 # smaller tiles / recursion cutoff
//!   innerproduct --seed 12345         # reproducible shuffle

use clap::Parser;
use fork_join_dot::config::{BenchConfig, DEFAULT_COARSENESS, DEFAULT_ITERATIONS, DEFAULT_LEN};
use fork_join_dot::runtime::PoolConfig;
use fork_join_dot::{logging, run_benchmarks, tui};
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Length of both input vectors
    #[arg(default_value_t = DEFAULT_LEN)]
    len: usize,

    /// Recursive base-case size and tile size
    #[arg(short, long, default_value_t = DEFAULT_COARSENESS)]
    coarseness: usize,

    /// Timed iterations per strategy
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Seed for shuffling the inputs (default: time-based)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pin each worker thread to its own core
    #[arg(long)]
    pin_workers: bool,
}

impl Cli {
    fn config(&self) -> BenchConfig {
        let config = BenchConfig::default()
            .with_len(self.len)
            .with_coarseness(self.coarseness)
            .with_iterations(self.iterations)
            .with_pool(PoolConfig::default().with_pinning(self.pin_workers));
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    tui::print_header();

    match run_benchmarks(&cli.config()) {
        Ok(report) => {
            tui::print_report(&report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(
                %err,
                resource_exhaustion = err.is_resource_exhaustion(),
                "benchmark aborted"
            );
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
