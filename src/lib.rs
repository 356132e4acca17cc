pub mod bench;
pub mod error;
pub mod generate;
pub mod hashing;
pub mod progress;
pub mod report;
pub mod trial;
pub mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use bench::{run_benchmark, BenchmarkConfig};
use hashing::{AlgorithmName, Registry};
use progress::SpinnerProgress;
use report::{rank, RankedReport};
use utils::{format_bytes, parse_size, Logger};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Algorithms to benchmark (default: all)
    #[arg(short, long, value_enum, num_args = 1..)]
    pub algorithms: Vec<AlgorithmName>,

    /// Number of generate-then-hash attempts per algorithm
    #[arg(
        short = 't',
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub attempts: u32,

    /// Size of each generated file (e.g., 10MB, 512KB, 4096)
    #[arg(short = 's', long, default_value = "10MB", value_parser = parse_size)]
    pub file_size: u64,

    /// Directory for the temporary files (default: system temp dir)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Audit log file path
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    pub fn to_config(&self) -> Result<BenchmarkConfig> {
        let algorithms = if self.algorithms.is_empty() {
            AlgorithmName::ALL.to_vec()
        } else {
            self.algorithms.clone()
        };
        let config = BenchmarkConfig::new(
            algorithms,
            self.attempts,
            self.file_size,
            self.dir.clone(),
        )?;
        Ok(config)
    }
}

pub fn run(args: Args) -> Result<RankedReport> {
    let config = args.to_config()?;
    let registry = Registry::standard();
    let logger = args.log.as_ref().map(Logger::new);

    println!(
        "Benchmarking {} algorithm(s), {} attempt(s) each, {} per file...",
        config.algorithms.len(),
        config.attempts,
        format_bytes(config.file_size)
    );

    let progress = SpinnerProgress::new(config.file_size, logger);
    let results = match run_benchmark(&config, &registry, &progress) {
        Ok(results) => results,
        Err(aborted) => {
            progress.abort(aborted.algorithm, &aborted.source);
            let algorithm = aborted.algorithm;
            return Err(aborted).with_context(|| format!("Benchmark aborted at {}", algorithm));
        }
    };
    progress.finish();

    let report = rank(&results, config.file_size);
    println!();
    print!("{}", report.render());
    Ok(report)
}
