//! cidrbucket-bench: CLI for building a range index from a CIDR list and
//! measuring query latency against it.

use clap::{Parser, Subcommand};
use cidrbucket::address::format_address;
use cidrbucket::loader::{load_addresses_from_path, load_cidrs_from_path};
use cidrbucket::{Benchmark, HarnessConfig, OutputFormat, RangeIndex};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "cidrbucket-bench")]
#[command(version)]
#[command(about = "Check and benchmark IPv4 addresses against a CIDR list", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time every address in a list against the index
    Run {
        /// File with one CIDR per line
        #[arg(short, long)]
        cidrs: PathBuf,

        /// File with one address per line
        #[arg(short, long)]
        addresses: PathBuf,

        /// YAML harness configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of slowest queries to report
        #[arg(short, long)]
        top: Option<usize>,

        /// Passes over the address list
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Output format (text or json)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Build the index in parallel shards
        #[arg(long)]
        parallel: bool,
    },

    /// Check individual addresses
    Check {
        /// File with one CIDR per line
        #[arg(short, long)]
        cidrs: PathBuf,

        /// Addresses to check
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Print bucket statistics for a CIDR list
    Stats {
        /// File with one CIDR per line
        #[arg(short, long)]
        cidrs: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            cidrs,
            addresses,
            config,
            top,
            iterations,
            format,
            parallel,
        } => load_config(config.as_deref()).and_then(|mut harness| {
            if let Some(top) = top {
                harness.top_n = top;
            }
            if let Some(iterations) = iterations {
                harness.iterations = iterations;
            }
            if let Some(format) = format {
                harness.format = format;
            }
            harness.parallel_build |= parallel;
            harness.validate()?;
            run(&cidrs, &addresses, &harness)
        }),
        Commands::Check { cidrs, addresses } => check(&cidrs, &addresses),
        Commands::Stats { cidrs } => stats(&cidrs),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> cidrbucket::Result<HarnessConfig> {
    match path {
        Some(path) => HarnessConfig::from_path(path),
        None => Ok(HarnessConfig::default()),
    }
}

fn build_index(cidrs: &Path, parallel: bool) -> cidrbucket::Result<RangeIndex> {
    let loaded = load_cidrs_from_path(cidrs)?;
    if !loaded.is_clean() {
        log::warn!(
            "{} malformed CIDR lines skipped in {:?}",
            loaded.rejected.len(),
            cidrs
        );
    }

    let started = Instant::now();
    // `parallel` implies the feature; HarnessConfig::validate enforces it
    let index = match parallel {
        #[cfg(feature = "parallel")]
        true => RangeIndex::build_parallel(loaded.entries),
        _ => RangeIndex::build(loaded.entries),
    };
    log::info!("Built index in {:?}: {}", started.elapsed(), index.stats());
    Ok(index)
}

fn run(cidrs: &Path, addresses: &Path, config: &HarnessConfig) -> cidrbucket::Result<()> {
    let index = build_index(cidrs, config.parallel_build)?;
    let loaded = load_addresses_from_path(addresses)?;

    let report = Benchmark::new(&index, config).run(&loaded.entries);
    print!("{}", report.render(config.format)?);
    if config.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn check(cidrs: &Path, addresses: &[String]) -> cidrbucket::Result<()> {
    let index = build_index(cidrs, false)?;

    for text in addresses {
        match index.contains_str(text.trim()) {
            Ok(hit) => println!("{}\t{}", text.trim(), hit),
            Err(e) => eprintln!("{}\t{}", text.trim(), e),
        }
    }
    Ok(())
}

fn stats(cidrs: &Path) -> cidrbucket::Result<()> {
    let index = build_index(cidrs, false)?;
    let stats = index.stats();

    println!("{}", stats);
    for (key, bucket) in index.populated_buckets() {
        let first = bucket.first().map(|r| format_address(r.start())).unwrap_or_default();
        println!("  bucket {:>3}: {:>6} entries (first starts at {})", key, bucket.len(), first);
    }
    Ok(())
}
