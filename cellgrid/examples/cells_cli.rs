use std::path::{Path, PathBuf};

use cellgrid::io::{codecs, load_cells, write_cells};
use cellgrid::library::aggregate::{Count, Max, Mean, Min, StandardDeviation};
use cellgrid::library::partition::BinaryHashSplit;
use cellgrid::{AppendName, Dimension, LocalRuntime, Matrix, Over, RuntimeConfig, ValueKind};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "cellgrid CLI - summarise and split two-dimensional cell files (instance|feature)")]
struct Cli {
    /// Field separator of the cell files
    #[arg(long, default_value = "|")]
    separator: String,

    /// Worker threads (defaults to the number of cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count, mean, deviation and range of every feature
    Stats {
        /// Cell file (`instance|feature|codec|schema|value` per line)
        input: PathBuf,
    },
    /// Split instances into two files by a stable hash of their id
    Split {
        /// Cell file (`instance|feature|codec|schema|value` per line)
        input: PathBuf,

        /// Output directory for `train.txt` and `test.txt`
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Number of hash buckets
        #[arg(long, default_value_t = 10)]
        base: u64,

        /// Buckets up to this value go to the training file
        #[arg(long, default_value_t = 7)]
        threshold: u64,
    },
}

fn load(path: &Path, separator: &str, runtime: LocalRuntime) -> cellgrid::Result<Matrix<LocalRuntime, 2>> {
    let parsed = load_cells(path, separator, &codecs([ValueKind::Text; 2]))?;
    for error in parsed.errors.iter().take(10) {
        eprintln!("line {}: {} ({})", error.line, error.error, error.text);
    }
    Ok(parsed.into_matrix(runtime))
}

fn handle_stats(matrix: Matrix<LocalRuntime, 2>, separator: &str) -> cellgrid::Result<()> {
    let [instances, features] = matrix.clone().shape();
    println!("{instances} instances, {features} features");

    let summary = matrix.summarise(
        Over(Dimension::Second),
        (
            Count::named(AppendName::new("count")),
            Mean::named(AppendName::new("mean")),
            StandardDeviation::named(AppendName::new("sd")),
            (
                Min::named(AppendName::new("min")),
                Max::named(AppendName::new("max")),
            ),
        ),
    )?;

    for cell in summary.to_sorted_vec() {
        println!("{}", cell.to_short_string(separator));
    }
    Ok(())
}

fn handle_split(
    matrix: Matrix<LocalRuntime, 2>,
    separator: &str,
    output: &Path,
    base: u64,
    threshold: u64,
) -> cellgrid::Result<()> {
    let partitions = matrix.split(BinaryHashSplit::new(
        Dimension::First,
        base,
        threshold,
        "train",
        "test",
    ));

    std::fs::create_dir_all(output)?;
    for (label, part) in partitions.into_matrices() {
        let path = output.join(format!("{label}.txt"));
        let written = write_cells(&path, &part.to_sorted_vec(), separator)?;
        println!("{label}: {written} cells -> {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let start_time = std::time::Instant::now();

    let mut config = RuntimeConfig::default();
    if let Some(threads) = cli.threads {
        config = config.with_threads(threads);
    }
    let runtime = LocalRuntime::with_config(config)?;
    info!(threads = runtime.threads(), "runtime ready");

    match &cli.command {
        Commands::Stats { input } => {
            let matrix = load(input, &cli.separator, runtime)?;
            handle_stats(matrix, &cli.separator)?;
        }
        Commands::Split {
            input,
            output,
            base,
            threshold,
        } => {
            let matrix = load(input, &cli.separator, runtime)?;
            handle_split(matrix, &cli.separator, output, *base, *threshold)?;
        }
    }

    let elapsed = start_time.elapsed();
    eprintln!("Completed in {elapsed:.2?}");

    Ok(())
}
