//! qsearch Command-Line Interface
//!
//! Builds a Grover circuit marking one index, runs it on a backend and
//! reports the measured counts.
//!
//! ```text
//! $ qsearch
//! Result Counts: {"00": 133, "01": 128, "10": 639, "11": 124}
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

mod backends;
mod config;
mod logging;
mod report;

use backends::BackendKind;
use config::{Config, Overrides};

/// qsearch - Grover search for a single marked index
#[derive(Parser)]
#[command(name = "qsearch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of search qubits [default: 2]
    #[arg(short = 'n', long)]
    qubits: Option<u32>,

    /// Index the oracle marks [default: 2]
    #[arg(short, long)]
    marked: Option<u64>,

    /// Number of shots [default: 1024]
    #[arg(short, long)]
    shots: Option<u32>,

    /// Backend to run on
    #[arg(short, long, value_enum, default_value_t = BackendKind::Simulator)]
    backend: BackendKind,

    /// Seed for the sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            qubits: self.qubits,
            marked: self.marked,
            shots: self.shots,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(&cli.overrides());
    config.validate()?;

    logging::init(cli.verbose, &config.logging)?;

    let search = &config.search;
    info!(
        qubits = search.qubits,
        marked = search.marked,
        shots = search.shots,
        backend = cli.backend.as_str(),
        "starting search"
    );

    let backend = backends::create(cli.backend, search.seed)?;

    let spinner = (cli.format == OutputFormat::Table).then(|| {
        let pb = ProgressBar::new_spinner();
        let template = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}");
        if let Ok(spinner_style) = template {
            pb.set_style(spinner_style);
        }
        pb.set_message(format!(
            "Searching {} qubits for index {} on {}...",
            search.qubits,
            search.marked,
            backend.name()
        ));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let outcome =
        qsearch_grover::search(&*backend, search.qubits, search.marked, search.shots).await;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let outcome = outcome.context("grover search failed")?;

    match cli.format {
        OutputFormat::Table => report::print_table(&outcome, backend.name()),
        OutputFormat::Json => {
            let json = report::render_json(&outcome, backend.name())
                .context("failed to serialize report")?;
            println!("{json}");
        }
    }

    Ok(())
}
