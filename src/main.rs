use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use geonames_filter::{run, DigestAlgorithm, ExclusionSet, Paths};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Prune the geonames postal-code and country-code datasets.
///
/// Drops postal codes of excluded countries, keeps three postal columns and
/// two country columns, and keeps only countries that still have postal codes.
#[derive(Parser, Debug)]
#[command(name = "geonames-filter", version, about)]
struct Cli {
    /// Directory holding the input files and receiving the outputs
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Postal-code input [default: <DIR>/geonames-postal-code.csv]
    #[arg(long)]
    postal_input: Option<PathBuf>,

    /// Postal-code output [default: <DIR>/geonames-postal-code-filtered.csv]
    #[arg(long)]
    postal_output: Option<PathBuf>,

    /// Country-code input [default: <DIR>/countries-codes.csv]
    #[arg(long)]
    countries_input: Option<PathBuf>,

    /// Country-code output [default: <DIR>/countries-codes-filtered.csv]
    #[arg(long)]
    countries_output: Option<PathBuf>,

    /// Print a checksum of each output (sha256, sha512)
    #[arg(long)]
    digest: Option<DigestAlgorithm>,
}

impl Cli {
    fn paths(&self) -> Paths {
        let defaults = Paths::in_dir(&self.dir);
        Paths {
            postal_input: self.postal_input.clone().unwrap_or(defaults.postal_input),
            postal_output: self.postal_output.clone().unwrap_or(defaults.postal_output),
            countries_input: self
                .countries_input
                .clone()
                .unwrap_or(defaults.countries_input),
            countries_output: self
                .countries_output
                .clone()
                .unwrap_or(defaults.countries_output),
        }
    }
}

/// Log subscriber printing bare messages, so notices read `filter country XX`
fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .finish()
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(subscriber(filter, std::io::stdout))
        .context("installing log subscriber")?;

    let cli = Cli::parse();
    let paths = cli.paths();

    let report = run(&paths, &ExclusionSet::default(), cli.digest)
        .context("filtering geonames datasets")?;

    if let Some(algorithm) = cli.digest {
        for file in [&report.postal, &report.countries] {
            if let Some(checksum) = &file.digest {
                eprintln!("{}: {}  {}", algorithm.name(), checksum, file.path.display());
            }
        }
    }

    Ok(())
}
