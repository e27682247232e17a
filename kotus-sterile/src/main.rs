use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use kotus_sterile_lib::derivation::{DEFAULT_MAX_THRESHOLD, DEFAULT_MIN_THRESHOLD};
use kotus_sterile_lib::{run, RunConfig, RunSummary, Taxonomy, Thresholds};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kotus-sterile",
    about = "Find nouns and verbs with no derivational counterpart in the Kotus word list"
)]
struct Cli {
    /// Path to the Kotus word list XML.
    source: PathBuf,

    /// Directory for reports and corpora. Defaults to the source's directory.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// JSON file with "excluded", "noun" and "verb" code lists.
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Prefix length of the first pass (at most 64).
    #[arg(long, default_value_t = DEFAULT_MAX_THRESHOLD)]
    max_threshold: usize,

    /// Prefix length of the last pass.
    #[arg(long, default_value_t = DEFAULT_MIN_THRESHOLD)]
    min_threshold: usize,

    /// Never pair a headword that is both noun and verb with itself.
    #[arg(long)]
    no_self_match: bool,

    /// The source is already filtered; go straight to matching.
    #[arg(long)]
    skip_filter: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let taxonomy = match &cli.taxonomy {
        Some(path) => Taxonomy::load(path)
            .with_context(|| format!("loading taxonomy {}", path.display()))?,
        None => Taxonomy::kotus(),
    };
    let thresholds = Thresholds::descending(cli.max_threshold, cli.min_threshold)?;

    let config = RunConfig {
        source: cli.source.clone(),
        out_dir: cli.out_dir.clone(),
        taxonomy,
        thresholds,
        allow_self_match: !cli.no_self_match,
        skip_filter: cli.skip_filter,
    };

    let summary =
        run(&config).with_context(|| format!("processing {}", config.source.display()))?;

    if cli.json {
        let json = if cli.pretty {
            serde_json::to_string_pretty(&summary)
        } else {
            serde_json::to_string(&summary)
        };
        println!("{}", json.context("serializing run summary")?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} entries read, {} kept after filtering ({} senses, {} entries dropped)",
        summary.entries_read,
        summary.entries_filtered,
        summary.dropped_senses,
        summary.dropped_entries
    );
    for pass in &summary.passes {
        println!(
            "  {:>2} chars: {:>5} derivations, {:>6} entries left  ({})",
            pass.threshold,
            pass.matches,
            pass.remaining,
            pass.report.display()
        );
    }
    println!(
        "sterile: {} nouns, {} verbs, {} unassessed -> {}",
        summary.sterile.nouns,
        summary.sterile.verbs,
        summary.sterile.unassessed,
        summary.residue_corpus.display()
    );
}
