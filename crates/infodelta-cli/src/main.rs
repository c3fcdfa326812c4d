//! infodelta CLI
//!
//! Command-line interface for:
//! - Counting articles per infobox type in an update dump (`stats`)
//! - Splitting the dump into one file per infobox type (`bucket`)
//! - Converting buckets into baseline + update-statement CSVs (`convert`)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use infodelta_core::{Action, Selection};
use infodelta_ingest::stats::{sorted_by_count, DEFAULT_MIN_ARTICLES};
use infodelta_ingest::{
    bucket_articles, canonical_infobox_type, convert_all, count_articles_by_type, read_statistics,
    write_statistics, BucketOptions, ConvertConfig, ConvertOptions, DirectorySink,
};

mod logging;

#[derive(Parser)]
#[command(name = "infodelta")]
#[command(
    author,
    version,
    about = "infodelta: Wikipedia infobox edit histories → baseline + changelog CSVs"
)]
struct Cli {
    /// More log output (DEBUG).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Less log output (WARN).
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count articles per infobox type.
    Stats {
        /// Line-delimited JSON update dump
        input: PathBuf,
        /// Write the statistics file here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Log progress every N lines (0 = off)
        #[arg(long, default_value_t = 1000)]
        progress_every: usize,
    },

    /// Split the dump into one file per infobox type.
    ///
    /// Without `--types` or `--stats`, every infobox type gets a bucket.
    Bucket {
        /// Line-delimited JSON update dump
        input: PathBuf,
        /// Directory receiving the bucket files
        #[arg(long, default_value = "files_by_infobox_type")]
        out_dir: PathBuf,
        /// Only keep these infobox types (comma separated)
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// Only keep types listed in this statistics file ...
        #[arg(long)]
        stats: Option<PathBuf>,
        /// ... with at least this many articles
        #[arg(long, default_value_t = DEFAULT_MIN_ARTICLES)]
        min_articles: u64,
        /// Hand buffered articles to disk every N articles
        #[arg(long, default_value_t = 5000)]
        flush_every: usize,
        /// Skip the first N lines (resume an interrupted run)
        #[arg(long, default_value_t = 0)]
        skip_lines: usize,
        /// Log progress every N lines (0 = off)
        #[arg(long, default_value_t = 1000)]
        progress_every: usize,
    },

    /// Convert buckets into baseline and update-statement CSVs.
    Convert {
        /// JSON configuration (infobox types, attributes, statement kinds)
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding the bucket files
        #[arg(long, default_value = "files_by_infobox_type")]
        buckets_dir: PathBuf,
        /// Output root (`baseline/` and `updates/` are created below it)
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
        /// Statement kinds to keep, overriding the configuration (comma separated)
        #[arg(long, value_delimiter = ',')]
        statements: Option<Vec<Action>>,
        /// Replay statements against the baseline before writing
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Stats {
            input,
            out,
            progress_every,
        } => cmd_stats(&input, out.as_deref(), progress_every),
        Commands::Bucket {
            input,
            out_dir,
            types,
            stats,
            min_articles,
            flush_every,
            skip_lines,
            progress_every,
        } => {
            let targets = bucket_targets(&types, stats.as_deref(), min_articles)?;
            let options = BucketOptions {
                targets,
                flush_every,
                skip_lines,
                progress_every,
            };
            cmd_bucket(&input, &out_dir, &options)
        }
        Commands::Convert {
            config,
            buckets_dir,
            out_dir,
            statements,
            verify,
        } => {
            let options = ConvertOptions {
                buckets_dir,
                out_dir,
                verify,
            };
            cmd_convert(&config, statements, &options)
        }
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn cmd_stats(input: &Path, out: Option<&Path>, progress_every: usize) -> Result<()> {
    eprintln!("{} {}", "Counting".green().bold(), input.display());
    let counts = count_articles_by_type(open_input(input)?, progress_every)
        .with_context(|| format!("failed to count articles in {}", input.display()))?;

    match out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            write_statistics(BufWriter::new(file), &counts)?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => write_statistics(io::stdout().lock(), &counts)?,
    }

    if let Some((top, count)) = sorted_by_count(&counts).first() {
        eprintln!("  {} types, most frequent: {} ({})", counts.len(), top.cyan(), count);
    }
    Ok(())
}

/// `--types` wins over `--stats`; neither means every type.
fn bucket_targets(
    types: &[String],
    stats: Option<&Path>,
    min_articles: u64,
) -> Result<Option<BTreeSet<String>>> {
    if !types.is_empty() {
        return Ok(Some(types.iter().map(|t| canonical_infobox_type(t)).collect()));
    }
    let Some(path) = stats else {
        return Ok(None);
    };
    let counts = read_statistics(open_input(path)?, min_articles)
        .with_context(|| format!("failed to read statistics {}", path.display()))?;
    tracing::info!(types = counts.len(), min_articles, "selected infobox types from statistics");
    Ok(Some(counts.keys().map(|t| canonical_infobox_type(t)).collect()))
}

fn cmd_bucket(input: &Path, out_dir: &Path, options: &BucketOptions) -> Result<()> {
    eprintln!("{} {}", "Bucketing".green().bold(), input.display());
    let mut sink = DirectorySink::new(out_dir)?;
    let summary = bucket_articles(open_input(input)?, &mut sink, options)
        .with_context(|| format!("failed to bucket {}", input.display()))?;

    eprintln!(
        "{} {} articles into {} buckets under {}",
        "routed".green().bold(),
        summary.routed.values().sum::<u64>(),
        summary.routed.len(),
        out_dir.display().to_string().bold()
    );
    if summary.lines_skipped > 0 {
        eprintln!("  skipped {} lines", summary.lines_skipped);
    }
    Ok(())
}

fn cmd_convert(config_path: &Path, statements: Option<Vec<Action>>, options: &ConvertOptions) -> Result<()> {
    let config = ConvertConfig::load(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let selection: Selection = match statements {
        Some(actions) => actions.into_iter().collect(),
        None => config.selection(),
    };
    tracing::info!(selection = %selection, "statement kinds");

    let reports = convert_all(&config, &selection, options)?;
    for report in &reports {
        let s = &report.summary;
        eprintln!(
            "{} {} ({} articles, {} attributes)",
            "Converted".green().bold(),
            report.infobox_type.bold(),
            s.entities,
            report.attributes
        );
        eprintln!(
            "  baseline {} rows, statements {} emitted ({} update, {} delete, {} insert)",
            s.baseline_rows, s.emitted, s.updates, s.deletes, s.inserts
        );
        eprintln!("  {} {}", "→".cyan(), report.baseline_path.display());
        eprintln!("  {} {}", "→".cyan(), report.statements_path.display());
    }
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
