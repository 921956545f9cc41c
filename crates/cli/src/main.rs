use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::SessionData;
use orchestrator::{RecallOrchestrator, RunSummary};
use recall::RecallConfig;
use snapshot::{describe_lengths, load_snapshot};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Rule-based next-item recall over session co-occurrence
#[derive(Parser)]
#[command(name = "rule-recall")]
#[command(about = "Generate top-100 next-item candidates from session transitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the transition table and write predictions for every test session
    Run {
        /// Training sessions CSV (prev_items, next_item, locale)
        #[arg(long, default_value = "data/sessions_train.csv")]
        train: PathBuf,

        /// Test sessions CSV (prev_items, locale)
        #[arg(long, default_value = "data/sessions_test_task1.csv")]
        test: PathBuf,

        /// Where to write the prediction snapshot (JSON Lines)
        #[arg(long, default_value = "history_rule_recall_100_test.jsonl")]
        output: PathBuf,
    },

    /// Show length statistics of a saved snapshot
    Inspect {
        /// Snapshot written by `run`
        #[arg(long)]
        snapshot: PathBuf,

        /// Also print this row (0-based)
        #[arg(long)]
        row: Option<usize>,

        /// Number of candidates to print for the row
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show the ranked successors of one item
    Successors {
        #[arg(long, default_value = "data/sessions_train.csv")]
        train: PathBuf,

        #[arg(long, default_value = "data/sessions_test_task1.csv")]
        test: PathBuf,

        /// Item identifier to look up
        #[arg(long)]
        item: String,

        /// Number of successors to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { train, test, output } => handle_run(train, test, output)?,
        Commands::Inspect {
            snapshot,
            row,
            limit,
        } => handle_inspect(snapshot, row, limit)?,
        Commands::Successors {
            train,
            test,
            item,
            limit,
        } => handle_successors(train, test, item, limit)?,
    }

    Ok(())
}

/// Handle the 'run' command
fn handle_run(train: PathBuf, test: PathBuf, output: PathBuf) -> Result<()> {
    let orchestrator = RecallOrchestrator::new(RecallConfig::default());
    let summary = orchestrator
        .run(&train, &test, &output)
        .context("Recall run failed")?;

    print_summary(&summary, orchestrator.config());
    println!(
        "{} Wrote predictions to {}",
        "✓".green(),
        output.display()
    );
    Ok(())
}

/// Handle the 'inspect' command
fn handle_inspect(path: PathBuf, row: Option<usize>, limit: usize) -> Result<()> {
    let records = load_snapshot(&path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    let expected = RecallConfig::default().prediction_size;
    let stats = describe_lengths(&records, expected);

    println!("{}", format!("Snapshot {}", path.display()).bold().blue());
    println!("{}Rows: {}", "• ".green(), stats.rows);
    println!("{}Mean length: {:.2}", "• ".green(), stats.mean);
    println!("{}Min length: {}", "• ".green(), stats.min);
    println!("{}Max length: {}", "• ".green(), stats.max);
    let short = format!("Rows below {}: {}", expected, stats.short_rows);
    if stats.short_rows > 0 {
        println!("{}{}", "• ".yellow(), short.yellow());
    } else {
        println!("{}{}", "• ".green(), short);
    }

    if let Some(row) = row {
        let record = records
            .get(row)
            .ok_or_else(|| anyhow!("Row {} out of range (snapshot has {} rows)", row, records.len()))?;
        println!("{}", format!("Row {} [{}]:", row, record.locale).bold());
        for (rank, item) in record.next_item_prediction.iter().take(limit).enumerate() {
            println!("  {}. {}", (rank + 1).to_string().green(), item);
        }
    }
    Ok(())
}

/// Handle the 'successors' command
fn handle_successors(train: PathBuf, test: PathBuf, item: String, limit: usize) -> Result<()> {
    let start = Instant::now();
    let data = SessionData::load_from_files(&train, &test)
        .context("Failed to load session files")?;
    let orchestrator = RecallOrchestrator::default();
    let (table, index) = orchestrator.build_index(&data);
    info!("Built recall index in {:.2?}", start.elapsed());

    let Some(ranked) = index.candidates_for(&item) else {
        println!(
            "{} {} was never followed by another item; predictions fall back to the global list",
            "!".yellow(),
            item
        );
        return Ok(());
    };

    let counts = table.successors(&item).unwrap_or_default();
    println!(
        "{}",
        format!("Successors of {} ({} distinct):", item, counts.len()).bold().blue()
    );
    for (rank, successor) in ranked.iter().take(limit).enumerate() {
        let count = counts
            .iter()
            .find(|(id, _)| *id == successor.as_str())
            .map(|(_, count)| *count)
            .unwrap_or(0);
        println!("  {}. {} ({} times)", (rank + 1).to_string().green(), successor, count);
    }
    if ranked.len() < orchestrator.config().prediction_size {
        println!(
            "{} only {} ranked candidates; the rest would come from the fallback list",
            "•".cyan(),
            ranked.len()
        );
    }
    Ok(())
}

/// Helper function to format and print a run summary
fn print_summary(summary: &RunSummary, config: &RecallConfig) {
    println!("{}", "Recall run summary:".bold().blue());
    println!("{}Training sessions: {}", "• ".green(), summary.train_sessions);
    println!("{}Test sessions: {}", "• ".green(), summary.test_sessions);
    println!("{}Source items: {}", "• ".green(), summary.source_items);
    println!("{}Transitions: {}", "• ".green(), summary.transitions);
    if summary.empty_sessions > 0 {
        println!("{}Empty sessions skipped: {}", "• ".yellow(), summary.empty_sessions);
    }
    println!(
        "{}Fallback list: {} of {}",
        "• ".cyan(),
        summary.fallback_items,
        config.fallback_top_k
    );
    println!(
        "{}Branches: {} fallback-only, {} truncated, {} backfilled",
        "• ".cyan(),
        summary.fallback_only,
        summary.truncated,
        summary.backfilled
    );
    let short = format!(
        "Predictions below {}: {}",
        config.prediction_size, summary.short_predictions
    );
    if summary.short_predictions > 0 {
        println!("{}{}", "• ".yellow(), short.yellow());
    } else {
        println!("{}{}", "• ".cyan(), short);
    }
    println!("{}Elapsed: {:.2?}", "• ".cyan(), summary.elapsed);
}
