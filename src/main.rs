//! # chatstats CLI
//!
//! Command-line interface for the chatstats library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use chatstats::ChatstatsError;
use chatstats::cli::Args;
use chatstats::inbox::{InboxReader, resolve_inbox_dir};
use chatstats::report::{Analysis, run_on};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.log_level());

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the `-v`/`-q` level.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatstats={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<(), ChatstatsError> {
    let total_start = Instant::now();
    let config = args.to_config()?;
    let inbox_dir = resolve_inbox_dir(args.folder.as_deref())?;
    let analysis: Analysis = args.analysis.into();

    // Print header
    println!("📊 chatstats v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Inbox:    {}", inbox_dir.display());
    println!("💾 Output:   {}", config.output_dir.display());
    println!("🔬 Analysis: {}", analysis);
    if let Some(start) = config.start_date {
        println!("📅 From:     {}", start);
    }
    if let Some(end) = config.end_date {
        println!("📅 Until:    {}", end);
    }
    if !config.inbox.filters.is_empty() {
        println!("🔍 Filter:   {}", config.inbox.filters.join(", "));
    }
    println!();

    // Step 1: Load
    println!("⏳ Loading conversations...");
    let load_start = Instant::now();
    let reader = InboxReader::new(&inbox_dir).with_config(config.inbox.clone());
    let inbox = reader.load_all()?;
    println!(
        "   Loaded {} conversations, {} messages ({:.2}s)",
        inbox.conversations.len(),
        inbox.total_messages(),
        load_start.elapsed().as_secs_f64()
    );
    if !inbox.skipped.is_empty() {
        println!("⚠️  Skipped {} unreadable conversations:", inbox.skipped.len());
        for skipped in &inbox.skipped {
            println!("   {}: {}", skipped.folder, skipped.reason);
        }
    }

    // Step 2: Analyse and write
    println!("📈 Running analyses...");
    let run_start = Instant::now();
    let summary = run_on(analysis, &inbox.conversations, &config)?;
    for output in &summary.outputs {
        println!(
            "   {:<12} {} tables, {} charts → {}",
            output.analysis.to_string(),
            output.tables.len(),
            output.charts.len(),
            output.dir.display()
        );
    }
    println!("   Written in {:.2}s", run_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Reports saved to {}", config.output_dir.display());

    if !summary.top_chats.is_empty() {
        println!();
        println!("🏆 Largest chats ({}):", config.sort_by.noun());
        for (rank, (title, value)) in summary.top_chats.iter().enumerate() {
            println!("   {:>2}. {} ({})", rank + 1, title, value);
        }
    }

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Conversations: {}", summary.conversations);
    println!("   Messages:      {}", summary.total_messages);
    println!("   Files written: {}", summary.files_written());
    if summary.chart_failures() > 0 {
        println!(
            "   ⚠️  {} charts failed to render (see log)",
            summary.chart_failures()
        );
    }
    println!("   Total time:    {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
