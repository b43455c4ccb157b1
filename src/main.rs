use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use plan_uploader::apis::{CsvFileSource, GoogleSheetsSource, IntervalsIcuClient, JsonFileSink};
use plan_uploader::config::{Config, DEFAULT_CONFIG_PATH};
use plan_uploader::domain::WorkoutEvent;
use plan_uploader::logging;
use plan_uploader::pipeline::matcher::NoteMatcher;
use plan_uploader::pipeline::render::render;
use plan_uploader::pipeline::rows::PlanLayout;
use plan_uploader::pipeline::{filter_week, PlanPipeline};
use plan_uploader::{EventSink, RowSource};

#[derive(Parser)]
#[command(name = "plan_uploader")]
#[command(about = "Compile a training-plan sheet into intervals.icu workouts")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the plan, build events and upload them
    Sync {
        #[command(flatten)]
        plan: PlanArgs,
        /// Build and preview only, no upload
        #[arg(long)]
        dry_run: bool,
    },
    /// Same as `sync --dry-run`
    Preview {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Compile a single cell and print its step script
    Compile {
        /// Activity cell text
        text: String,
        #[arg(long, default_value = "")]
        purpose: String,
        /// Session note for the same day
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Args)]
struct PlanArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Read a local CSV export instead of Google Sheets
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Only this plan week
    #[arg(long)]
    week: Option<u32>,
    /// Write the events as JSON into this directory (dry runs default to `[plan] output_dir`)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Date used to infer the year of week headers (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,
    #[arg(long, value_enum)]
    layout: Option<PlanLayout>,
}

async fn fetch_rows(args: &PlanArgs, config: &Config) -> Result<Vec<plan_uploader::domain::TableRow>> {
    let source: Box<dyn RowSource> = match &args.csv {
        Some(path) => Box::new(CsvFileSource::new(path)),
        None => Box::new(GoogleSheetsSource::from_config(config.google_sheets()?)?),
    };

    println!("📡 Fetching plan from {}...", source.source_name());
    source
        .fetch_rows()
        .await
        .with_context(|| format!("Failed to fetch plan rows from {}", source.source_name()))
}

fn print_preview(events: &[WorkoutEvent]) {
    println!("Found {} events:\n", events.len());
    for event in events {
        println!(
            "  {} | {:35.35} | {:?}",
            event.date.format("%Y-%m-%d"),
            event.name,
            event.activity_type
        );
    }
}

async fn run_sync(args: PlanArgs, dry_run: bool) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let rows = fetch_rows(&args, &config).await?;

    let today = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let layout = args.layout.unwrap_or(config.plan.layout);
    info!(?layout, %today, rows = rows.len(), "Compiling plan");

    let run = PlanPipeline::new(layout, today).run(&rows);
    println!("\n📊 Plan results:");
    println!("   Weeks: {}", run.stats.weeks);
    println!("   Days: {}", run.stats.days);
    println!("   Events: {}", run.stats.events);
    println!("   From session notes: {}", run.stats.from_session_notes);
    if run.stats.skipped_weeks > 0 || run.stats.structural_gaps > 0 {
        warn!(
            skipped_weeks = run.stats.skipped_weeks,
            structural_gaps = run.stats.structural_gaps,
            "Some weeks were skipped"
        );
        println!(
            "⚠️  Skipped weeks: {}, structural gaps: {}",
            run.stats.skipped_weeks, run.stats.structural_gaps
        );
    }

    let events = match args.week {
        Some(week) => {
            let events = filter_week(run.events, week);
            if events.is_empty() {
                warn!(week, "No events in the requested week");
            }
            events
        }
        None => run.events,
    };

    println!();
    print_preview(&events);

    // dry runs always leave a JSON copy behind
    let output_dir = args
        .output
        .clone()
        .or_else(|| dry_run.then(|| PathBuf::from(&config.plan.output_dir)));
    if let Some(dir) = output_dir {
        let sink = JsonFileSink::new(dir);
        let receipt = sink.submit(&events).await.context("Failed to write events JSON")?;
        println!("\n💾 Saved events to {}", receipt.detail);
    }

    if dry_run {
        println!("\n[DRY RUN] No upload.");
        return Ok(());
    }

    let client = IntervalsIcuClient::from_config(config.intervals_icu()?);
    println!("\n📤 Uploading to intervals.icu...");
    match client.submit(&events).await {
        Ok(receipt) => {
            info!(submitted = receipt.submitted, "Upload finished");
            println!("✅ Done! Uploaded {} events", receipt.submitted);
            Ok(())
        }
        Err(e) => {
            error!("Upload failed: {}", e);
            println!("❌ Failed: {}", e);
            Err(e.into())
        }
    }
}

fn run_compile(text: &str, purpose: &str, note: Option<&str>) {
    let resolved = NoteMatcher::default().resolve(text, purpose, note);
    info!(source = ?resolved.source, steps = resolved.steps.len(), "Compiled cell");
    println!("{}", render(resolved.title.as_deref(), purpose, &resolved.steps));
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { plan, dry_run } => run_sync(plan, dry_run).await?,
        Commands::Preview { plan } => run_sync(plan, true).await?,
        Commands::Compile { text, purpose, note } => run_compile(&text, &purpose, note.as_deref()),
    }
    Ok(())
}
