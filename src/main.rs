use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use devotional_parser::sink::{CsvSink, JsonSink, Sink, SqliteSink};
use devotional_parser::{extract, parser, Entries, Settings, View};

#[derive(Parser)]
#[command(name = "devotional", about = "Split a year of daily devotional readings into dated entries")]
struct Cli {
    /// Settings file (default: ./devotional.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and write its entries
    Parse {
        /// Source document (.pdf or plain text)
        input: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Output file (json/csv default to stdout; required for sqlite)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Group entries by month, days ascending
        #[arg(short, long)]
        grouped: bool,
    },
    /// Show parsing statistics for a document
    Stats {
        input: PathBuf,
    },
    /// Entries overview table
    Show {
        input: PathBuf,
        /// Only entries of this month (e.g. "JANEIRO", "may")
        #[arg(short, long)]
        month: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
    Sqlite,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    info!(settings = ?settings, "starting devotional parser");

    let result = match cli.command {
        Commands::Parse {
            input,
            format,
            out,
            grouped,
        } => {
            let entries = load_entries(&input, &settings)?;
            let view = if grouped || settings.output.grouped {
                View::Grouped
            } else {
                View::Flat
            };
            let written = write_entries(&entries, view, format, &input, out.as_deref())?;
            if out.is_some() {
                println!("Wrote {} entries.", written);
            }
            Ok(())
        }
        Commands::Stats { input } => {
            let entries = load_entries(&input, &settings)?;
            println!("Entries:   {}", entries.len());
            println!(
                "No verse:  {}",
                entries.flat().iter().filter(|e| e.reference.is_none()).count()
            );

            println!("\n--- Strategies ---");
            for (strategy, n) in entries.count_by_strategy() {
                let name = strategy.map(|s| s.as_str()).unwrap_or("none");
                println!("  {:<9} {}", name, n);
            }

            println!("\n--- Months ---");
            for (month, n) in entries.count_by_month() {
                println!("  {:<10} {}", month, n);
            }
            Ok(())
        }
        Commands::Show {
            input,
            month,
            limit,
        } => {
            let entries = load_entries(&input, &settings)?;
            let wanted = month.map(|m| m.to_uppercase());
            let rows: Vec<_> = entries
                .flat()
                .iter()
                .filter(|e| wanted.as_deref().map_or(true, |m| e.month == m))
                .take(limit)
                .collect();
            if rows.is_empty() {
                println!("No entries found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<10} | {:>3} | {:<28} | {:<22} | {:<30}",
                "#", "Month", "Day", "Title", "Reference", "Body"
            );
            println!("{}", "-".repeat(112));
            for (i, e) in rows.iter().enumerate() {
                let reference = e
                    .reference
                    .as_ref()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>3} | {:<10} | {:>3} | {:<28} | {:<22} | {:<30}",
                    i + 1,
                    e.month,
                    e.day,
                    truncate(&e.title, 28),
                    truncate(&reference, 22),
                    truncate(&e.body.replace('\n', " "), 30),
                );
            }
            println!("\n{} of {} entries", rows.len(), entries.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_entries(input: &Path, settings: &Settings) -> anyhow::Result<Entries> {
    let raw = extract::extract_text(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .context("progress template")?
            .progress_chars("#>-"),
    );

    let entries = parser::parse_document(&raw, &settings.structure, &pb)?;
    if entries.is_empty() {
        warn!(path = %input.display(), "no date markers found; nothing to structure");
    }
    Ok(entries)
}

fn write_entries(
    entries: &Entries,
    view: View,
    format: Format,
    input: &Path,
    out: Option<&Path>,
) -> anyhow::Result<usize> {
    let mut sink: Box<dyn Sink> = match (format, out) {
        (Format::Sqlite, None) => anyhow::bail!("--out is required for sqlite output"),
        (Format::Sqlite, Some(path)) => {
            let source = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());
            Box::new(SqliteSink::open(path, &source)?)
        }
        (Format::Json, Some(path)) => Box::new(JsonSink::new(create(path)?)),
        (Format::Json, None) => Box::new(JsonSink::new(std::io::stdout().lock())),
        (Format::Csv, Some(path)) => Box::new(CsvSink::new(create(path)?)),
        (Format::Csv, None) => Box::new(CsvSink::new(std::io::stdout().lock())),
    };
    Ok(sink.write(entries, view)?)
}

fn create(path: &Path) -> anyhow::Result<impl Write> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(std::io::BufWriter::new(file))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
