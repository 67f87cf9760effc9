use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use shelf_notes::parser::date::DEFAULT_DATE_FORMAT;
use shelf_notes::settings::{DEFAULT_NOTES_DIR, DEFAULT_RESOURCES_DIR};
use shelf_notes::{RowOutcome, RowResult, Settings};

/// Turn a Goodreads library export into one Markdown note per book.
#[derive(Parser, Debug)]
#[command(name = "shelf-notes", version, about)]
struct Cli {
    /// Goodreads library export (CSV).
    #[arg(short, long, env = "SHELF_NOTES_INPUT")]
    input: PathBuf,

    /// Vault root; notes and covers go below it.
    #[arg(short, long, env = "SHELF_NOTES_VAULT", default_value = ".")]
    vault: PathBuf,

    /// Notes folder, relative to the vault.
    #[arg(long, default_value = DEFAULT_NOTES_DIR)]
    notes_dir: String,

    /// Cover folder, relative to the vault.
    #[arg(long, default_value = DEFAULT_RESOURCES_DIR)]
    resources_dir: String,

    /// chrono pattern for the "Date Read" and "Date Added" columns.
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// Don't download covers; already present cover files are still linked.
    #[arg(long)]
    no_covers: bool,

    /// Write a JSON report of every row to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            input: self.input.clone(),
            vault_dir: self.vault.clone(),
            notes_dir: self.notes_dir.clone(),
            resources_dir: self.resources_dir.clone(),
            date_format: self.date_format.clone(),
            fetch_covers: !self.no_covers,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = cli.settings();

    let report = shelf_notes::run(&settings, print_row)
        .with_context(|| format!("import of {} failed", settings.input.display()))?;

    println!(
        "{} written, {} skipped, {} failed",
        report.stats.written, report.stats.skipped, report.stats.failed
    );

    if let Some(path) = cli.report.as_ref() {
        let json = report.to_json().context("cannot serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("cannot write report to {}", path.display()))?;
    }

    Ok(())
}

fn print_row(result: &RowResult) {
    match &result.outcome {
        RowOutcome::Written(note) => println!("✓ {}", note.file_name),
        RowOutcome::Skipped(err) => println!("- row {}: {}", result.row, err),
        RowOutcome::Failed(err) => println!("✗ row {}: {}", result.row, err),
    }
}
