use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::cover::{BlockingHttp, CoverResolver, HttpGet};
use crate::error::{ImportError, ParseError, WriteError};
use crate::parser::goodreads::{RecordNormalizer, Row};
use crate::settings::Settings;
use crate::writer::{NoteWriter, WrittenNote};

#[derive(Debug)]
pub enum RowOutcome {
    Written(WrittenNote),
    Skipped(ParseError),
    Failed(WriteError),
}

#[derive(Debug)]
pub struct RowResult {
    /// 1-based position among data rows.
    pub row: usize,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub written: u64,
    pub skipped: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub stats: ImportStats,
    pub rows: Vec<RowResult>,
}

#[derive(Debug, Serialize)]
struct ReportEntry<'a> {
    row: usize,
    status: &'static str,
    file_name: Option<&'a str>,
    cover: Option<&'a str>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    stats: ImportStats,
    rows: Vec<ReportEntry<'a>>,
}

impl ImportReport {
    fn push(&mut self, result: RowResult) {
        match &result.outcome {
            RowOutcome::Written(_) => self.stats.written += 1,
            RowOutcome::Skipped(_) => self.stats.skipped += 1,
            RowOutcome::Failed(_) => self.stats.failed += 1,
        }
        self.rows.push(result);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let rows = self
            .rows
            .iter()
            .map(|result| match &result.outcome {
                RowOutcome::Written(note) => ReportEntry {
                    row: result.row,
                    status: "written",
                    file_name: Some(note.file_name.as_str()),
                    cover: note.cover.as_deref(),
                    error: None,
                },
                RowOutcome::Skipped(err) => ReportEntry {
                    row: result.row,
                    status: "skipped",
                    file_name: None,
                    cover: None,
                    error: Some(err.to_string()),
                },
                RowOutcome::Failed(err) => {
                    let WriteError::Io { file_name, source } = err;
                    ReportEntry {
                        row: result.row,
                        status: "failed",
                        file_name: Some(file_name.as_str()),
                        cover: None,
                        error: Some(source.to_string()),
                    }
                }
            })
            .collect();
        serde_json::to_string_pretty(&ReportDocument {
            stats: self.stats,
            rows,
        })
    }
}

/// Imports `settings.input` using a real HTTP client for covers.
pub fn run(
    settings: &Settings,
    on_row: impl FnMut(&RowResult),
) -> Result<ImportReport, ImportError> {
    let http = BlockingHttp::new()?;
    import_library(settings, http, on_row)
}

pub fn import_library<H: HttpGet>(
    settings: &Settings,
    http: H,
    on_row: impl FnMut(&RowResult),
) -> Result<ImportReport, ImportError> {
    let file = fs::File::open(&settings.input).map_err(|source| ImportError::Open {
        path: settings.input.clone(),
        source,
    })?;
    import_rows(file, settings, http, on_row)
}

/// Processes rows in input order; a bad row never stops the ones after it.
pub fn import_rows<R: Read, H: HttpGet>(
    input: R,
    settings: &Settings,
    http: H,
    mut on_row: impl FnMut(&RowResult),
) -> Result<ImportReport, ImportError> {
    let notes_dir = settings.notes_path();
    let resources_dir = settings.resources_path();
    ensure_dir(&notes_dir)?;
    ensure_dir(&resources_dir)?;

    let normalizer = RecordNormalizer::new(settings.date_format.clone());
    let resolver = if settings.fetch_covers {
        Some(CoverResolver::new(http))
    } else {
        None
    };
    let writer = NoteWriter::new(
        notes_dir,
        resources_dir,
        settings.resources_link(),
        resolver,
    );

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let mut report = ImportReport::default();

    for (index, record) in reader.records().enumerate() {
        let outcome = match record {
            Ok(record) => {
                let row: Row = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect();
                process_row(&normalizer, &writer, &row)
            }
            Err(err) => RowOutcome::Skipped(ParseError::Malformed(err.to_string())),
        };
        let result = RowResult {
            row: index + 1,
            outcome,
        };
        on_row(&result);
        report.push(result);
    }

    log::info!(
        "import finished: written={} skipped={} failed={}",
        report.stats.written,
        report.stats.skipped,
        report.stats.failed
    );
    Ok(report)
}

fn process_row<H: HttpGet>(
    normalizer: &RecordNormalizer,
    writer: &NoteWriter<H>,
    row: &Row,
) -> RowOutcome {
    let book = match normalizer.normalize(row) {
        Ok(book) => book,
        Err(err) => {
            log::warn!("row skipped: {}", err);
            return RowOutcome::Skipped(err);
        }
    };
    match writer.write(book) {
        Ok(note) => RowOutcome::Written(note),
        Err(err) => {
            log::warn!("note failed: {}", err);
            RowOutcome::Failed(err)
        }
    }
}

fn ensure_dir(path: &Path) -> Result<(), ImportError> {
    fs::create_dir_all(path).map_err(|source| ImportError::Prepare {
        path: path.to_path_buf(),
        source,
    })
}
