use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::cover::{CoverResolver, HttpGet};
use crate::error::WriteError;
use crate::models::BookRecord;
use crate::render::render_note;

#[derive(Debug, Clone)]
pub struct WrittenNote {
    pub file_name: String,
    pub path: PathBuf,
    /// Vault-relative cover path referenced from the note.
    pub cover: Option<String>,
}

/// Writes one note (and its cover) per book. Nothing here outlives a single book.
pub struct NoteWriter<H> {
    notes_dir: PathBuf,
    resources_dir: PathBuf,
    resources_link: String,
    resolver: Option<CoverResolver<H>>,
}

impl<H: HttpGet> NoteWriter<H> {
    /// `resources_link` is how notes refer to `resources_dir` (vault-relative, `/`-separated).
    pub fn new(
        notes_dir: impl Into<PathBuf>,
        resources_dir: impl Into<PathBuf>,
        resources_link: impl Into<String>,
        resolver: Option<CoverResolver<H>>,
    ) -> Self {
        Self {
            notes_dir: notes_dir.into(),
            resources_dir: resources_dir.into(),
            resources_link: resources_link.into(),
            resolver,
        }
    }

    pub fn write(&self, book: BookRecord) -> Result<WrittenNote, WriteError> {
        let file_name = book.file_name();
        let cover = self
            .resolve_cover(&book)
            .map_err(|err| WriteError::io(&file_name, err))?;

        let note = render_note(&book, cover.as_deref());
        let path = self.notes_dir.join(&file_name);
        write_note(&path, &note, modified_time(&book))
            .map_err(|err| WriteError::io(&file_name, err))?;
        log::info!("note written: {}", path.display());

        Ok(WrittenNote {
            file_name,
            path,
            cover,
        })
    }

    /// An existing cover file wins over a fresh download.
    fn resolve_cover(&self, book: &BookRecord) -> std::io::Result<Option<String>> {
        let cover_name = book.cover_file_name();
        let cover_path = self.resources_dir.join(&cover_name);
        let link = self.cover_link(&cover_name);

        if cover_path.exists() {
            log::info!("cover reused: {}", cover_path.display());
            return Ok(Some(link));
        }

        let Some(resolver) = self.resolver.as_ref() else {
            return Ok(None);
        };
        let Some(bytes) = resolver.resolve(book.isbn10.as_deref(), book.isbn13.as_deref()) else {
            log::info!("no cover found for {}", book.file_name());
            return Ok(None);
        };

        std::fs::write(&cover_path, bytes)?;
        log::info!("cover saved: {}", cover_path.display());
        Ok(Some(link))
    }

    fn cover_link(&self, cover_name: &str) -> String {
        let prefix = self.resources_link.trim_end_matches('/');
        if prefix.is_empty() {
            cover_name.to_string()
        } else {
            format!("{}/{}", prefix, cover_name)
        }
    }
}

/// Date added, then date read (local midnight), then now.
pub fn modified_time(book: &BookRecord) -> SystemTime {
    book.timestamp_date()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|datetime| datetime.and_local_timezone(Local).earliest())
        .map(SystemTime::from)
        .unwrap_or_else(SystemTime::now)
}

fn write_note(path: &Path, contents: &str, modified: SystemTime) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.set_modified(modified)?;
    Ok(())
}
