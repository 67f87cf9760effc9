use std::path::PathBuf;

use crate::parser::date::DEFAULT_DATE_FORMAT;

pub const DEFAULT_NOTES_DIR: &str = "books";
pub const DEFAULT_RESOURCES_DIR: &str = "resources";

/// Everything one import run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub vault_dir: PathBuf,
    /// Vault-relative.
    pub notes_dir: String,
    /// Vault-relative; also used as the link prefix inside notes.
    pub resources_dir: String,
    pub date_format: String,
    pub fetch_covers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("goodreads_library_export.csv"),
            vault_dir: PathBuf::from("."),
            notes_dir: DEFAULT_NOTES_DIR.to_string(),
            resources_dir: DEFAULT_RESOURCES_DIR.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            fetch_covers: true,
        }
    }
}

impl Settings {
    pub fn notes_path(&self) -> PathBuf {
        self.vault_dir.join(&self.notes_dir)
    }

    pub fn resources_path(&self) -> PathBuf {
        self.vault_dir.join(&self.resources_dir)
    }

    pub fn resources_link(&self) -> String {
        self.resources_dir
            .replace('\\', "/")
            .trim_matches('/')
            .to_string()
    }
}
