pub mod cover;
pub mod error;
pub mod importer;
pub mod models;
pub mod parser;
pub mod render;
pub mod settings;
pub mod writer;

pub use error::{ImportError, ParseError, WriteError};
pub use importer::{import_library, import_rows, run, ImportReport, RowOutcome, RowResult};
pub use models::{BookRecord, ReadStatus};
pub use settings::Settings;
