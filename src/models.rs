use chrono::NaiveDate;

pub const RATING_SCALE: u32 = 5;
pub const RATING_FILLED: char = '★';
pub const RATING_EMPTY: char = '☆';

const COVER_URL_TEMPLATE: &str = "https://covers.openlibrary.org/b/isbn/{isbn}-{size}.jpg";

/// Shelf a book sits on in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadStatus {
    Read,
    #[default]
    ToRead,
    CurrentlyReading,
}

impl ReadStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ReadStatus::Read => "Read",
            ReadStatus::ToRead => "ToRead",
            ReadStatus::CurrentlyReading => "CurrentlyReading",
        }
    }

    /// `CurrentlyReading` -> `currently-reading`
    pub fn dash_cased(&self) -> String {
        camel_to_dash(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub additional_authors: Vec<String>,
    pub subtitle: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub cover_url: Option<String>,
    pub personal_rating: Option<u32>,
    pub community_rating: Option<f64>,
    pub community_id: Option<String>,
    pub page_count: Option<u32>,
    pub year_published: Option<String>,
    pub date_read: Option<NaiveDate>,
    pub date_added: Option<NaiveDate>,
    pub read_status: ReadStatus,
}

impl BookRecord {
    /// Minimal record: everything optional left empty.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            author: author.into(),
            additional_authors: vec![],
            subtitle: None,
            isbn10: None,
            isbn13: None,
            cover_url: None,
            personal_rating: None,
            community_rating: None,
            community_id: None,
            page_count: None,
            year_published: None,
            date_read: None,
            date_added: None,
            read_status: ReadStatus::default(),
        }
    }

    /// ISBN preferred for lookups and file names: isbn13 first, then isbn10.
    pub fn preferred_isbn(&self) -> Option<&str> {
        self.isbn13.as_deref().or(self.isbn10.as_deref())
    }

    pub fn with_derived_cover_url(mut self) -> Self {
        self.cover_url = cover_url(self.isbn10.as_deref(), self.isbn13.as_deref());
        self
    }

    /// `{title} - {author}` with path separators replaced by `%` and control characters by spaces.
    pub fn file_stem(&self) -> String {
        sanitize_file_stem(&format!("{} - {}", self.title, self.author))
    }

    pub fn file_name(&self) -> String {
        format!("{}.md", self.file_stem())
    }

    /// `book%{isbn}.jpg`, or the URL-encoded note stem as `.png` when no ISBN is known.
    pub fn cover_file_name(&self) -> String {
        match self.preferred_isbn() {
            Some(isbn) => format!("book%{}.jpg", isbn),
            None => format!("{}.png", urlencoding::encode(&self.file_stem())),
        }
    }

    pub fn timestamp_date(&self) -> Option<NaiveDate> {
        self.date_added.or(self.date_read)
    }
}

pub fn cover_url(isbn10: Option<&str>, isbn13: Option<&str>) -> Option<String> {
    isbn13.or(isbn10).map(|isbn| cover_image_url(isbn, "M"))
}

pub fn cover_image_url(isbn: &str, size: &str) -> String {
    COVER_URL_TEMPLATE
        .replace("{isbn}", isbn)
        .replace("{size}", size)
}

pub fn rating_to_symbol(rating: u32, max: u32) -> String {
    let filled = rating.min(max) as usize;
    let empty = max as usize - filled;
    let mut symbol = String::with_capacity(max as usize * RATING_FILLED.len_utf8());
    symbol.extend(std::iter::repeat(RATING_FILLED).take(filled));
    symbol.extend(std::iter::repeat(RATING_EMPTY).take(empty));
    symbol
}

pub fn camel_to_dash(value: &str) -> String {
    let mut dashed = String::with_capacity(value.len() + 4);
    for (index, ch) in value.chars().enumerate() {
        if ch.is_uppercase() && index > 0 {
            dashed.push('-');
        }
        dashed.extend(ch.to_lowercase());
    }
    dashed
}

fn sanitize_file_stem(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '/' | '\\' => '%',
            ch if ch.is_control() => ' ',
            _ => ch,
        })
        .collect()
}
