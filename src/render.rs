//! Markdown note rendering: a front-matter block followed by an empty note skeleton.

use chrono::NaiveDate;

use crate::models::{rating_to_symbol, BookRecord, RATING_SCALE};

const FRONT_MATTER_DELIMITER: &str = "---";
const DATE_FORMAT: &str = "%Y-%m-%d";
const BODY_SECTIONS: [&str; 2] = ["Description", "Highlights"];

/// A front-matter value and the rule for writing it out.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontMatterValue {
    Text(String),
    QuotedText(String),
    /// Joined with `, ` into a single quoted string.
    Sequence(Vec<String>),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Symbolic { value: u32, scale: u32 },
}

impl FrontMatterValue {
    /// `None` when the value would be blank, so the whole line is left out.
    pub fn render(&self) -> Option<String> {
        let rendered = match self {
            FrontMatterValue::Text(text) => text.trim().to_string(),
            FrontMatterValue::QuotedText(text) => {
                if text.trim().is_empty() {
                    return None;
                }
                quote(text)
            }
            FrontMatterValue::Sequence(items) => {
                let joined = items
                    .iter()
                    .map(|item| item.trim())
                    .filter(|item| !item.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if joined.is_empty() {
                    return None;
                }
                quote(&joined)
            }
            FrontMatterValue::Integer(value) => value.to_string(),
            FrontMatterValue::Float(value) => format!("{:.2}", value),
            FrontMatterValue::Date(date) => date.format(DATE_FORMAT).to_string(),
            FrontMatterValue::Symbolic { value, scale } => rating_to_symbol(*value, *scale),
        };
        if rendered.is_empty() {
            None
        } else {
            Some(rendered)
        }
    }
}

/// YAML double-quoted scalar; line breaks and tabs are escaped so a value stays on one line.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            ch if ch.is_control() => quoted.push_str(&format!("\\u{:04X}", ch as u32)),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Front-matter entries in output order; absent fields are already dropped.
pub fn front_matter(
    book: &BookRecord,
    cover_path: Option<&str>,
) -> Vec<(&'static str, FrontMatterValue)> {
    use FrontMatterValue::*;

    let cover_link = cover_path.map(|path| {
        let base_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        QuotedText(base_name.to_string())
    });

    let entries = [
        ("title", Some(QuotedText(book.title.clone()))),
        ("subtitle", book.subtitle.clone().map(QuotedText)),
        ("author", Some(QuotedText(book.author.clone()))),
        ("authors", Some(Sequence(book.additional_authors.clone()))),
        ("total_page", book.page_count.map(|pages| Integer(pages.into()))),
        ("date_read", book.date_read.map(Date)),
        ("date_added", book.date_added.map(Date)),
        ("read_status", Some(Text(book.read_status.dash_cased()))),
        (
            "rating",
            book.personal_rating.map(|value| Symbolic {
                value,
                scale: RATING_SCALE,
            }),
        ),
        ("isbn10", book.isbn10.clone().map(QuotedText)),
        ("isbn13", book.isbn13.clone().map(QuotedText)),
        ("goodreads_rating", book.community_rating.map(Float)),
        ("goodreads_id", book.community_id.clone().map(QuotedText)),
        ("cover_url", book.cover_url.clone().map(QuotedText)),
        ("cover_link", cover_link),
    ];

    entries
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
}

/// Renders the full note text. Identical input always gives identical output.
pub fn render_note(book: &BookRecord, cover_path: Option<&str>) -> String {
    let mut note = String::new();
    note.push_str(FRONT_MATTER_DELIMITER);
    note.push('\n');
    for (key, value) in front_matter(book, cover_path) {
        if let Some(rendered) = value.render() {
            note.push_str(key);
            note.push_str(": ");
            note.push_str(&rendered);
            note.push('\n');
        }
    }
    note.push_str(FRONT_MATTER_DELIMITER);
    note.push('\n');

    if let Some(path) = cover_path {
        note.push_str(&format!("![[{}]]\n", path));
    }

    for section in BODY_SECTIONS {
        note.push('\n');
        note.push_str(&format!("# {}\n", section));
    }
    note
}
