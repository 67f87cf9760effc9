use std::collections::HashMap;

use crate::error::ParseError;
use crate::models::{BookRecord, ReadStatus};
use crate::parser::date::{parse_date, DEFAULT_DATE_FORMAT};

/// One export row keyed by column header.
pub type Row = HashMap<String, String>;

pub const COL_BOOK_ID: &str = "Book Id";
pub const COL_TITLE: &str = "Title";
pub const COL_SUBTITLE: &str = "Subtitle";
pub const COL_AUTHOR: &str = "Author";
pub const COL_ADDITIONAL_AUTHORS: &str = "Additional Authors";
pub const COL_ISBN: &str = "ISBN";
pub const COL_ISBN13: &str = "ISBN13";
pub const COL_MY_RATING: &str = "My Rating";
pub const COL_AVERAGE_RATING: &str = "Average Rating";
pub const COL_PAGES: &str = "Number of Pages";
pub const COL_YEAR_PUBLISHED: &str = "Year Published";
pub const COL_DATE_READ: &str = "Date Read";
pub const COL_DATE_ADDED: &str = "Date Added";
pub const COL_EXCLUSIVE_SHELF: &str = "Exclusive Shelf";

const SHELF_READ: &str = "read";
// Correct spelling, accepted in addition to the token the export actually emits.
const SHELF_CURRENTLY_READING: &str = "currently-reading";
// Misspelling found in real exports; kept verbatim.
const SHELF_CURRENTLY_READING_UPSTREAM: &str = "currenlty-reading";

/// Maps raw export rows onto [`BookRecord`]s.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    date_format: String,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl RecordNormalizer {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    pub fn normalize(&self, row: &Row) -> Result<BookRecord, ParseError> {
        let title = field(row, COL_TITLE).ok_or(ParseError::MissingField(COL_TITLE))?;
        let author = field(row, COL_AUTHOR).ok_or(ParseError::MissingField(COL_AUTHOR))?;
        let id = field(row, COL_BOOK_ID).unwrap_or_default();

        let record = BookRecord {
            community_id: non_empty(id.clone()),
            id,
            title,
            author,
            additional_authors: field(row, COL_ADDITIONAL_AUTHORS)
                .map(|value| split_authors(&value))
                .unwrap_or_default(),
            subtitle: field(row, COL_SUBTITLE),
            isbn10: field(row, COL_ISBN).and_then(|value| clean_isbn(&value)),
            isbn13: field(row, COL_ISBN13).and_then(|value| clean_isbn(&value)),
            cover_url: None,
            personal_rating: field(row, COL_MY_RATING).and_then(|value| parse_rating(&value)),
            community_rating: field(row, COL_AVERAGE_RATING)
                .and_then(|value| value.parse::<f64>().ok())
                .filter(|value| value.is_finite()),
            page_count: field(row, COL_PAGES).and_then(|value| value.parse::<u32>().ok()),
            year_published: field(row, COL_YEAR_PUBLISHED),
            date_read: field(row, COL_DATE_READ)
                .and_then(|value| parse_date(&value, &self.date_format)),
            date_added: field(row, COL_DATE_ADDED)
                .and_then(|value| parse_date(&value, &self.date_format)),
            read_status: field(row, COL_EXCLUSIVE_SHELF)
                .map(|value| read_status(&value))
                .unwrap_or_default(),
        };

        Ok(record.with_derived_cover_url())
    }
}

/// Trimmed, non-blank value for `key`. A missing column and an empty cell look the same.
fn field(row: &Row, key: &str) -> Option<String> {
    row.get(key).map(|value| value.trim().to_string()).and_then(non_empty)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Keeps ASCII digits only; `="0441013597"` becomes `0441013597`.
pub fn clean_isbn(value: &str) -> Option<String> {
    let cleaned = value
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .collect::<String>();
    non_empty(cleaned)
}

/// `0` means the book was never rated.
fn parse_rating(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|rating| *rating > 0)
}

fn split_authors(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect()
}

pub fn read_status(shelf: &str) -> ReadStatus {
    match shelf {
        SHELF_READ => ReadStatus::Read,
        SHELF_CURRENTLY_READING | SHELF_CURRENTLY_READING_UPSTREAM => {
            ReadStatus::CurrentlyReading
        }
        _ => ReadStatus::ToRead,
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_isbn, read_status, RecordNormalizer, Row};
    use crate::error::ParseError;
    use crate::models::ReadStatus;
    use chrono::NaiveDate;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn normalizes_full_export_row() {
        let record = RecordNormalizer::default()
            .normalize(&row(&[
                ("Book Id", "234225"),
                ("Title", "Dune"),
                ("Author", "Frank Herbert"),
                ("Additional Authors", "Brian Herbert, , Kevin J. Anderson "),
                ("ISBN", "=\"0441013597\""),
                ("ISBN13", "=\"9780441013593\""),
                ("My Rating", "5"),
                ("Average Rating", "4.27"),
                ("Number of Pages", "658"),
                ("Year Published", "2005"),
                ("Date Read", "2021/03/14"),
                ("Date Added", "2020/11/02"),
                ("Exclusive Shelf", "read"),
            ]))
            .expect("row should normalize");

        assert_eq!(record.id, "234225");
        assert_eq!(record.community_id.as_deref(), Some("234225"));
        assert_eq!(record.additional_authors, vec!["Brian Herbert", "Kevin J. Anderson"]);
        assert_eq!(record.isbn10.as_deref(), Some("0441013597"));
        assert_eq!(record.isbn13.as_deref(), Some("9780441013593"));
        assert_eq!(
            record.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/isbn/9780441013593-M.jpg")
        );
        assert_eq!(record.personal_rating, Some(5));
        assert_eq!(record.community_rating, Some(4.27));
        assert_eq!(record.page_count, Some(658));
        assert_eq!(record.year_published.as_deref(), Some("2005"));
        assert_eq!(record.date_read, NaiveDate::from_ymd_opt(2021, 3, 14));
        assert_eq!(record.date_added, NaiveDate::from_ymd_opt(2020, 11, 2));
        assert_eq!(record.read_status, ReadStatus::Read);
    }

    #[test]
    fn missing_title_or_author_fails() {
        let normalizer = RecordNormalizer::default();
        assert_eq!(
            normalizer.normalize(&row(&[("Author", "Frank Herbert")])),
            Err(ParseError::MissingField("Title"))
        );
        assert_eq!(
            normalizer.normalize(&row(&[("Title", "Dune"), ("Author", "  ")])),
            Err(ParseError::MissingField("Author"))
        );
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let record = RecordNormalizer::default()
            .normalize(&row(&[("Title", "Dune"), ("Author", "Frank Herbert")]))
            .expect("row should normalize");

        assert_eq!(record.id, "");
        assert_eq!(record.community_id, None);
        assert!(record.additional_authors.is_empty());
        assert_eq!(record.cover_url, None);
        assert_eq!(record.read_status, ReadStatus::ToRead);
    }

    #[test]
    fn tolerates_malformed_numbers_and_dates() {
        let record = RecordNormalizer::default()
            .normalize(&row(&[
                ("Title", "Dune"),
                ("Author", "Frank Herbert"),
                ("My Rating", "five"),
                ("Average Rating", "n/a"),
                ("Number of Pages", "lots"),
                ("Date Read", "last summer"),
            ]))
            .expect("row should normalize");

        assert_eq!(record.personal_rating, None);
        assert_eq!(record.community_rating, None);
        assert_eq!(record.page_count, None);
        assert_eq!(record.date_read, None);
    }

    #[test]
    fn zero_rating_means_unrated() {
        let record = RecordNormalizer::default()
            .normalize(&row(&[
                ("Title", "Dune"),
                ("Author", "Frank Herbert"),
                ("My Rating", "0"),
            ]))
            .expect("row should normalize");
        assert_eq!(record.personal_rating, None);
    }

    #[test]
    fn isbn_cleaning_keeps_digits_only() {
        assert_eq!(clean_isbn("=\"978-0-441-01359-3\"").as_deref(), Some("9780441013593"));
        assert_eq!(clean_isbn("=\"\""), None);
        assert_eq!(clean_isbn("n/a"), None);
    }

    #[test]
    fn maps_shelves() {
        assert_eq!(read_status("read"), ReadStatus::Read);
        assert_eq!(read_status("currently-reading"), ReadStatus::CurrentlyReading);
        assert_eq!(read_status("currenlty-reading"), ReadStatus::CurrentlyReading);
        assert_eq!(read_status("to-read"), ReadStatus::ToRead);
        assert_eq!(read_status("Read"), ReadStatus::ToRead);
        assert_eq!(read_status("abandoned"), ReadStatus::ToRead);
    }

    #[test]
    fn custom_date_format() {
        let record = RecordNormalizer::new("%d.%m.%Y")
            .normalize(&row(&[
                ("Title", "Dune"),
                ("Author", "Frank Herbert"),
                ("Date Added", "02.11.2020"),
            ]))
            .expect("row should normalize");
        assert_eq!(record.date_added, NaiveDate::from_ymd_opt(2020, 11, 2));
    }
}
