use chrono::NaiveDate;

/// Native date pattern of the Goodreads export (`2021/03/14`).
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

/// Parses `value` with a chrono pattern. Blank or malformed input yields `None`.
pub fn parse_date(value: &str, pattern: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, pattern) {
        Ok(date) => Some(date),
        Err(err) => {
            log::debug!("unparseable date \"{}\" for pattern {}: {}", trimmed, pattern, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_date, DEFAULT_DATE_FORMAT};
    use chrono::NaiveDate;

    #[test]
    fn parses_export_dates() {
        assert_eq!(
            parse_date("2021/03/14", DEFAULT_DATE_FORMAT),
            NaiveDate::from_ymd_opt(2021, 3, 14)
        );
        assert_eq!(
            parse_date(" 2019/12/01 ", DEFAULT_DATE_FORMAT),
            NaiveDate::from_ymd_opt(2019, 12, 1)
        );
    }

    #[test]
    fn honours_custom_pattern() {
        assert_eq!(
            parse_date("14.03.2021", "%d.%m.%Y"),
            NaiveDate::from_ymd_opt(2021, 3, 14)
        );
    }

    #[test]
    fn tolerates_garbage() {
        assert_eq!(parse_date("", DEFAULT_DATE_FORMAT), None);
        assert_eq!(parse_date("yesterday", DEFAULT_DATE_FORMAT), None);
        assert_eq!(parse_date("2021-03-14", DEFAULT_DATE_FORMAT), None);
        assert_eq!(parse_date("2021/02/30", DEFAULT_DATE_FORMAT), None);
    }
}
