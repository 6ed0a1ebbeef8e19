use crate::TextError;
use chrono::{DateTime, NaiveDate};

/// A calendar date as entered on a letter form (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LetterDate(NaiveDate);

impl LetterDate {
    /// Parses a form date.
    ///
    /// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (the date part is kept as written,
    /// with no timezone shift).
    pub fn parse(input: &str) -> Result<Self, TextError> {
        let trimmed = input.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self(dt.date_naive()))
            .map_err(|_| TextError::InvalidDate(trimmed.to_owned()))
    }

    /// Long form used in letters, for example `March 5, 2024`.
    pub fn long_form(&self) -> String {
        self.0.format("%B %-d, %Y").to_string()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for LetterDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Formats a raw form date for display.
///
/// Empty, missing or unreadable input renders as an empty string rather than an error, so a
/// half-filled draft always renders.
pub fn format_long_date(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    LetterDate::parse(input)
        .map(|date| date.long_form())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_long_date() {
        assert_eq!(format_long_date("2024-03-05"), "March 5, 2024");
        assert_eq!(format_long_date("2023-12-31"), "December 31, 2023");
    }

    #[test]
    fn test_format_long_date_empty_and_invalid() {
        assert_eq!(format_long_date(""), "");
        assert_eq!(format_long_date("   "), "");
        assert_eq!(format_long_date("not a date"), "");
        assert_eq!(format_long_date("2024-02-30"), "");
    }

    #[test]
    fn test_parse_rfc3339_keeps_written_date() {
        let date = LetterDate::parse("2024-03-05T23:30:00-08:00").unwrap();
        assert_eq!(date.long_form(), "March 5, 2024");
        assert_eq!(date.to_string(), "2024-03-05");
    }
}
