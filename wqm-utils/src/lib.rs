//! Shared utility functions for WQM crates.

/// Date utility functions
pub mod dates {
    use chrono::{Local, NaiveDate};

    /// Calendar format the historical endpoint expects: "YYYY-MM-DD"
    pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(QUERY_DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), QUERY_DATE_FORMAT)?)
    }

    /// Today's local calendar date as "YYYY-MM-DD"
    pub fn today() -> String {
        format_date(&Local::now().date_naive())
    }

    /// Whether `s` reads as a "YYYY-MM-DD" calendar date.
    ///
    /// Only used for diagnostics; dates are always sent to the service as given.
    pub fn is_query_date(s: &str) -> bool {
        parse_date(s).is_ok()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2025-06-01");
            assert_eq!(parse_date(&formatted).unwrap(), date);
        }

        #[test]
        fn test_is_query_date() {
            assert!(is_query_date("2025-06-01"));
            assert!(is_query_date(" 2025-06-01 "));
            assert!(!is_query_date("01/06/2025"));
            assert!(!is_query_date("2025-02-30"));
            assert!(!is_query_date(""));
        }

        #[test]
        fn test_today_shape() {
            assert!(is_query_date(&today()));
        }
    }
}
