//! HTTP date parsing and formatting
//!
//! `Date` and `Expires` use the HTTP-date grammar of RFC 9110 §5.6.7:
//! IMF-fixdate is preferred, RFC 850 and asctime must still be accepted.

/// HTTP date parsing error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpDateParseError {
    /// Date format was not recognized by any of the supported parsers
    #[error("Unrecognized HTTP date format: {0}")]
    UnrecognizedFormat(String),
    /// Date was parsed but represents a time before Unix epoch
    #[error("Invalid timestamp in HTTP date: {0}")]
    InvalidTimestamp(String),
}

/// HTTP date parsing utilities
pub mod httpdate {
    use std::time::{Duration, SystemTime};

    use chrono::{DateTime, NaiveDateTime, Utc};

    use super::HttpDateParseError;

    const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
    const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
    const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

    /// Parse an HTTP date into `SystemTime`
    ///
    /// # Errors
    ///
    /// `UnrecognizedFormat` when no supported grammar matches (including the
    /// common `Expires: 0`), `InvalidTimestamp` for dates before the epoch.
    pub fn parse_http_date(date_str: &str) -> Result<SystemTime, HttpDateParseError> {
        let trimmed = date_str.trim();

        let timestamp = [IMF_FIXDATE, RFC_850, ASCTIME]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(|naive| naive.and_utc().timestamp())
            .or_else(|| DateTime::parse_from_rfc2822(trimmed).ok().map(|dt| dt.timestamp()))
            .ok_or_else(|| HttpDateParseError::UnrecognizedFormat(date_str.to_string()))?;

        let seconds = u64::try_from(timestamp)
            .map_err(|_| HttpDateParseError::InvalidTimestamp(date_str.to_string()))?;
        Ok(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds))
    }

    /// Format `SystemTime` as an IMF-fixdate string
    #[must_use]
    pub fn fmt_http_date(time: SystemTime) -> String {
        let duration = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        let seconds = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);

        DateTime::<Utc>::from_timestamp(seconds, 0)
            .unwrap_or_default()
            .format(IMF_FIXDATE)
            .to_string()
    }
}
