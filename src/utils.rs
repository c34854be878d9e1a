// Utility functions
use chrono::{DateTime, Utc};

/// Parses an RFC 3339 timestamp, if possible.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Converts a display name to kebab-case.
pub fn to_kebab_case(text: &str) -> String {
    text.to_lowercase().replace(" ", "-")
}
