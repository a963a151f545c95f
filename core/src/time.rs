//! Time related utils.

use crate::{Error, Result};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %T GMT").to_string()
}

/// Parse time from RFC3339.
///
/// All of them are valid time:
///
/// - `2022-03-13T07:20:04Z`
/// - `2022-03-01T08:12:34+00:00`
/// - `2022-03-01T08:12:34.343+00:00`
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    Ok(chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| {
            Error::unexpected(format!("failed to parse rfc3339 time: {s}")).with_source(e)
        })?
        .with_timezone(&chrono::Utc))
}

/// Parse the `expires_on` field returned by Azure token endpoints.
///
/// Managed identity endpoints return unix seconds (`"1586984735"`), while
/// some other flows return RFC3339 strings. Both are accepted.
pub fn parse_expires_on(s: &str) -> Result<DateTime> {
    let s = s.trim();
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = s.parse().map_err(|e| {
            Error::unexpected(format!("failed to parse unix timestamp: {s}")).with_source(e)
        })?;
        return chrono::DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| Error::unexpected(format!("unix timestamp out of range: {s}")));
    }

    parse_rfc3339(s)
}
