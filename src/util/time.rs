use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Output shapes for feed timestamps.
///
/// Each format renders the timestamp in its own offset, so a caller-supplied
/// `+02:00` stays `+02:00` in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `2006-01-02T15:04:05Z07:00`, whole seconds, `Z` for a zero offset.
    /// Used by Atom.
    Rfc3339,
    /// `Mon, 02 Jan 2006 15:04:05 -0700`. Used by RSS 2.0.
    Rfc1123Z,
    /// `2006-01-02`. Used for the date segment of tag URIs.
    Date,
}

impl TimeFormat {
    pub fn format(self, ts: &DateTime<FixedOffset>) -> String {
        match self {
            TimeFormat::Rfc3339 => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimeFormat::Rfc1123Z => ts.format("%a, %d %b %Y %H:%M:%S %z").to_string(),
            TimeFormat::Date => ts.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Formats the first set timestamp among `candidates`.
///
/// Candidate order is the fallback chain: Atom asks for `[updated, created]`,
/// RSS for `[created, updated]`. Returns an empty string when none is set;
/// populating at least one is the caller's job.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use feedsmith::util::{any_time_format, TimeFormat};
///
/// let created = DateTime::parse_from_rfc3339("2020-01-02T03:04:05Z").ok();
/// assert_eq!(
///     any_time_format(TimeFormat::Rfc3339, &[None, created]),
///     "2020-01-02T03:04:05Z"
/// );
/// assert_eq!(any_time_format(TimeFormat::Date, &[None, None]), "");
/// ```
pub fn any_time_format(format: TimeFormat, candidates: &[Option<DateTime<FixedOffset>>]) -> String {
    candidates
        .iter()
        .flatten()
        .next()
        .map(|ts| format.format(ts))
        .unwrap_or_default()
}
