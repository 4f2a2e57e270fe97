use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

const COMMON_DATE_FORMATS: &[&str] = &[
  "%a %b %d %H:%M:%S %z %Y", // Twitter v1.1 created_at
  "%Y-%m-%d %H:%M:%S %z",    // Common format with timezone
];

pub fn parse_date(date_str: impl AsRef<str>) -> Option<DateTime<FixedOffset>> {
  let date_str = date_str.as_ref().trim();
  if date_str.is_empty() {
    return None;
  }

  if let Ok(parsed) = DateTime::parse_from_rfc3339(date_str) {
    return Some(parsed);
  }

  if let Ok(parsed) = DateTime::parse_from_rfc2822(date_str) {
    return Some(parsed);
  }

  COMMON_DATE_FORMATS
    .iter()
    .find_map(|fmt| DateTime::parse_from_str(date_str, fmt).ok())
}

/// RSS `pubDate`, always in UTC with a literal `Z` zone.
pub fn format_pub_date(date: &DateTime<Utc>) -> String {
  date.format("%a, %-d %b %Y %H:%M:%S Z").to_string()
}

/// Atom `updated`, RFC 3339 with whole seconds.
pub fn format_updated(date: &DateTime<Utc>) -> String {
  date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
