//! Small utility helpers used across modules.

use chrono::{DateTime, Local, NaiveDate};

/// Normalize a content title for fuzzy matching: lowercase, ASCII alphanumerics only.
/// "01 - Intro_to Rust.mp4" and "01 Intro to Rust" both become "01introtorust".
pub fn normalize_title(s: &str) -> String {
  s.chars()
    .filter(|c| c.is_ascii_alphanumeric())
    .map(|c| c.to_ascii_lowercase())
    .collect()
}

/// Calendar key used by analytics and quests (`YYYY-MM-DD`).
pub fn day_key(day: NaiveDate) -> String {
  day.format("%Y-%m-%d").to_string()
}

/// Parse a stored timestamp back into a local calendar day.
/// Accepts RFC 3339 (what we write) and bare `YYYY-MM-DD` (hand-edited files).
pub fn parse_local_day(s: &str) -> Option<NaiveDate> {
  if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
    return Some(ts.with_timezone(&Local).date_naive());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Timestamps are persisted as RFC 3339 with the local offset.
pub fn timestamp(now: DateTime<Local>) -> String {
  now.to_rfc3339()
}

/// Clamp client-supplied seconds: NaN, infinities and negatives become 0.
pub fn sanitize_seconds(v: f64) -> f64 {
  if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn normalize_strips_punctuation_and_case() {
    assert_eq!(normalize_title("01 - Intro_to Rust"), "01introtorust");
    assert_eq!(normalize_title("Ünïcode!!"), "ncode");
    assert_eq!(normalize_title("---"), "");
  }

  #[test]
  fn local_day_roundtrips_through_timestamp() {
    let now = Local.with_ymd_and_hms(2026, 3, 14, 23, 30, 0).unwrap();
    let day = parse_local_day(&timestamp(now)).expect("day");
    assert_eq!(day, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    assert_eq!(parse_local_day("2026-03-01"), NaiveDate::from_ymd_opt(2026, 3, 1));
    assert_eq!(parse_local_day("yesterday"), None);
  }

  #[test]
  fn seconds_are_sanitized() {
    assert_eq!(sanitize_seconds(f64::NAN), 0.0);
    assert_eq!(sanitize_seconds(-3.0), 0.0);
    assert_eq!(sanitize_seconds(f64::INFINITY), 0.0);
    assert_eq!(sanitize_seconds(12.5), 12.5);
  }

  #[test]
  fn truncation_keeps_short_strings() {
    assert_eq!(trunc_for_log("short", 10), "short");
    assert!(trunc_for_log("a much longer string", 4).starts_with("a mu…"));
  }
}
