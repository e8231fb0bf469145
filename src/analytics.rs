//! Cumulative watch time and completion counts, per day and per course.

use chrono::NaiveDate;

use crate::domain::Analytics;
use crate::util::{day_key, sanitize_seconds};

impl Analytics {
  pub fn record_watch_time(&mut self, seconds: f64, course_id: Option<u64>, today: NaiveDate) {
    let seconds = sanitize_seconds(seconds);
    self.total_watch_time += seconds;
    self.daily_stats.entry(day_key(today)).or_default().watch_time += seconds;
    if let Some(id) = course_id {
      self.course_stats.entry(id).or_default().watch_time += seconds;
    }
  }

  pub fn record_completion(&mut self, course_id: Option<u64>, today: NaiveDate) {
    self.daily_stats.entry(day_key(today)).or_default().videos_completed += 1;
    if let Some(id) = course_id {
      self.course_stats.entry(id).or_default().videos_completed += 1;
    }
  }

  /// Whole minutes watched on `day`.
  pub fn minutes_on(&self, day: NaiveDate) -> u32 {
    self.daily_stats
      .get(&day_key(day))
      .map(|s| (s.watch_time / 60.0).floor() as u32)
      .unwrap_or(0)
  }
}
