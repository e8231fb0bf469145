//! XP, levels, streaks and achievement unlocking.
//!
//! Everything here is pure: callers load `Gamification`, pass the clock in,
//! and persist the result. Each mutation reports into a `RewardSummary`.

use chrono::{DateTime, Duration, Local, NaiveDate, Timelike};
use tracing::{debug, info};

use crate::config::RewardRules;
use crate::domain::{Gamification, RewardSummary, UserStats};
use crate::util::{parse_local_day, timestamp};

/// What caused an achievement check. Time-of-day achievements only fire on completions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
  VideoCompleted { hour: u32 },
  Other,
}

impl Trigger {
  pub fn video_completed_at(now: DateTime<Local>) -> Self {
    Trigger::VideoCompleted { hour: now.hour() }
  }
}

/// Levels saturate at `u32::MAX` instead of wrapping on huge XP totals.
pub fn level_for_xp(xp: u64, xp_per_level: u64) -> u32 {
  u32::try_from(xp / xp_per_level.max(1))
    .unwrap_or(u32::MAX)
    .saturating_add(1)
}

/// Advance the streak for a completion happening on `today`.
/// Same day: unchanged. Yesterday or first ever: +1. Older: restart at 1.
pub fn continue_streak(stats: &mut UserStats, today: NaiveDate) {
  let last = stats.last_activity_date.as_deref().and_then(parse_local_day);
  match last {
    Some(d) if d == today => {}
    Some(d) if d == today - Duration::days(1) => stats.current_streak = stats.current_streak.saturating_add(1),
    None => stats.current_streak = stats.current_streak.saturating_add(1),
    Some(_) => stats.current_streak = 1,
  }
  // A same-day completion after a refresh zeroed the streak still counts as day one.
  if stats.current_streak == 0 {
    stats.current_streak = 1;
  }
  stats.longest_streak = stats.longest_streak.max(stats.current_streak);
}

/// Drop a streak whose last activity is older than yesterday. Returns true if stats changed.
pub fn refresh_streak(stats: &mut UserStats, today: NaiveDate) -> bool {
  let Some(last) = stats.last_activity_date.as_deref().and_then(parse_local_day) else {
    return false;
  };
  if last < today - Duration::days(1) && stats.current_streak != 0 {
    debug!(target: "gamification", %last, %today, streak = stats.current_streak, "Streak expired");
    stats.current_streak = 0;
    return true;
  }
  false
}

fn qualifies(id: &str, stats: &UserStats, trigger: Trigger) -> bool {
  match id {
    "first-video" => stats.total_videos_completed >= 1,
    "5-videos" => stats.total_videos_completed >= 5,
    "10-videos" => stats.total_videos_completed >= 10,
    "first-course" => stats.total_courses_completed >= 1,
    "3-day-streak" => stats.current_streak >= 3,
    "7-day-streak" => stats.current_streak >= 7,
    "level-5" => stats.level >= 5,
    "level-10" => stats.level >= 10,
    "night-owl" => matches!(trigger, Trigger::VideoCompleted { hour } if hour >= 22 || hour < 6),
    "early-bird" => matches!(trigger, Trigger::VideoCompleted { hour } if (5..7).contains(&hour)),
    _ => false,
  }
}

impl Gamification {
  /// Add XP and recompute the level.
  pub fn award_xp(&mut self, amount: u64, reason: &str, rules: &RewardRules, summary: &mut RewardSummary) {
    if amount == 0 {
      return;
    }
    self.stats.total_xp = self.stats.total_xp.saturating_add(amount);
    let level = level_for_xp(self.stats.total_xp, rules.xp_per_level);
    if level > self.stats.level {
      info!(target: "gamification", from = self.stats.level, to = level, "Level up");
    }
    self.stats.level = level;
    summary.xp_gained = summary.xp_gained.saturating_add(amount);
    debug!(target: "gamification", amount, %reason, total = self.stats.total_xp, "XP awarded");
  }

  /// Unlock every achievement whose rule now holds. Each unlock pays XP, which can
  /// raise the level and unlock more, so this repeats until nothing changes.
  pub fn check_achievements(
    &mut self,
    trigger: Trigger,
    now: DateTime<Local>,
    rules: &RewardRules,
    summary: &mut RewardSummary,
  ) {
    loop {
      let mut newly = Vec::new();
      for a in self.achievements.iter_mut() {
        if !a.unlocked && qualifies(&a.id, &self.stats, trigger) {
          a.unlocked = true;
          a.unlocked_at = Some(timestamp(now));
          newly.push(a.clone());
        }
      }
      if newly.is_empty() {
        break;
      }
      for a in newly {
        info!(target: "gamification", id = %a.id, "Achievement unlocked");
        self.award_xp(rules.achievement_xp, &a.title, rules, summary);
        summary.unlocked_achievements.push(a);
      }
    }
  }
}
