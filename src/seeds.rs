//! Default content: the achievement catalogue and the daily quest templates.

use crate::config::QuestDef;
use crate::domain::{Achievement, QuestKind};

fn achievement(id: &str, title: &str, description: &str, icon: &str) -> Achievement {
  Achievement {
    id: id.into(),
    title: title.into(),
    description: description.into(),
    icon: icon.into(),
    unlocked: false,
    unlocked_at: None,
  }
}

/// Locked achievements a fresh profile (or a reset) starts with.
/// Unlock rules live in `gamification::qualifies`, keyed by these ids.
pub fn default_achievements() -> Vec<Achievement> {
  vec![
    achievement("first-video", "First Steps", "Complete your first video", "🎬"),
    achievement("5-videos", "Getting Started", "Complete 5 videos", "🌟"),
    achievement("10-videos", "Dedicated Learner", "Complete 10 videos", "📚"),
    achievement("first-course", "Course Conqueror", "Complete your first course", "🏆"),
    achievement("3-day-streak", "Consistent", "Maintain a 3-day streak", "🔥"),
    achievement("7-day-streak", "Week Warrior", "Maintain a 7-day streak", "⚡"),
    achievement("level-5", "Rising Star", "Reach level 5", "⭐"),
    achievement("level-10", "Expert", "Reach level 10", "💎"),
    achievement("night-owl", "Night Owl", "Complete a video after 10 PM", "🦉"),
    achievement("early-bird", "Early Bird", "Complete a video before 7 AM", "🐦"),
  ]
}

/// Built-in daily quests, used unless the TOML config lists its own.
pub fn default_quest_defs() -> Vec<QuestDef> {
  vec![
    QuestDef {
      id: "watch-1".into(),
      title: "Warm Up".into(),
      description: "Complete 1 video today".into(),
      kind: QuestKind::Videos,
      target: 1,
      reward: 25,
    },
    QuestDef {
      id: "watch-3".into(),
      title: "Triple Feature".into(),
      description: "Complete 3 videos today".into(),
      kind: QuestKind::Videos,
      target: 3,
      reward: 75,
    },
    QuestDef {
      id: "study-30".into(),
      title: "Focused Study".into(),
      description: "Watch 30 minutes of lessons today".into(),
      kind: QuestKind::Minutes,
      target: 30,
      reward: 50,
    },
  ]
}
