//! Domain models persisted in the JSON files: catalog, progress, gamification,
//! notes, quizzes, analytics and quests. Field names are camelCase on disk and on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What kind of file a catalog entry points at.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
  Video,
  Pdf,
}

/// One video or PDF inside a course folder.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
  pub id: u64,
  pub title: String,
  /// File name relative to `<coursePath>/<course title>/`.
  pub file_path: String,
  /// Root directory the course was found under.
  pub course_path: String,
  #[serde(rename = "type")]
  pub kind: ContentKind,
  /// Companion PDF matched by title (videos only).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pdf: Option<Box<ContentItem>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
  pub id: u64,
  pub title: String,
  pub course_path: String,
  pub videos: Vec<ContentItem>,
  pub pdfs: Vec<ContentItem>,
  /// Videos followed by PDFs.
  pub content: Vec<ContentItem>,
}

/// Contents of `data.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
  pub courses: Vec<Course>,
}

impl Catalog {
  pub fn course(&self, id: u64) -> Option<&Course> {
    self.courses.iter().find(|c| c.id == id)
  }

  pub fn course_by_title(&self, title: &str) -> Option<&Course> {
    self.courses.iter().find(|c| c.title == title)
  }

  pub fn course_of_video(&self, video_id: u64) -> Option<&Course> {
    self.courses
      .iter()
      .find(|c| c.videos.iter().any(|v| v.id == video_id))
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
  #[serde(default)] pub current_time: f64,
  #[serde(default)] pub duration: f64,
  #[serde(default)] pub completed: bool,
  #[serde(default)] pub last_updated: Option<String>,
}

/// Contents of `progress.json`, keyed by video id.
pub type ProgressMap = BTreeMap<u64, VideoProgress>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
  #[serde(rename = "totalXP", default)]
  pub total_xp: u64,
  #[serde(default = "first_level")]
  pub level: u32,
  #[serde(default)] pub current_streak: u32,
  #[serde(default)] pub longest_streak: u32,
  #[serde(default)] pub total_videos_completed: u32,
  #[serde(default)] pub total_courses_completed: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_activity_date: Option<String>,
}

fn first_level() -> u32 { 1 }

impl Default for UserStats {
  fn default() -> Self {
    Self {
      total_xp: 0,
      level: 1,
      current_streak: 0,
      longest_streak: 0,
      total_videos_completed: 0,
      total_courses_completed: 0,
      last_activity_date: None,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
  pub id: String,
  pub title: String,
  pub description: String,
  pub icon: String,
  #[serde(default)] pub unlocked: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unlocked_at: Option<String>,
}

/// Contents of `gamification.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Gamification {
  #[serde(default)]
  pub stats: UserStats,
  #[serde(default = "crate::seeds::default_achievements")]
  pub achievements: Vec<Achievement>,
}

impl Default for Gamification {
  fn default() -> Self {
    Self {
      stats: UserStats::default(),
      achievements: crate::seeds::default_achievements(),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  pub id: u64,
  pub video_id: u64,
  /// Position in the video, in seconds.
  pub timestamp: f64,
  pub content: String,
  pub created_at: String,
}

/// Contents of `notes.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotesBook {
  /// Next id to hand out; never reused, even after deletes.
  #[serde(default)]
  pub next_id: u64,
  /// Keyed by video id.
  #[serde(default)]
  pub notes: BTreeMap<u64, Vec<Note>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub question: String,
  pub options: Vec<String>,
  pub correct_index: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
  pub video_id: u64,
  pub questions: Vec<Question>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub best_score: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub passed_at: Option<String>,
}

/// Contents of `quizzes.json`, keyed by video id.
pub type QuizBook = BTreeMap<u64, Quiz>;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStat {
  /// Seconds.
  #[serde(default)] pub watch_time: f64,
  #[serde(default)] pub videos_completed: u32,
}

/// Contents of `analytics.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
  /// Seconds.
  #[serde(default)] pub total_watch_time: f64,
  /// Keyed by `YYYY-MM-DD`.
  #[serde(default)] pub daily_stats: BTreeMap<String, ActivityStat>,
  /// Keyed by course id.
  #[serde(default)] pub course_stats: BTreeMap<u64, ActivityStat>,
}

/// What a quest counts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
  /// Videos completed today.
  Videos,
  /// Whole minutes watched today.
  Minutes,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuest {
  pub id: String,
  pub title: String,
  pub description: String,
  pub kind: QuestKind,
  pub target: u32,
  #[serde(default)] pub progress: u32,
  pub reward: u64,
  #[serde(default)] pub completed: bool,
}

/// Contents of `quests.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestBoard {
  /// `YYYY-MM-DD` of the last reset; `None` for a board never reset.
  #[serde(default)] pub last_reset: Option<String>,
  #[serde(default)] pub daily_quests: Vec<DailyQuest>,
}

/// What a single action earned. Returned to the client so it can animate XP and unlocks.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
  pub xp_gained: u64,
  pub level_before: u32,
  pub level_after: u32,
  pub leveled_up: bool,
  pub unlocked_achievements: Vec<Achievement>,
  pub completed_quests: Vec<DailyQuest>,
  pub course_completed: bool,
}

impl RewardSummary {
  pub fn start(stats: &UserStats) -> Self {
    Self {
      level_before: stats.level,
      level_after: stats.level,
      ..Self::default()
    }
  }

  pub fn finish(&mut self, stats: &UserStats) {
    self.level_after = stats.level;
    self.leveled_up = self.level_after > self.level_before;
  }
}
