//! Runtime settings from environment variables plus optional TOML tuning
//! (reward amounts, thresholds and daily quest definitions).
//!
//! See `LmsConfig`, `RewardRules` and `QuestDef` for the expected TOML schema:
//!
//! ```toml
//! [rewards]
//! video_xp = 25
//! completion_threshold = 0.9
//!
//! [[quests]]
//! id = "watch-1"
//! title = "Warm Up"
//! description = "Complete 1 video"
//! kind = "videos"
//! target = 1
//! reward = 25
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::QuestKind;
use crate::seeds::default_quest_defs;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct LmsConfig {
  #[serde(default)]
  pub rewards: RewardRules,
  #[serde(default)]
  pub quests: Vec<QuestDef>,
}

/// XP amounts and thresholds used by the gamification engine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewardRules {
  pub video_xp: u64,
  pub course_xp: u64,
  pub achievement_xp: u64,
  pub quiz_xp: u64,
  pub xp_per_level: u64,
  /// Watched fraction above which a video counts as completed.
  pub completion_threshold: f64,
  /// Fraction of correct answers needed to pass a quiz.
  pub quiz_pass_score: f64,
}

impl Default for RewardRules {
  fn default() -> Self {
    Self {
      video_xp: 25,
      course_xp: 100,
      achievement_xp: 50,
      quiz_xp: 20,
      xp_per_level: 100,
      completion_threshold: 0.9,
      quiz_pass_score: 0.7,
    }
  }
}

/// Daily quest template; the live board is rebuilt from these on every reset.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct QuestDef {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub description: String,
  pub kind: QuestKind,
  pub target: u32,
  pub reward: u64,
}

/// Everything the server needs to start.
#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  pub course_paths: Vec<PathBuf>,
  pub data_dir: PathBuf,
  pub static_dir: PathBuf,
  pub rules: RewardRules,
  pub quests: Vec<QuestDef>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      port: 4000,
      course_paths: Vec::new(),
      data_dir: PathBuf::from("."),
      static_dir: PathBuf::from("./static"),
      rules: RewardRules::default(),
      quests: default_quest_defs(),
    }
  }
}

impl Settings {
  /// Read PORT, COURSE_PATH, DATA_DIR, STATIC_DIR and LMS_CONFIG_PATH.
  /// Unset or unparsable values fall back to defaults.
  pub fn from_env() -> Self {
    Self::from_vars(|key| std::env::var(key).ok())
  }

  /// Same as `from_env`, with variables looked up through `var`.
  pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
    let mut s = Settings::default();

    if let Some(port) = var("PORT").and_then(|p| p.parse::<u16>().ok()) {
      s.port = port;
    }
    if let Some(raw) = var("COURSE_PATH") {
      s.course_paths = parse_course_paths(&raw);
    }
    if let Some(dir) = var("DATA_DIR") {
      s.data_dir = PathBuf::from(dir);
    }
    if let Some(dir) = var("STATIC_DIR") {
      s.static_dir = PathBuf::from(dir);
    }

    if let Some(cfg) = var("LMS_CONFIG_PATH").and_then(|path| load_lms_config(&path)) {
      s.rules = cfg.rewards;
      if !cfg.quests.is_empty() {
        s.quests = cfg.quests;
      }
    }
    s
  }
}

/// Split COURSE_PATH on `,` or `;`, trimming blanks.
pub fn parse_course_paths(raw: &str) -> Vec<PathBuf> {
  raw.split([',', ';'])
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .map(PathBuf::from)
    .collect()
}

/// Attempt to load `LmsConfig` from a TOML file. On any parsing/IO error, returns None.
pub fn load_lms_config(path: &str) -> Option<LmsConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<LmsConfig>(&s) {
      Ok(cfg) => {
        info!(target: "learnquest", %path, quests = cfg.quests.len(), "Loaded LMS config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "learnquest", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "learnquest", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
