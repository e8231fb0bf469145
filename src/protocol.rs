//! Public request/response structs for the HTTP API (serde ready).
//! Field names are camelCase to match what the dashboard sends and reads.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Achievement, Analytics, Question, QuestBoard, RewardSummary, UserStats, VideoProgress,
};
use crate::quizzes::QuizGrade;

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct RefreshOut {
    pub success: bool,
    pub courses: usize,
}

#[derive(Serialize)]
pub struct SuccessOut {
    pub success: bool,
}

//
// Progress
//

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressIn {
    #[serde(default)]
    pub current_time: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgressOut {
    pub video_id: u64,
    pub current_time: f64,
    pub duration: f64,
    pub completed: bool,
    pub last_updated: Option<String>,
}

impl VideoProgressOut {
    pub fn new(video_id: u64, p: VideoProgress) -> Self {
        Self {
            video_id,
            current_time: p.current_time,
            duration: p.duration,
            completed: p.completed,
            last_updated: p.last_updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressSaved {
    pub success: bool,
    pub progress: VideoProgress,
    pub rewards: RewardSummary,
}

//
// Gamification
//

/// Stats plus the XP step, so the client can draw progress within a level.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOut {
    #[serde(flatten)]
    pub stats: UserStats,
    pub xp_per_level: u64,
}

#[derive(Serialize)]
pub struct StatsSaved {
    pub success: bool,
    pub stats: UserStats,
}

#[derive(Serialize)]
pub struct AchievementsSaved {
    pub success: bool,
    pub achievements: Vec<Achievement>,
}

#[derive(Serialize)]
pub struct ResetOut {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct XpIn {
    pub amount: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct XpAwarded {
    pub success: bool,
    pub stats: UserStats,
    pub rewards: RewardSummary,
}

//
// Notes
//

#[derive(Debug, Deserialize)]
pub struct NoteIn {
    #[serde(default)]
    pub timestamp: f64,
    pub content: String,
}

//
// Quizzes
//

#[derive(Debug, Deserialize)]
pub struct QuizIn {
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct QuizAnswersIn {
    pub answers: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct QuizSubmitted {
    #[serde(flatten)]
    pub grade: QuizGrade,
    #[serde(rename = "bestScore")]
    pub best_score: f64,
    pub rewards: RewardSummary,
}

//
// Analytics & quests
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchTimeIn {
    /// Seconds watched since the last report.
    pub duration: f64,
    #[serde(default)]
    pub video_id: Option<u64>,
    #[serde(default)]
    pub course_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct WatchTimeRecorded {
    pub success: bool,
    pub analytics: Analytics,
    pub rewards: RewardSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgressIn {
    pub quest_id: String,
    #[serde(default)]
    pub increment: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct QuestsUpdated {
    pub success: bool,
    pub quests: QuestBoard,
    pub rewards: RewardSummary,
}
