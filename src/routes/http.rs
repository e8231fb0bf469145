//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  Json,
};
use chrono::Local;
use tracing::{info, instrument};

use crate::domain::{Achievement, Analytics, Course, ContentItem, Note, ProgressMap, QuestBoard, UserStats};
use crate::error::ApiError;
use crate::logic;
use crate::protocol::*;
use crate::quizzes::PublicQuiz;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[instrument(level = "info")]
pub async fn http_health() -> Json<HealthOut> {
  Json(HealthOut { ok: true })
}

// -------- Catalog --------

#[instrument(level = "info", skip(state))]
pub async fn http_get_courses(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Course>> {
  let catalog = state.catalog().await?;
  Ok(Json(catalog.courses))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_course_videos(
  State(state): State<Arc<AppState>>,
  Path(id): Path<u64>,
) -> ApiResult<Vec<ContentItem>> {
  let catalog = state.catalog().await?;
  let course = catalog
    .course(id)
    .ok_or_else(|| ApiError::NotFound("Course not found".into()))?;
  Ok(Json(course.videos.clone()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_refresh(State(state): State<Arc<AppState>>) -> ApiResult<RefreshOut> {
  info!(target: "catalog", "Refreshing course data");
  let catalog = state.refresh_catalog().await?;
  Ok(Json(RefreshOut { success: true, courses: catalog.courses.len() }))
}

// -------- Progress --------

#[instrument(level = "info", skip(state))]
pub async fn http_get_all_progress(State(state): State<Arc<AppState>>) -> ApiResult<ProgressMap> {
  Ok(Json(logic::all_progress(&state).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  Path(video_id): Path<u64>,
) -> ApiResult<VideoProgressOut> {
  Ok(Json(logic::video_progress(&state, video_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(current_time = ?body.current_time, duration = ?body.duration))]
pub async fn http_post_progress(
  State(state): State<Arc<AppState>>,
  Path(video_id): Path<u64>,
  Json(body): Json<ProgressIn>,
) -> ApiResult<ProgressSaved> {
  let out = logic::save_progress(&state, video_id, body, Local::now()).await?;
  if out.rewards.xp_gained > 0 {
    info!(target: "gamification", %video_id, xp = out.rewards.xp_gained, level = out.rewards.level_after, "Progress earned rewards");
  }
  Ok(Json(out))
}

// -------- Gamification --------

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(State(state): State<Arc<AppState>>) -> ApiResult<StatsOut> {
  let stats = logic::current_stats(&state, Local::now().date_naive()).await?;
  Ok(Json(StatsOut { stats, xp_per_level: state.settings.rules.xp_per_level }))
}

#[instrument(level = "info", skip(state, body), fields(total_xp = body.total_xp))]
pub async fn http_post_stats(
  State(state): State<Arc<AppState>>,
  Json(body): Json<UserStats>,
) -> ApiResult<StatsSaved> {
  Ok(Json(logic::replace_stats(&state, body).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_achievements(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Achievement>> {
  Ok(Json(logic::achievements(&state).await?))
}

#[instrument(level = "info", skip(state, body), fields(count = body.len()))]
pub async fn http_post_achievements(
  State(state): State<Arc<AppState>>,
  Json(body): Json<Vec<Achievement>>,
) -> ApiResult<AchievementsSaved> {
  Ok(Json(logic::replace_achievements(&state, body).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset(State(state): State<Arc<AppState>>) -> ApiResult<ResetOut> {
  Ok(Json(logic::reset_gamification(&state).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_xp(
  State(state): State<Arc<AppState>>,
  Json(body): Json<XpIn>,
) -> ApiResult<XpAwarded> {
  Ok(Json(logic::award_xp(&state, body, Local::now()).await?))
}

// -------- Notes --------

#[instrument(level = "info", skip(state))]
pub async fn http_get_notes(
  State(state): State<Arc<AppState>>,
  Path(video_id): Path<u64>,
) -> ApiResult<Vec<Note>> {
  Ok(Json(logic::list_notes(&state, video_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(content_len = body.content.len()))]
pub async fn http_post_note(
  State(state): State<Arc<AppState>>,
  Path(video_id): Path<u64>,
  Json(body): Json<NoteIn>,
) -> ApiResult<Note> {
  Ok(Json(logic::create_note(&state, video_id, body, Local::now()).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_note(
  State(state): State<Arc<AppState>>,
  Path((video_id, note_id)): Path<(u64, u64)>,
) -> ApiResult<SuccessOut> {
  Ok(Json(logic::remove_note(&state, video_id, note_id).await?))
}

// -------- Quizzes --------

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(video_id): Path<u64>,
) -> ApiResult<PublicQuiz> {
  Ok(Json(logic::quiz(&state, video_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(questions = body.questions.len()))]
pub async fn http_put_quiz(
  State(state): State<Arc<AppState>>,
  Path(video_id): Path<u64>,
  Json(body): Json<QuizIn>,
) -> ApiResult<PublicQuiz> {
  Ok(Json(logic::put_quiz(&state, video_id, body).await?))
}

#[instrument(level = "info", skip(state, body), fields(answers = body.answers.len()))]
pub async fn http_post_quiz_submit(
  State(state): State<Arc<AppState>>,
  Path(video_id): Path<u64>,
  Json(body): Json<QuizAnswersIn>,
) -> ApiResult<QuizSubmitted> {
  Ok(Json(logic::submit_quiz(&state, video_id, body, Local::now()).await?))
}

// -------- Analytics & quests --------

#[instrument(level = "info", skip(state))]
pub async fn http_get_analytics(State(state): State<Arc<AppState>>) -> ApiResult<Analytics> {
  Ok(Json(logic::analytics(&state).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_watch_time(
  State(state): State<Arc<AppState>>,
  Json(body): Json<WatchTimeIn>,
) -> ApiResult<WatchTimeRecorded> {
  Ok(Json(logic::record_watch_time(&state, body, Local::now()).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quests(State(state): State<Arc<AppState>>) -> ApiResult<QuestBoard> {
  Ok(Json(logic::current_quests(&state, Local::now().date_naive()).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_quest_progress(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuestProgressIn>,
) -> ApiResult<QuestsUpdated> {
  Ok(Json(logic::advance_quest(&state, body, Local::now()).await?))
}
