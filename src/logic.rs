//! Core behaviors behind the HTTP handlers.
//!
//! Each operation takes the write lock, loads the JSON files it touches,
//! applies the pure rules from `gamification`, `quests`, `analytics`, `notes`
//! and `quizzes`, and writes the files back. The clock is passed in so the
//! day-boundary rules can be tested.

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info, instrument};

use crate::config::RewardRules;
use crate::domain::{
  Achievement, Analytics, Catalog, DailyQuest, Gamification, Note, NotesBook, ProgressMap, QuestBoard,
  QuestKind, Quiz, QuizBook, RewardSummary, UserStats, VideoProgress,
};
use crate::error::ApiError;
use crate::gamification::{continue_streak, level_for_xp, refresh_streak, Trigger};
use crate::notes;
use crate::protocol::*;
use crate::quizzes::{validate_questions, PublicQuiz};
use crate::state::AppState;
use crate::store::{
  ANALYTICS_FILE, GAMIFICATION_FILE, NOTES_FILE, PROGRESS_FILE, QUESTS_FILE, QUIZZES_FILE,
};
use crate::util::{sanitize_seconds, timestamp, trunc_for_log};

// -------- Progress --------

pub async fn all_progress(state: &AppState) -> Result<ProgressMap, ApiError> {
  Ok(state.store.load(PROGRESS_FILE).await?)
}

pub async fn video_progress(state: &AppState, video_id: u64) -> Result<VideoProgressOut, ApiError> {
  let progress: ProgressMap = state.store.load(PROGRESS_FILE).await?;
  let p = progress.get(&video_id).cloned().unwrap_or_default();
  Ok(VideoProgressOut::new(video_id, p))
}

/// Store a playback position. When this call is the one that completes the
/// video, run the whole reward chain (stats, streak, XP, analytics, quests,
/// course completion, achievements).
///
/// Every file the chain touches is loaded before anything is written, and
/// `progress.json` is written last: a failed load leaves the video incomplete,
/// so the chain runs again on the next save.
#[instrument(level = "info", skip(state, input, now), fields(%video_id))]
pub async fn save_progress(
  state: &AppState,
  video_id: u64,
  input: ProgressIn,
  now: DateTime<Local>,
) -> Result<ProgressSaved, ApiError> {
  let rules = &state.settings.rules;
  let _guard = state.lock().await;

  let mut progress: ProgressMap = state.store.load(PROGRESS_FILE).await?;
  let previous = progress.get(&video_id).cloned().unwrap_or_default();

  let current_time = sanitize_seconds(input.current_time.unwrap_or(0.0));
  let duration = sanitize_seconds(input.duration.unwrap_or(0.0));
  let watched_enough = duration > 0.0 && current_time / duration > rules.completion_threshold;
  let completed = previous.completed || input.completed.unwrap_or(false) || watched_enough;

  let entry = VideoProgress {
    current_time,
    duration,
    completed,
    last_updated: Some(input.last_updated.unwrap_or_else(|| timestamp(now))),
  };
  progress.insert(video_id, entry.clone());

  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  let mut rewards = RewardSummary::start(&g.stats);
  if completed && !previous.completed {
    let mut chain = CompletionFiles {
      catalog: state.catalog().await?,
      analytics: state.store.load(ANALYTICS_FILE).await?,
      board: load_board(state, now.date_naive()).await?,
    };
    on_video_completed(rules, &mut g, &mut chain, &progress, video_id, now, &mut rewards);
    state.store.save(ANALYTICS_FILE, &chain.analytics).await?;
    state.store.save(QUESTS_FILE, &chain.board).await?;
    state.store.save(GAMIFICATION_FILE, &g).await?;
  }
  rewards.finish(&g.stats);
  state.store.save(PROGRESS_FILE, &progress).await?;

  Ok(ProgressSaved { success: true, progress: entry, rewards })
}

/// Files the completion chain reads besides progress and gamification.
struct CompletionFiles {
  catalog: Catalog,
  analytics: Analytics,
  board: QuestBoard,
}

fn on_video_completed(
  rules: &RewardRules,
  g: &mut Gamification,
  files: &mut CompletionFiles,
  progress: &ProgressMap,
  video_id: u64,
  now: DateTime<Local>,
  rewards: &mut RewardSummary,
) {
  let today = now.date_naive();
  let course = files.catalog.course_of_video(video_id);

  g.stats.total_videos_completed = g.stats.total_videos_completed.saturating_add(1);
  continue_streak(&mut g.stats, today);
  g.stats.last_activity_date = Some(timestamp(now));
  g.award_xp(rules.video_xp, "Video completed", rules, rewards);
  info!(target: "gamification", %video_id, streak = g.stats.current_streak, "Video completed");

  files.analytics.record_completion(course.map(|c| c.id), today);

  let done = files.board.advance_kind(QuestKind::Videos, 1);
  pay_quests(g, done, rules, rewards);

  if let Some(course) = course {
    let all_done = !course.videos.is_empty()
      && course
        .videos
        .iter()
        .all(|v| progress.get(&v.id).map(|p| p.completed).unwrap_or(false));
    if all_done {
      g.stats.total_courses_completed = g.stats.total_courses_completed.saturating_add(1);
      g.award_xp(rules.course_xp, "Course completed", rules, rewards);
      rewards.course_completed = true;
      info!(target: "gamification", course = %course.title, "Course completed");
    }
  }

  g.check_achievements(Trigger::video_completed_at(now), now, rules, rewards);
}

// -------- Gamification --------

/// Stats as of `today`: an expired streak is zeroed and persisted first.
pub async fn current_stats(state: &AppState, today: NaiveDate) -> Result<UserStats, ApiError> {
  let _guard = state.lock().await;
  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  if refresh_streak(&mut g.stats, today) {
    state.store.save(GAMIFICATION_FILE, &g).await?;
  }
  Ok(g.stats)
}

/// Replace stored stats. The level is derived from XP, never taken from the client.
pub async fn replace_stats(state: &AppState, mut stats: UserStats) -> Result<StatsSaved, ApiError> {
  let _guard = state.lock().await;
  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  stats.level = level_for_xp(stats.total_xp, state.settings.rules.xp_per_level);
  stats.longest_streak = stats.longest_streak.max(stats.current_streak);
  g.stats = stats;
  state.store.save(GAMIFICATION_FILE, &g).await?;
  Ok(StatsSaved { success: true, stats: g.stats })
}

pub async fn achievements(state: &AppState) -> Result<Vec<Achievement>, ApiError> {
  let g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  Ok(g.achievements)
}

pub async fn replace_achievements(
  state: &AppState,
  achievements: Vec<Achievement>,
) -> Result<AchievementsSaved, ApiError> {
  let _guard = state.lock().await;
  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  g.achievements = achievements;
  state.store.save(GAMIFICATION_FILE, &g).await?;
  Ok(AchievementsSaved { success: true, achievements: g.achievements })
}

pub async fn reset_gamification(state: &AppState) -> Result<ResetOut, ApiError> {
  let _guard = state.lock().await;
  let g = Gamification::default();
  state.store.save(GAMIFICATION_FILE, &g).await?;
  info!(target: "gamification", "Gamification data reset");
  Ok(ResetOut { success: true, message: "Gamification data reset successfully".into() })
}

#[instrument(level = "info", skip(state, now), fields(amount = input.amount))]
pub async fn award_xp(state: &AppState, input: XpIn, now: DateTime<Local>) -> Result<XpAwarded, ApiError> {
  if input.amount < 0 {
    return Err(ApiError::BadRequest("XP amount must not be negative".into()));
  }
  let rules = &state.settings.rules;
  let _guard = state.lock().await;
  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  let mut rewards = RewardSummary::start(&g.stats);
  let reason = input.reason.as_deref().unwrap_or("Manual award");
  g.award_xp(input.amount as u64, reason, rules, &mut rewards);
  g.check_achievements(Trigger::Other, now, rules, &mut rewards);
  rewards.finish(&g.stats);
  state.store.save(GAMIFICATION_FILE, &g).await?;
  Ok(XpAwarded { success: true, stats: g.stats, rewards })
}

// -------- Quests --------

async fn load_board(state: &AppState, today: NaiveDate) -> Result<QuestBoard, ApiError> {
  let mut board: QuestBoard = state.store.load(QUESTS_FILE).await?;
  board.reset_if_stale(&state.settings.quests, today);
  Ok(board)
}

fn pay_quests(g: &mut Gamification, done: Vec<DailyQuest>, rules: &RewardRules, rewards: &mut RewardSummary) {
  for q in done {
    g.award_xp(q.reward, &q.title, rules, rewards);
    rewards.completed_quests.push(q);
  }
}

/// Today's board, reset (and persisted) on the first read of a new day.
pub async fn current_quests(state: &AppState, today: NaiveDate) -> Result<QuestBoard, ApiError> {
  let _guard = state.lock().await;
  let mut board: QuestBoard = state.store.load(QUESTS_FILE).await?;
  if board.reset_if_stale(&state.settings.quests, today) {
    state.store.save(QUESTS_FILE, &board).await?;
  }
  Ok(board)
}

#[instrument(level = "info", skip(state, now), fields(quest = %input.quest_id))]
pub async fn advance_quest(
  state: &AppState,
  input: QuestProgressIn,
  now: DateTime<Local>,
) -> Result<QuestsUpdated, ApiError> {
  let rules = &state.settings.rules;
  let _guard = state.lock().await;
  let mut board = load_board(state, now.date_naive()).await?;
  let completed_now = board
    .advance(&input.quest_id, input.increment.unwrap_or(1))
    .ok_or_else(|| ApiError::NotFound(format!("Unknown quest: {}", input.quest_id)))?;

  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  let mut rewards = RewardSummary::start(&g.stats);
  if let Some(q) = completed_now {
    pay_quests(&mut g, vec![q], rules, &mut rewards);
    g.check_achievements(Trigger::Other, now, rules, &mut rewards);
    state.store.save(GAMIFICATION_FILE, &g).await?;
  }
  rewards.finish(&g.stats);
  state.store.save(QUESTS_FILE, &board).await?;
  Ok(QuestsUpdated { success: true, quests: board, rewards })
}

// -------- Analytics --------

pub async fn analytics(state: &AppState) -> Result<Analytics, ApiError> {
  Ok(state.store.load(ANALYTICS_FILE).await?)
}

/// Add watched seconds and sync the minutes quests with today's total.
#[instrument(level = "info", skip(state, now), fields(duration = input.duration))]
pub async fn record_watch_time(
  state: &AppState,
  input: WatchTimeIn,
  now: DateTime<Local>,
) -> Result<WatchTimeRecorded, ApiError> {
  if !input.duration.is_finite() || input.duration < 0.0 {
    return Err(ApiError::BadRequest("duration must be a non-negative number of seconds".into()));
  }
  let rules = &state.settings.rules;
  let today = now.date_naive();
  let course_id = match (input.course_id, input.video_id) {
    (Some(id), _) => Some(id),
    (None, Some(vid)) => state.catalog().await?.course_of_video(vid).map(|c| c.id),
    (None, None) => None,
  };

  let _guard = state.lock().await;
  let mut analytics: Analytics = state.store.load(ANALYTICS_FILE).await?;
  let mut board = load_board(state, today).await?;
  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;

  analytics.record_watch_time(input.duration, course_id, today);
  let done = board.sync_kind(QuestKind::Minutes, analytics.minutes_on(today));
  let mut rewards = RewardSummary::start(&g.stats);
  if !done.is_empty() {
    pay_quests(&mut g, done, rules, &mut rewards);
    g.check_achievements(Trigger::Other, now, rules, &mut rewards);
    state.store.save(GAMIFICATION_FILE, &g).await?;
  }
  rewards.finish(&g.stats);
  state.store.save(QUESTS_FILE, &board).await?;
  state.store.save(ANALYTICS_FILE, &analytics).await?;
  Ok(WatchTimeRecorded { success: true, analytics, rewards })
}

// -------- Notes --------

pub async fn list_notes(state: &AppState, video_id: u64) -> Result<Vec<Note>, ApiError> {
  let book: NotesBook = state.store.load(NOTES_FILE).await?;
  Ok(notes::notes_for(&book, video_id))
}

pub async fn create_note(
  state: &AppState,
  video_id: u64,
  input: NoteIn,
  now: DateTime<Local>,
) -> Result<Note, ApiError> {
  let _guard = state.lock().await;
  let mut book: NotesBook = state.store.load(NOTES_FILE).await?;
  let note = notes::add_note(&mut book, video_id, input.timestamp, &input.content, now)
    .ok_or_else(|| ApiError::BadRequest("Note content must not be empty".into()))?;
  state.store.save(NOTES_FILE, &book).await?;
  debug!(target: "learnquest", %video_id, id = note.id, content = %trunc_for_log(&note.content, 40), "Note added");
  Ok(note)
}

pub async fn remove_note(state: &AppState, video_id: u64, note_id: u64) -> Result<SuccessOut, ApiError> {
  let _guard = state.lock().await;
  let mut book: NotesBook = state.store.load(NOTES_FILE).await?;
  if !notes::delete_note(&mut book, video_id, note_id) {
    return Err(ApiError::NotFound("Note not found".into()));
  }
  state.store.save(NOTES_FILE, &book).await?;
  Ok(SuccessOut { success: true })
}

// -------- Quizzes --------

pub async fn quiz(state: &AppState, video_id: u64) -> Result<PublicQuiz, ApiError> {
  let book: QuizBook = state.store.load(QUIZZES_FILE).await?;
  book.get(&video_id)
    .map(Quiz::public_view)
    .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))
}

/// Create or replace a quiz. New questions invalidate the previous best score.
pub async fn put_quiz(state: &AppState, video_id: u64, input: QuizIn) -> Result<PublicQuiz, ApiError> {
  validate_questions(&input.questions).map_err(ApiError::BadRequest)?;
  let _guard = state.lock().await;
  let mut book: QuizBook = state.store.load(QUIZZES_FILE).await?;
  let quiz = Quiz { video_id, questions: input.questions, best_score: None, passed_at: None };
  let view = quiz.public_view();
  book.insert(video_id, quiz);
  state.store.save(QUIZZES_FILE, &book).await?;
  Ok(view)
}

#[instrument(level = "info", skip(state, input, now), fields(%video_id))]
pub async fn submit_quiz(
  state: &AppState,
  video_id: u64,
  input: QuizAnswersIn,
  now: DateTime<Local>,
) -> Result<QuizSubmitted, ApiError> {
  let rules = &state.settings.rules;
  let _guard = state.lock().await;
  let mut book: QuizBook = state.store.load(QUIZZES_FILE).await?;
  let quiz = book
    .get_mut(&video_id)
    .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?;

  let grade = quiz.grade(&input.answers, rules.quiz_pass_score);
  let best_score = quiz.best_score.unwrap_or(0.0).max(grade.score);
  quiz.best_score = Some(best_score);

  let mut g: Gamification = state.store.load(GAMIFICATION_FILE).await?;
  let mut rewards = RewardSummary::start(&g.stats);
  if grade.passed && quiz.passed_at.is_none() {
    quiz.passed_at = Some(timestamp(now));
    g.award_xp(rules.quiz_xp, "Quiz passed", rules, &mut rewards);
    g.check_achievements(Trigger::Other, now, rules, &mut rewards);
    state.store.save(GAMIFICATION_FILE, &g).await?;
  }
  rewards.finish(&g.stats);
  state.store.save(QUIZZES_FILE, &book).await?;
  info!(target: "gamification", %video_id, score = grade.score, passed = grade.passed, "Quiz graded");
  Ok(QuizSubmitted { grade, best_score, rewards })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Question;
  use crate::test_support::{at, scanned_state};

  fn watch(current: f64, duration: f64) -> ProgressIn {
    ProgressIn { current_time: Some(current), duration: Some(duration), ..ProgressIn::default() }
  }

  #[tokio::test]
  async fn partial_watch_is_not_a_completion() {
    let (_tmp, state) = scanned_state().await;
    let out = save_progress(&state, 1001, watch(50.0, 100.0), at(2026, 6, 1, 14)).await.unwrap();
    assert!(!out.progress.completed);
    assert_eq!(out.rewards.xp_gained, 0);
    assert!(out.progress.last_updated.is_some());

    let p = video_progress(&state, 1001).await.unwrap();
    assert_eq!(p.current_time, 50.0);
    let unknown = video_progress(&state, 9).await.unwrap();
    assert!(!unknown.completed && unknown.last_updated.is_none());
  }

  #[tokio::test]
  async fn completion_threshold_is_strictly_above_ninety_percent() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 14);
    let out = save_progress(&state, 1001, watch(90.0, 100.0), now).await.unwrap();
    assert!(!out.progress.completed);

    let out = save_progress(&state, 1001, watch(90.01, 100.0), now).await.unwrap();
    assert!(out.progress.completed);
    assert!(out.rewards.xp_gained > 0);
  }

  #[tokio::test]
  async fn unknown_duration_needs_the_client_flag() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 14);
    let out = save_progress(&state, 1002, watch(50.0, 0.0), now).await.unwrap();
    assert!(!out.progress.completed);
    assert_eq!(out.rewards.xp_gained, 0);

    let flagged = ProgressIn { completed: Some(true), ..watch(50.0, 0.0) };
    let out = save_progress(&state, 1002, flagged, now).await.unwrap();
    assert!(out.progress.completed);
  }

  #[tokio::test]
  async fn unreadable_gamification_leaves_the_video_incomplete() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 14);
    let path = state.store.path_of(GAMIFICATION_FILE);
    std::fs::write(&path, "{ broken").unwrap();

    let err = save_progress(&state, 1001, watch(95.0, 100.0), now).await.unwrap_err();
    assert!(matches!(err, ApiError::Store(_)));
    assert!(!video_progress(&state, 1001).await.unwrap().completed);
    assert_eq!(analytics(&state).await.unwrap(), Analytics::default());

    std::fs::remove_file(&path).unwrap();
    let out = save_progress(&state, 1001, watch(95.0, 100.0), now).await.unwrap();
    assert!(out.progress.completed);
    assert_eq!(out.rewards.xp_gained, 100);
  }

  #[tokio::test]
  async fn xp_near_the_limit_saturates_instead_of_failing() {
    let (_tmp, state) = scanned_state().await;
    let stats = UserStats { total_xp: u64::MAX - 10, ..UserStats::default() };
    let saved = replace_stats(&state, stats).await.unwrap();
    assert_eq!(saved.stats.level, u32::MAX);

    let out = save_progress(&state, 1001, watch(95.0, 100.0), at(2026, 6, 1, 14)).await.unwrap();
    assert!(out.progress.completed);
    let stats = current_stats(&state, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()).await.unwrap();
    assert_eq!(stats.total_xp, u64::MAX);
    assert_eq!(stats.total_videos_completed, 1);

    let huge = replace_stats(&state, UserStats { total_xp: 100 * (1u64 << 32), ..UserStats::default() })
      .await
      .unwrap();
    assert_eq!(huge.stats.level, u32::MAX);
  }

  #[tokio::test]
  async fn first_completion_runs_the_reward_chain() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 14);
    let out = save_progress(&state, 1001, watch(95.0, 100.0), now).await.unwrap();
    assert!(out.progress.completed);

    // 25 video + 25 quest "watch-1" + 50 achievement "first-video"
    assert_eq!(out.rewards.xp_gained, 100);
    assert_eq!((out.rewards.level_before, out.rewards.level_after), (1, 2));
    assert!(out.rewards.leveled_up);
    assert_eq!(out.rewards.completed_quests[0].id, "watch-1");
    assert_eq!(out.rewards.unlocked_achievements[0].id, "first-video");
    assert!(!out.rewards.course_completed);

    let stats = current_stats(&state, now.date_naive()).await.unwrap();
    assert_eq!(stats.total_videos_completed, 1);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.total_xp, 100);

    let a = analytics(&state).await.unwrap();
    assert_eq!(a.daily_stats["2026-06-01"].videos_completed, 1);
    assert_eq!(a.course_stats[&1].videos_completed, 1);

    let board = current_quests(&state, now.date_naive()).await.unwrap();
    let watch3 = board.daily_quests.iter().find(|q| q.id == "watch-3").unwrap();
    assert_eq!(watch3.progress, 1);
  }

  #[tokio::test]
  async fn completion_is_sticky_and_pays_once() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 14);
    save_progress(&state, 1001, watch(95.0, 100.0), now).await.unwrap();
    let again = save_progress(&state, 1001, watch(3.0, 100.0), now).await.unwrap();
    assert!(again.progress.completed);
    assert_eq!(again.progress.current_time, 3.0);
    assert_eq!(again.rewards.xp_gained, 0);
    let stats = current_stats(&state, now.date_naive()).await.unwrap();
    assert_eq!(stats.total_videos_completed, 1);
  }

  #[tokio::test]
  async fn client_flag_and_bad_numbers() {
    let (_tmp, state) = scanned_state().await;
    let input = ProgressIn {
      current_time: Some(f64::NAN),
      duration: Some(-5.0),
      completed: Some(true),
      last_updated: Some("2026-06-01T10:00:00+00:00".into()),
    };
    let out = save_progress(&state, 1002, input, at(2026, 6, 1, 14)).await.unwrap();
    assert_eq!((out.progress.current_time, out.progress.duration), (0.0, 0.0));
    assert!(out.progress.completed);
    assert_eq!(out.progress.last_updated.as_deref(), Some("2026-06-01T10:00:00+00:00"));
  }

  #[tokio::test]
  async fn finishing_every_video_completes_the_course() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 14);
    save_progress(&state, 1001, watch(95.0, 100.0), now).await.unwrap();
    let out = save_progress(&state, 1002, watch(100.0, 100.0), now).await.unwrap();

    assert!(out.rewards.course_completed);
    // 25 video + 100 course + 50 "first-course"
    assert_eq!(out.rewards.xp_gained, 175);
    let ids: Vec<&str> = out.rewards.unlocked_achievements.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["first-course"]);

    let stats = current_stats(&state, now.date_naive()).await.unwrap();
    assert_eq!(stats.total_courses_completed, 1);
    assert_eq!(stats.total_xp, 275);
    assert_eq!(stats.level, 3);
  }

  #[tokio::test]
  async fn late_night_completion_unlocks_night_owl() {
    let (_tmp, state) = scanned_state().await;
    let out = save_progress(&state, 1001, watch(95.0, 100.0), at(2026, 6, 1, 23)).await.unwrap();
    assert!(out.rewards.unlocked_achievements.iter().any(|a| a.id == "night-owl"));
  }

  #[tokio::test]
  async fn streak_grows_daily_and_expires_on_read() {
    let (_tmp, state) = scanned_state().await;
    save_progress(&state, 1001, watch(95.0, 100.0), at(2026, 6, 1, 9)).await.unwrap();
    save_progress(&state, 1002, watch(95.0, 100.0), at(2026, 6, 2, 9)).await.unwrap();
    let stats = current_stats(&state, NaiveDate::from_ymd_opt(2026, 6, 3).unwrap()).await.unwrap();
    assert_eq!((stats.current_streak, stats.longest_streak), (2, 2));

    let stats = current_stats(&state, NaiveDate::from_ymd_opt(2026, 6, 5).unwrap()).await.unwrap();
    assert_eq!((stats.current_streak, stats.longest_streak), (0, 2));
  }

  #[tokio::test]
  async fn replacing_stats_recomputes_level() {
    let (_tmp, state) = scanned_state().await;
    let stats = UserStats { total_xp: 420, level: 99, current_streak: 4, ..UserStats::default() };
    let saved = replace_stats(&state, stats).await.unwrap();
    assert_eq!(saved.stats.level, 5);
    assert_eq!(saved.stats.longest_streak, 4);

    reset_gamification(&state).await.unwrap();
    let stats = current_stats(&state, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()).await.unwrap();
    assert_eq!(stats, UserStats::default());
  }

  #[tokio::test]
  async fn manual_xp_rejects_negative_amounts() {
    let (_tmp, state) = scanned_state().await;
    let err = award_xp(&state, XpIn { amount: -1, reason: None }, at(2026, 6, 1, 12)).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let out = award_xp(&state, XpIn { amount: 400, reason: Some("bonus".into()) }, at(2026, 6, 1, 12))
      .await
      .unwrap();
    // 400 puts us at level 5, which unlocks "level-5" for another 50.
    assert_eq!(out.stats.total_xp, 450);
    assert_eq!(out.rewards.unlocked_achievements[0].id, "level-5");
  }

  #[tokio::test]
  async fn quest_progress_pays_reward_once_and_rejects_unknown_ids() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 12);
    let input = |id: &str, inc| QuestProgressIn { quest_id: id.into(), increment: inc };

    let out = advance_quest(&state, input("watch-3", Some(3)), now).await.unwrap();
    assert_eq!(out.rewards.completed_quests.len(), 1);
    assert_eq!(out.rewards.xp_gained, 75);
    let out = advance_quest(&state, input("watch-3", None), now).await.unwrap();
    assert_eq!(out.rewards.xp_gained, 0);

    let err = advance_quest(&state, input("fly-to-moon", None), now).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let tomorrow = current_quests(&state, NaiveDate::from_ymd_opt(2026, 6, 2).unwrap()).await.unwrap();
    assert!(tomorrow.daily_quests.iter().all(|q| !q.completed));
  }

  #[tokio::test]
  async fn watch_time_feeds_analytics_and_minutes_quest() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 12);
    let input = |d: f64| WatchTimeIn { duration: d, video_id: Some(1002), course_id: None };

    let out = record_watch_time(&state, input(900.0), now).await.unwrap();
    assert_eq!(out.analytics.total_watch_time, 900.0);
    assert_eq!(out.analytics.course_stats[&1].watch_time, 900.0);
    assert!(out.rewards.completed_quests.is_empty());

    let out = record_watch_time(&state, input(930.0), now).await.unwrap();
    assert_eq!(out.rewards.completed_quests[0].id, "study-30");
    assert_eq!(out.rewards.xp_gained, 50);

    let err = record_watch_time(&state, input(f64::INFINITY), now).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
  }

  #[tokio::test]
  async fn notes_crud() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 12);
    let note = create_note(&state, 1001, NoteIn { timestamp: 12.5, content: "borrowck".into() }, now)
      .await
      .unwrap();
    assert_eq!(list_notes(&state, 1001).await.unwrap(), vec![note.clone()]);

    let err = create_note(&state, 1001, NoteIn { timestamp: 0.0, content: " ".into() }, now).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    assert!(remove_note(&state, 1001, note.id).await.unwrap().success);
    assert!(matches!(remove_note(&state, 1001, note.id).await, Err(ApiError::NotFound(_))));
  }

  #[tokio::test]
  async fn quiz_pass_pays_once_and_keeps_best_score() {
    let (_tmp, state) = scanned_state().await;
    let now = at(2026, 6, 1, 12);
    let question = |c| Question { question: "?".into(), options: vec!["a".into(), "b".into()], correct_index: c };
    assert!(matches!(quiz(&state, 1001).await, Err(ApiError::NotFound(_))));

    let bad = QuizIn { questions: vec![Question { correct_index: 5, ..question(0) }] };
    assert!(matches!(put_quiz(&state, 1001, bad).await, Err(ApiError::BadRequest(_))));

    put_quiz(&state, 1001, QuizIn { questions: vec![question(0), question(1)] }).await.unwrap();

    let out = submit_quiz(&state, 1001, QuizAnswersIn { answers: vec![0, 0] }, now).await.unwrap();
    assert!(!out.grade.passed);
    assert_eq!(out.best_score, 0.5);

    let out = submit_quiz(&state, 1001, QuizAnswersIn { answers: vec![0, 1] }, now).await.unwrap();
    assert!(out.grade.passed);
    assert_eq!(out.rewards.xp_gained, 20);

    let out = submit_quiz(&state, 1001, QuizAnswersIn { answers: vec![1, 1] }, now).await.unwrap();
    assert_eq!(out.rewards.xp_gained, 0);
    assert_eq!(out.best_score, 1.0);

    let view = quiz(&state, 1001).await.unwrap();
    assert!(view.passed);
    assert_eq!(view.best_score, Some(1.0));
  }
}
