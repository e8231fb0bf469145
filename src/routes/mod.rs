//! Router assembly: REST endpoints, course media, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod media;

/// Build the application router with:
/// - REST API under `/api/...` (same paths the dashboard has always used)
/// - video streaming / PDF endpoints under `/api/stream` and `/api/pdf`
/// - Static SPA from the configured static dir with index fallback
/// - CORS (allow any origin/method/headers); this is a single-user local tool
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.settings.static_dir.clone();
    let static_service = ServeDir::new(&static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/health", get(http::http_health))
        // Catalog
        .route("/api/courses", get(http::http_get_courses))
        .route("/api/courses/:id/videos", get(http::http_get_course_videos))
        .route("/api/refresh", post(http::http_post_refresh))
        // Progress
        .route("/api/progress", get(http::http_get_all_progress))
        .route(
            "/api/progress/:video_id",
            get(http::http_get_progress).post(http::http_post_progress),
        )
        // Gamification
        .route(
            "/api/gamification/stats",
            get(http::http_get_stats).post(http::http_post_stats),
        )
        .route(
            "/api/gamification/achievements",
            get(http::http_get_achievements).post(http::http_post_achievements),
        )
        .route("/api/gamification/reset", post(http::http_post_reset))
        .route("/api/gamification/xp", post(http::http_post_xp))
        // Notes
        .route(
            "/api/notes/:video_id",
            get(http::http_get_notes).post(http::http_post_note),
        )
        .route("/api/notes/:video_id/:note_id", delete(http::http_delete_note))
        // Quizzes
        .route(
            "/api/quizzes/:video_id",
            get(http::http_get_quiz).put(http::http_put_quiz),
        )
        .route("/api/quizzes/:video_id/submit", post(http::http_post_quiz_submit))
        // Analytics & quests
        .route("/api/analytics", get(http::http_get_analytics))
        .route("/api/analytics/watch-time", post(http::http_post_watch_time))
        .route("/api/quests", get(http::http_get_quests))
        .route("/api/quests/progress", post(http::http_post_quest_progress))
        // Media
        .route("/api/stream/:course/:filename", get(media::http_stream_video))
        .route("/api/pdf/:course/:filename", get(media::http_get_pdf))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
