//! LearnQuest · local learning dashboard backend
//!
//! - Scans course folders (videos + PDFs) into `data.json`
//! - Axum REST API over flat JSON files: progress, XP/levels/streaks/achievements,
//!   notes, quizzes, analytics, daily quests
//! - Video streaming with HTTP range support, inline PDFs
//! - Static SPA fallback (STATIC_DIR/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 4000)
//!   COURSE_PATH      : course roots, separated by `,` or `;`
//!   DATA_DIR         : where the JSON files live (default ".")
//!   STATIC_DIR       : frontend directory (default "./static")
//!   LMS_CONFIG_PATH  : optional TOML with reward rules and daily quests
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod analytics;
mod config;
mod domain;
mod error;
mod gamification;
mod logic;
mod notes;
mod protocol;
mod quests;
mod quizzes;
mod routes;
mod scanner;
mod seeds;
mod state;
mod store;
mod telemetry;
mod util;

#[cfg(test)]
mod test_support;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Settings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::from_env();
  let port = settings.port;
  let state = Arc::new(AppState::new(settings));

  // Generate data.json on startup; a failed scan still serves the last catalog.
  match state.refresh_catalog().await {
    Ok(catalog) => info!(target: "catalog", courses = catalog.courses.len(), "Startup scan complete"),
    Err(e) => warn!(target: "catalog", error = %e, "Startup scan failed"),
  }

  let app = build_router(state.clone());

  let addr = SocketAddr::from(([0, 0, 0, 0], port));
  let listener = TcpListener::bind(addr).await?;
  info!(
    target: "learnquest",
    %addr,
    course_paths = state.settings.course_paths.len(),
    "LMS API listening"
  );
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "learnquest", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "learnquest", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
}
