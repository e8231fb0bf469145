//! Flat JSON file store. One file per entity map, rewritten in full on every save
//! (last write wins). A missing file reads as the type's default.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

pub const CATALOG_FILE: &str = "data.json";
pub const PROGRESS_FILE: &str = "progress.json";
pub const GAMIFICATION_FILE: &str = "gamification.json";
pub const NOTES_FILE: &str = "notes.json";
pub const QUIZZES_FILE: &str = "quizzes.json";
pub const ANALYTICS_FILE: &str = "analytics.json";
pub const QUESTS_FILE: &str = "quests.json";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to read {file}: {source}")]
  Read { file: String, source: std::io::Error },

  #[error("failed to parse {file}: {source}")]
  Parse { file: String, source: serde_json::Error },

  #[error("failed to serialize {file}: {source}")]
  Serialize { file: String, source: serde_json::Error },

  #[error("failed to write {file}: {source}")]
  Write { file: String, source: std::io::Error },
}

#[derive(Clone, Debug)]
pub struct JsonStore {
  dir: PathBuf,
}

impl JsonStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn path_of(&self, file: &str) -> PathBuf {
    self.dir.join(file)
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn load<T>(&self, file: &str) -> Result<T, StoreError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.path_of(file);
    match tokio::fs::read_to_string(&path).await {
      Ok(s) => serde_json::from_str(&s).map_err(|source| StoreError::Parse { file: file.into(), source }),
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(target: "learnquest", %file, "Store file missing; using defaults");
        Ok(T::default())
      }
      Err(source) => Err(StoreError::Read { file: file.into(), source }),
    }
  }

  #[instrument(level = "debug", skip(self, value))]
  pub async fn save<T>(&self, file: &str, value: &T) -> Result<(), StoreError>
  where
    T: Serialize,
  {
    let body = serde_json::to_string_pretty(value)
      .map_err(|source| StoreError::Serialize { file: file.into(), source })?;
    tokio::fs::create_dir_all(&self.dir)
      .await
      .map_err(|source| StoreError::Write { file: file.into(), source })?;
    tokio::fs::write(self.path_of(file), body)
      .await
      .map_err(|source| StoreError::Write { file: file.into(), source })?;
    debug!(target: "learnquest", %file, "Store file written");
    Ok(())
  }
}
