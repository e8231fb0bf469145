//! Application state: settings, the JSON store, and the catalog helpers.
//!
//! Nothing is cached: every read goes back to the JSON files. Mutating
//! operations take `write_lock` so two requests in this process never
//! interleave a read-modify-write on the same file.

use std::path::PathBuf;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};

use crate::config::Settings;
use crate::domain::{Catalog, ContentKind};
use crate::error::ApiError;
use crate::scanner::scan_course_roots;
use crate::store::{JsonStore, StoreError, CATALOG_FILE};

pub struct AppState {
    pub settings: Settings,
    pub store: JsonStore,
    write_lock: Mutex<()>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let store = JsonStore::new(settings.data_dir.clone());
        info!(
            target: "learnquest",
            data_dir = %settings.data_dir.display(),
            course_paths = settings.course_paths.len(),
            quests = settings.quests.len(),
            "State initialized"
        );
        Self {
            settings,
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Serialize read-modify-write sequences on the store.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Rescan the course roots and rewrite `data.json`.
    #[instrument(level = "info", skip(self))]
    pub async fn refresh_catalog(&self) -> Result<Catalog, ApiError> {
        let roots = self.settings.course_paths.clone();
        let catalog = tokio::task::spawn_blocking(move || scan_course_roots(&roots))
            .await
            .map_err(|e| ApiError::Scan(e.to_string()))?;
        let _guard = self.lock().await;
        self.store.save(CATALOG_FILE, &catalog).await?;
        Ok(catalog)
    }

    pub async fn catalog(&self) -> Result<Catalog, StoreError> {
        self.store.load(CATALOG_FILE).await
    }

    /// Map `/<course title>/<file name>` to a file on disk. Only files present in
    /// the catalog resolve, so request paths can never leave the course folders.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve_media(
        &self,
        course_title: &str,
        file_name: &str,
        kind: ContentKind,
    ) -> Result<PathBuf, ApiError> {
        let catalog = self.catalog().await?;
        let course = catalog
            .course_by_title(course_title)
            .ok_or_else(|| ApiError::NotFound("Course not found".into()))?;
        let (items, missing) = match kind {
            ContentKind::Video => (&course.videos, "Video not found"),
            ContentKind::Pdf => (&course.pdfs, "PDF not found"),
        };
        let item = items
            .iter()
            .find(|i| i.file_path == file_name)
            .ok_or_else(|| ApiError::NotFound(missing.into()))?;

        let path = PathBuf::from(&item.course_path)
            .join(&course.title)
            .join(&item.file_path);
        if !path.is_file() {
            warn!(target: "catalog", path = %path.display(), "Catalog entry missing on disk");
            return Err(ApiError::NotFound(missing.into()));
        }
        Ok(path)
    }
}
