use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use shoplytics_core::config::Config;
use shoplytics_pipeline::Dataset;

use crate::error::AppError;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
pub struct AppState {
    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Cleaned datasets keyed by source directory.
    ///
    /// Populated lazily on first use and never invalidated during a server
    /// run; a source changed on disk is picked up after a restart.
    datasets: Arc<RwLock<HashMap<PathBuf, Arc<Dataset>>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            datasets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn data_dir(&self) -> &Path {
        Path::new(&self.config.data_dir)
    }

    /// The dataset under the configured data directory.
    pub async fn dataset(&self) -> Result<Arc<Dataset>, AppError> {
        self.dataset_at(self.data_dir()).await
    }

    /// Return the cleaned dataset for `dir`, loading it on a cache miss.
    ///
    /// Loading is CPU and disk bound, so it runs on the blocking pool.
    pub async fn dataset_at(&self, dir: &Path) -> Result<Arc<Dataset>, AppError> {
        // Fast path: cache hit.
        {
            let cache = self.datasets.read().await;
            if let Some(dataset) = cache.get(dir) {
                debug!(source = %dir.display(), "Dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
        }

        // Slow path: load and clean.
        let owned = dir.to_path_buf();
        let loaded = tokio::task::spawn_blocking(move || Dataset::open(owned))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        info!(source = %dir.display(), "Dataset cached");

        let mut cache = self.datasets.write().await;
        // A concurrent request may have loaded the same source first; keep theirs.
        let entry = cache
            .entry(dir.to_path_buf())
            .or_insert_with(|| Arc::new(loaded));
        Ok(Arc::clone(entry))
    }

    pub async fn cached_sources(&self) -> usize {
        self.datasets.read().await.len()
    }
}
