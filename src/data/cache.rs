use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::cleaner;
use super::loader;
use super::model::Dataset;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// DatasetCache – load and clean once, reload only when the file changes
// ---------------------------------------------------------------------------

/// The cleaned dataset for one source file, tagged with the file's
/// modification time at load.
#[derive(Debug, Clone)]
pub struct DatasetCache {
    path: PathBuf,
    modified: Option<SystemTime>,
    dataset: Dataset,
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl DatasetCache {
    /// Run loader and cleaner on `path`.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let modified = modified_time(path);
        let dataset = cleaner::clean(loader::load_csv(path)?);

        log::info!(
            "Loaded {} transactions from {} ({} duplicates dropped, averaging {})",
            dataset.len(),
            path.display(),
            dataset.duplicates_removed(),
            dataset.value_column
        );

        Ok(DatasetCache {
            path: path.to_path_buf(),
            modified,
            dataset,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file's mtime moved, or the file can no longer be stat'ed.
    pub fn is_stale(&self) -> bool {
        match (modified_time(&self.path), self.modified) {
            (Some(now), Some(then)) => now != then,
            _ => true,
        }
    }

    /// Reload if stale. Returns `Ok(true)` when a reload happened. On error
    /// the previously cached dataset is kept.
    pub fn refresh(&mut self) -> Result<bool, DataError> {
        if !self.is_stale() {
            return Ok(false);
        }
        log::debug!("{} changed on disk, reloading", self.path.display());
        *self = DatasetCache::load(&self.path)?;
        Ok(true)
    }
}
