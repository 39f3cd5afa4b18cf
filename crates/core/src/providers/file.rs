use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::traits::BaselineProvider;
use crate::errors::CoreError;
use crate::models::app_state::AppState;
use crate::storage::format::{self, BASELINE_FILE_NAME};

/// Reads the baseline document from disk (native only).
pub struct FileBaselineProvider {
    path: PathBuf,
}

impl FileBaselineProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `transactions.json` under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(BASELINE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BaselineProvider for FileBaselineProvider {
    fn name(&self) -> &str {
        "File"
    }

    async fn fetch_baseline(&self) -> Result<AppState, CoreError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        format::read_document(&json)
    }
}
