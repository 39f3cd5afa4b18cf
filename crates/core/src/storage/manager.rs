use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::app_state::{AppState, LocalSnapshot};

use super::format;
use super::store::SnapshotStore;

/// High-level storage operations: load/save the local snapshot and
/// export/import whole documents.
pub struct StorageManager;

impl StorageManager {
    /// Read the local snapshot.
    ///
    /// A missing, unreadable or corrupt snapshot is treated as absent so the
    /// app still starts from the baseline.
    pub fn load_snapshot<S: SnapshotStore + ?Sized>(store: &S) -> Option<LocalSnapshot> {
        let contents = match store.load() {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                debug!("no local snapshot stored");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to read local snapshot, using baseline");
                return None;
            }
        };

        match format::read_snapshot(&contents) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "local snapshot is corrupt, using baseline");
                None
            }
        }
    }

    /// Overwrite the local snapshot with the full state.
    pub fn save_snapshot<S: SnapshotStore + ?Sized>(
        store: &mut S,
        state: &AppState,
    ) -> Result<(), CoreError> {
        let json = format::write_document(state)?;
        store.save(&json)
    }

    /// Drop the local snapshot.
    pub fn clear_snapshot<S: SnapshotStore + ?Sized>(store: &mut S) -> Result<(), CoreError> {
        store.clear()
    }

    /// Serialize a state for download/backup.
    ///
    /// Re-importing the result with [`Self::import_from_json`] reproduces the
    /// same state and therefore the same valuations.
    pub fn export_to_json(state: &AppState) -> Result<String, CoreError> {
        format::write_document(state)
    }

    /// Parse an exported or hand-written document in either accepted shape.
    pub fn import_from_json(json: &str) -> Result<AppState, CoreError> {
        format::read_document(json)
    }

    /// Write an export to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_to_file(state: &AppState, path: &str) -> Result<(), CoreError> {
        let json = Self::export_to_json(state)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a document from a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn import_from_file(path: &str) -> Result<AppState, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::import_from_json(&json)
    }
}
