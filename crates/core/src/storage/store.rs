use crate::errors::CoreError;

/// Whole-document key/value storage for the local snapshot.
///
/// One document, always read and written in full. There is a single writer
/// and the last write wins.
pub trait SnapshotStore {
    /// The stored document, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, CoreError>;

    /// Overwrite the stored document.
    fn save(&mut self, contents: &str) -> Result<(), CoreError>;

    /// Forget the stored document. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<(), CoreError>;
}

/// A store that lives only as long as the process. Used by tests and by
/// embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    contents: Option<String>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    /// What is currently stored.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<String>, CoreError> {
        Ok(self.contents.clone())
    }

    fn save(&mut self, contents: &str) -> Result<(), CoreError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CoreError> {
        self.contents = None;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSnapshotStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::SnapshotStore;
    use crate::errors::CoreError;
    use crate::storage::format::SNAPSHOT_FILE_NAME;

    /// Snapshot kept as a single JSON file on disk (native only).
    #[derive(Debug, Clone)]
    pub struct FileSnapshotStore {
        path: PathBuf,
    }

    impl FileSnapshotStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// The snapshot file under `dir`.
        pub fn in_dir(dir: impl AsRef<Path>) -> Self {
            Self::new(dir.as_ref().join(SNAPSHOT_FILE_NAME))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl SnapshotStore for FileSnapshotStore {
        fn load(&self) -> Result<Option<String>, CoreError> {
            match std::fs::read_to_string(&self.path) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&mut self, contents: &str) -> Result<(), CoreError> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&self.path, contents)?;
            Ok(())
        }

        fn clear(&mut self) -> Result<(), CoreError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}
