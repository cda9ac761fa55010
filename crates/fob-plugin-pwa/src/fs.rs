//! Output filesystem abstraction
//!
//! The plugin never touches the disk directly. Every file it emits goes through
//! an [`OutputFileSystem`] handed over by the host, so a bundler can route the
//! writes into its own output layer and tests can observe them in memory.

use async_trait::async_trait;
use parking_lot::RwLock;
use path_clean::PathClean;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result type for filesystem operations
pub type FsResult<T> = Result<T, FsError>;

/// Errors that can occur while writing output
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Directory creation failed
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blocking task failed to complete
    #[error("Task join error: {0}")]
    Join(String),
}

/// Filesystem the plugin emits into
#[async_trait]
pub trait OutputFileSystem: Send + Sync + std::fmt::Debug {
    /// Create a directory and all of its parents. Succeeds if it already exists.
    async fn mkdirp(&self, path: &Path) -> FsResult<()>;

    /// Write a file, replacing any previous contents
    async fn write_file(&self, path: &Path, content: &[u8]) -> FsResult<()>;
}

/// Disk-backed filesystem
///
/// Blocking `std::fs` calls run on tokio's blocking pool.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputFileSystem for NativeFileSystem {
    async fn mkdirp(&self, path: &Path) -> FsResult<()> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&path).map_err(|source| FsError::CreateDir { path, source })
        })
        .await
        .map_err(|e| FsError::Join(e.to_string()))?
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> FsResult<()> {
        let path = path.to_path_buf();
        let content = content.to_vec();
        tokio::task::spawn_blocking(move || {
            std::fs::write(&path, content).map_err(|source| FsError::Write { path, source })
        })
        .await
        .map_err(|e| FsError::Join(e.to_string()))?
    }
}

/// In-memory filesystem
///
/// Writes into a file whose parent directory was never created fail, the same
/// way they would on disk. Paths registered with [`fail_writes_to`] reject every
/// write.
///
/// [`fail_writes_to`]: MemoryFileSystem::fail_writes_to
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<FxHashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<FxHashSet<PathBuf>>>,
    failing: Arc<RwLock<FxHashSet<PathBuf>>>,
    write_log: Arc<RwLock<Vec<PathBuf>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().clean();
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        self.files.write().insert(path, content.into());
    }

    /// Make every write to `path` fail
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.failing.write().insert(path.as_ref().clean());
    }

    /// Contents of a file, if present
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.read().get(&path.as_ref().clean()).cloned()
    }

    /// Contents of a file as UTF-8, if present
    pub fn get_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.get(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.read().contains_key(&path.as_ref().clean())
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.read().contains(&path.as_ref().clean())
    }

    /// All file paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.read().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Every successful write, in the order it happened
    pub fn write_log(&self) -> Vec<PathBuf> {
        self.write_log.read().clone()
    }

    fn add_dirs(&self, path: &Path) {
        let mut dirs = self.dirs.write();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

#[async_trait]
impl OutputFileSystem for MemoryFileSystem {
    async fn mkdirp(&self, path: &Path) -> FsResult<()> {
        let path = path.clean();
        if self.files.read().contains_key(&path) {
            return Err(FsError::CreateDir {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "a file exists at this path",
                ),
            });
        }
        self.add_dirs(&path);
        Ok(())
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> FsResult<()> {
        let path = path.clean();
        if self.failing.read().contains(&path) {
            return Err(FsError::Write {
                path,
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected write failure"),
            });
        }
        let parent_exists = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.dirs.read().contains(parent),
            _ => true,
        };
        if !parent_exists {
            return Err(FsError::Write {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "parent directory does not exist",
                ),
            });
        }
        self.files.write().insert(path.clone(), content.to_vec());
        self.write_log.write().push(path);
        Ok(())
    }
}
