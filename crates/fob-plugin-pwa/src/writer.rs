//! Shared file-write helper used by every emitting phase.

use path_clean::PathClean;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fs::{FsResult, OutputFileSystem};

/// File contents, binary or textual
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    Binary(Vec<u8>),
    Text(String),
}

impl FileContents {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContents::Binary(bytes) => bytes,
            FileContents::Text(text) => text.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<Vec<u8>> for FileContents {
    fn from(bytes: Vec<u8>) -> Self {
        FileContents::Binary(bytes)
    }
}

impl From<String> for FileContents {
    fn from(text: String) -> Self {
        FileContents::Text(text)
    }
}

impl From<&str> for FileContents {
    fn from(text: &str) -> Self {
        FileContents::Text(text.to_string())
    }
}

/// One unit of output: a file placed in a directory
#[derive(Debug, Clone)]
pub struct EmittedFile {
    pub dir: PathBuf,
    pub filename: String,
    pub contents: FileContents,
}

impl EmittedFile {
    pub fn new(
        dir: impl Into<PathBuf>,
        filename: impl Into<String>,
        contents: impl Into<FileContents>,
    ) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
            contents: contents.into(),
        }
    }

    /// Final location of the file
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename).clean()
    }
}

/// Write `file` through `fs`, creating its directory first.
///
/// Errors from either step are returned as-is.
pub async fn write_output(fs: &dyn OutputFileSystem, file: &EmittedFile) -> FsResult<PathBuf> {
    let path = file.path();
    let parent = path.parent().unwrap_or(Path::new("/"));
    fs.mkdirp(parent).await?;
    fs.write_file(&path, file.contents.as_bytes()).await?;
    debug!("wrote {} ({} bytes)", path.display(), file.contents.len());
    Ok(path)
}
