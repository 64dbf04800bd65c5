//! File Input
//!
//! File handles and the transient load requests built from them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::core::error::PreviewError;

/// Name suffixes a dropped file must end with (case-sensitive)
pub const ACCEPTED_SUFFIXES: [&str; 3] = [".md", ".markdown", ".txt"];

/// Something that can be read into memory as text
#[async_trait]
pub trait FileHandle: Send + Sync {
    /// Display name, used for the drop allow-list and in notices
    fn name(&self) -> &str;

    /// Read the whole file as text
    async fn read_text(&self) -> std::io::Result<String>;
}

/// A file on the local file system
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileHandle for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

/// Where a load request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Chosen through the file picker; trusted as-is
    FilePick,
    /// Dropped onto the preview; checked against [`ACCEPTED_SUFFIXES`]
    Drop,
}

/// A file about to be read into the document
#[derive(Debug)]
pub struct LoadRequest<'a, F: FileHandle> {
    file: &'a F,
    kind: SourceKind,
}

impl<'a, F: FileHandle> LoadRequest<'a, F> {
    pub fn pick(file: &'a F) -> Self {
        Self {
            file,
            kind: SourceKind::FilePick,
        }
    }

    /// Build a request from a drop gesture. Only the first file counts.
    pub fn from_drop(files: &'a [F]) -> Result<Self, PreviewError> {
        let file = files.first().ok_or(PreviewError::NothingDropped)?;
        if !is_accepted_name(file.name()) {
            return Err(PreviewError::UnsupportedFileType {
                name: file.name().to_string(),
            });
        }
        Ok(Self {
            file,
            kind: SourceKind::Drop,
        })
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub async fn read(&self) -> Result<String, PreviewError> {
        self.file
            .read_text()
            .await
            .map_err(|source| PreviewError::ReadFailure {
                name: self.name().to_string(),
                source,
            })
    }
}

/// Check a file name against the drop allow-list
pub fn is_accepted_name(name: &str) -> bool {
    ACCEPTED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
