//! Preview Errors
//!
//! Failure kinds a controller transition can end in.

use thiserror::Error;

/// Why a transition did not change the document
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The selected or dropped file could not be read as text
    #[error("failed to read '{name}': {source}")]
    ReadFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A dropped file's name is not on the suffix allow-list
    #[error("unsupported file type: '{name}'")]
    UnsupportedFileType { name: String },

    /// A drop gesture carried no files
    #[error("nothing was dropped")]
    NothingDropped,

    /// The renderer rejected the markdown text
    #[error("failed to render markdown: {source}")]
    RenderFailure {
        #[source]
        source: anyhow::Error,
    },
}

impl PreviewError {
    /// Silent errors are dropped without telling the user
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            PreviewError::UnsupportedFileType { .. } | PreviewError::NothingDropped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_rejections_are_silent() {
        let unsupported = PreviewError::UnsupportedFileType {
            name: "photo.png".to_string(),
        };
        assert!(unsupported.is_silent());
        assert!(PreviewError::NothingDropped.is_silent());
    }

    #[test]
    fn test_read_failure_is_reported() {
        let err = PreviewError::ReadFailure {
            name: "notes.md".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!err.is_silent());
        assert_eq!(err.to_string(), "failed to read 'notes.md': gone");
    }
}
