//! Core Preview Logic
//!
//! Document storage and the controller that keeps it in sync with the preview.

pub mod controller;
pub mod document;
pub mod error;
pub mod file;
pub mod notice;

pub use controller::{Phase, SyncController};
pub use document::DocumentStore;
pub use error::PreviewError;
pub use file::{FileHandle, LoadRequest, LocalFile, SourceKind};
pub use notice::{Notice, NoticeLevel, Notifier, PreviewSink};
