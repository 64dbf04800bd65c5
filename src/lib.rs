//! Markdown Preview Server
//!
//! Live preview of a single markdown document, driven over the Language
//! Server Protocol.
//!
//! This library provides:
//! - The document store and the controller that keeps it in sync
//! - comrak-based rendering and an HTML page sink
//! - LSP protocol implementation
//! - Configuration management

pub mod config;
pub mod core;
pub mod lsp;
pub mod render;

// Re-exports for clean public API
pub use config::Config;
pub use crate::core::{DocumentStore, PreviewError, SyncController};
pub use render::{MarkdownRenderer, RenderOptions, Renderer};

/// Initialise `env_logger` on stderr. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Logger already initialised: {}", e);
    }
}
