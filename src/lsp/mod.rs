//! LSP Protocol Implementation
//!
//! Exposes the preview controller to an editor client over stdio.

pub mod backend;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod sink;

pub use backend::Backend;
