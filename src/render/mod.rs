//! Rendering
//!
//! Markdown to HTML conversion and the surfaces that display the result.

pub mod markdown;
pub mod page;

pub use markdown::{wrap, MarkdownRenderer, RenderOptions, Renderer, WRAPPER_CLASS};
pub use page::HtmlPageSink;
