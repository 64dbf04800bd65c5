//! Preview Page
//!
//! Writes the current preview to disk as a standalone HTML page, so any
//! browser can act as the display surface.

use std::path::{Path, PathBuf};

use crate::core::notice::PreviewSink;

const STYLESHEET: &str = r#"body { margin: 0; background: #f6f8fa; font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; }
.markdown-body { box-sizing: border-box; max-width: 980px; margin: 2rem auto; padding: 2rem 3rem; background: #fff; border: 1px solid #d0d7de; border-radius: 6px; line-height: 1.5; }
.markdown-body pre { background: #f6f8fa; padding: 1rem; overflow: auto; }
.markdown-body table { border-collapse: collapse; }
.markdown-body th, .markdown-body td { border: 1px solid #d0d7de; padding: 6px 13px; }"#;

/// Preview sink that rewrites an HTML file on every update
#[derive(Debug, Clone)]
pub struct HtmlPageSink {
    path: PathBuf,
    title: String,
}

impl HtmlPageSink {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreviewSink for HtmlPageSink {
    fn show(&self, html: &str) {
        let page = render_page(&self.title, html);
        if let Err(e) = std::fs::write(&self.path, page) {
            log::warn!("Failed to write preview page {:?}: {}", self.path, e);
        } else {
            log::debug!("Wrote preview page {:?}", self.path);
        }
    }
}

/// Build a complete HTML page around an already wrapped preview
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n<div id=\"preview\">{}</div>\n</body>\n</html>\n",
        escape(title),
        STYLESHEET,
        body
    )
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
