//! Markdown Renderer
//!
//! Thin adapter over comrak. The controller only sees the [`Renderer`] trait.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use comrak::adapters::{HeadingAdapter, HeadingMeta};
use comrak::nodes::Sourcepos;
use comrak::{Anchorizer, Plugins};
use serde::Deserialize;

use crate::render::page::escape;

/// Class of the element every preview is wrapped in
pub const WRAPPER_CLASS: &str = "markdown-body";

/// Converts markdown text to HTML
pub trait Renderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String>;
}

/// Rendering switches, loaded from the `[render]` table of a config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Treat single newlines as `<br />`
    pub hard_breaks: bool,
    /// Tables, strikethrough, autolinks and task lists
    pub gfm: bool,
    /// Give headings an `id` attribute
    pub heading_ids: bool,
    /// Prepended to every heading id so it can't clash with page anchors
    pub heading_prefix: String,
    /// Pass inline HTML through instead of stripping it
    pub raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            hard_breaks: true,
            gfm: true,
            heading_ids: true,
            heading_prefix: "markdown-header-".to_string(),
            raw_html: true,
        }
    }
}

/// comrak-backed renderer
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn comrak_options(&self) -> comrak::Options {
        let mut options = comrak::Options::default();

        options.render.hardbreaks = self.options.hard_breaks;
        options.render.unsafe_ = self.options.raw_html;

        if self.options.gfm {
            options.extension.table = true;
            options.extension.strikethrough = true;
            options.extension.autolink = true;
            options.extension.tasklist = true;
        }

        options
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        let options = self.comrak_options();
        if !self.options.heading_ids {
            return Ok(comrak::markdown_to_html(markdown, &options));
        }

        // Fresh per render so duplicate headings are numbered from zero.
        let headings = HeadingIds::new(&self.options.heading_prefix);
        let mut plugins = Plugins::default();
        plugins.render.heading_adapter = Some(&headings);
        Ok(comrak::markdown_to_html_with_plugins(
            markdown, &options, &plugins,
        ))
    }
}

/// Writes `<hN id="{prefix}{slug}">`, with the slug taken from the heading
/// text and de-duplicated within one document
struct HeadingIds {
    prefix: String,
    anchorizer: Mutex<Anchorizer>,
}

impl HeadingIds {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: escape(prefix),
            anchorizer: Mutex::new(Anchorizer::new()),
        }
    }
}

impl HeadingAdapter for HeadingIds {
    fn enter(
        &self,
        output: &mut dyn Write,
        heading: &HeadingMeta,
        _sourcepos: Option<Sourcepos>,
    ) -> io::Result<()> {
        let slug = self
            .anchorizer
            .lock()
            .map_err(|_| io::Error::other("heading anchorizer poisoned"))?
            .anchorize(heading.content.clone());
        write!(
            output,
            "<h{} id=\"{}{}\">",
            heading.level, self.prefix, slug
        )
    }

    fn exit(&self, output: &mut dyn Write, heading: &HeadingMeta) -> io::Result<()> {
        writeln!(output, "</h{}>", heading.level)
    }
}

/// Wrap rendered HTML in the fixed preview container
pub fn wrap(html: &str) -> String {
    format!("<article class=\"{WRAPPER_CLASS}\">{html}</article>")
}
