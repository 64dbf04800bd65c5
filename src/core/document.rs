//! Document Store
//!
//! Holds the source text of the open document and its rendered form.

/// The open document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Document {
    source: String,
    rendered: Option<String>,
}

/// Single source of truth for the open document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStore {
    document: Option<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source text. The rendered form is cleared until
    /// [`set_rendered`](Self::set_rendered) is called again.
    pub fn set_source(&mut self, text: impl Into<String>) {
        self.document = Some(Document {
            source: text.into(),
            rendered: None,
        });
    }

    pub fn set_rendered(&mut self, html: impl Into<String>) {
        let document = self.document.get_or_insert_with(Document::default);
        document.rendered = Some(html.into());
    }

    pub fn source(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.source.as_str())
    }

    pub fn rendered(&self) -> Option<&str> {
        self.document.as_ref().and_then(|d| d.rendered.as_deref())
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }
}
