//! Sync Controller
//!
//! Owns the open document and routes every way of changing it (file pick,
//! drop, editor commit) through the same read, render, store, publish path.
//!
//! ```text
//! Empty --load--> Loaded --open_editor--> Editing
//!                   ^                        |
//!                   +--commit_edit/close-----+
//! ```

use serde::Serialize;

use crate::core::document::DocumentStore;
use crate::core::error::PreviewError;
use crate::core::file::{FileHandle, LoadRequest};
use crate::core::notice::{Notice, Notifier, PreviewSink};
use crate::render::{wrap, Renderer};

/// Controller state without the editor buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Empty,
    Loaded,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Empty,
    Loaded,
    Editing { buffer: String },
}

/// State machine keeping source text, editor buffer and preview consistent
pub struct SyncController {
    store: DocumentStore,
    state: State,
    renderer: Box<dyn Renderer>,
    notifier: Box<dyn Notifier>,
    preview: Box<dyn PreviewSink>,
}

impl SyncController {
    pub fn new(
        renderer: impl Renderer + 'static,
        notifier: impl Notifier + 'static,
        preview: impl PreviewSink + 'static,
    ) -> Self {
        Self {
            store: DocumentStore::new(),
            state: State::Empty,
            renderer: Box::new(renderer),
            notifier: Box::new(notifier),
            preview: Box::new(preview),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn source(&self) -> Option<&str> {
        self.store.source()
    }

    pub fn rendered(&self) -> Option<&str> {
        self.store.rendered()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Empty => Phase::Empty,
            State::Loaded => Phase::Loaded,
            State::Editing { .. } => Phase::Editing,
        }
    }

    /// Editor buffer, present only while editing
    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            State::Editing { buffer } => Some(buffer),
            _ => None,
        }
    }

    /// Load a file chosen through the file picker
    pub async fn load_from_file<F: FileHandle>(&mut self, file: &F) -> Result<(), PreviewError> {
        self.load(LoadRequest::pick(file)).await
    }

    /// Load the first of a set of dropped files. Unsupported or empty drops
    /// are rejected without a notice and leave everything as it was.
    pub async fn load_from_drop<F: FileHandle>(
        &mut self,
        files: &[F],
    ) -> Result<(), PreviewError> {
        let request = match LoadRequest::from_drop(files) {
            Ok(request) => request,
            Err(e) => {
                log::debug!("Ignoring drop: {}", e);
                return Err(e);
            }
        };
        self.load(request).await
    }

    async fn load<F: FileHandle>(&mut self, request: LoadRequest<'_, F>) -> Result<(), PreviewError> {
        let text = request.read().await.map_err(|e| self.report(e))?;
        self.apply(text)?;
        log::info!("Loaded {} ({:?})", request.name(), request.kind());
        Ok(())
    }

    /// Enter the editor with the buffer seeded from the current source.
    /// Returns the buffer, or `None` when there is nothing to edit yet.
    pub fn open_editor(&mut self) -> Option<&str> {
        match self.state {
            State::Empty => {
                log::debug!("Ignoring open_editor: no document loaded");
                return None;
            }
            State::Loaded => {
                let buffer = self.store.source().unwrap_or_default().to_string();
                self.state = State::Editing { buffer };
            }
            State::Editing { .. } => {}
        }
        self.buffer()
    }

    /// Replace the editor buffer. Ignored unless editing.
    pub fn edit(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            State::Editing { buffer } => {
                *buffer = text.into();
                true
            }
            _ => false,
        }
    }

    /// Render and store the editor buffer, then close the editor.
    /// Returns `Ok(false)` when the editor wasn't open.
    pub fn commit_edit(&mut self) -> Result<bool, PreviewError> {
        let text = match &self.state {
            State::Editing { buffer } => buffer.clone(),
            _ => {
                log::debug!("Ignoring commit_edit: editor is not open");
                return Ok(false);
            }
        };
        self.apply(text)?;
        Ok(true)
    }

    /// [`edit`](Self::edit) followed by [`commit_edit`](Self::commit_edit)
    pub fn commit_text(&mut self, text: impl Into<String>) -> Result<bool, PreviewError> {
        if !self.edit(text) {
            log::debug!("Ignoring commit_text: editor is not open");
            return Ok(false);
        }
        self.commit_edit()
    }

    /// Leave the editor, discarding the buffer
    pub fn close_editor(&mut self) -> bool {
        if matches!(self.state, State::Editing { .. }) {
            self.state = State::Loaded;
            true
        } else {
            false
        }
    }

    // Render before touching the store so a failure leaves no partial document.
    fn apply(&mut self, text: String) -> Result<(), PreviewError> {
        let html = self
            .renderer
            .render(&text)
            .map(|html| wrap(&html))
            .map_err(|source| self.report(PreviewError::RenderFailure { source }))?;

        self.store.set_source(text);
        self.store.set_rendered(html);
        self.state = State::Loaded;

        if let Some(html) = self.store.rendered() {
            self.preview.show(html);
        }
        Ok(())
    }

    fn report(&self, err: PreviewError) -> PreviewError {
        if !err.is_silent() {
            log::warn!("{}", err);
            self.notifier.notify(Notice::error(err.to_string()));
        }
        err
    }
}
