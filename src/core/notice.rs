//! Output Sinks
//!
//! The controller never talks to a display directly. It publishes rendered
//! previews to a [`PreviewSink`] and user-facing messages to a [`Notifier`].

use std::sync::{Arc, Mutex};

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
    Info,
}

/// A message meant for the user, not the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives notices raised by failed transitions
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Receives the wrapped HTML every time the preview changes
pub trait PreviewSink: Send + Sync {
    fn show(&self, html: &str);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Notifier for Discard {
    fn notify(&self, _notice: Notice) {}
}

impl PreviewSink for Discard {
    fn show(&self, _html: &str) {}
}

/// Forwards every preview to each of its sinks, in order
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn PreviewSink>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl PreviewSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl PreviewSink for Fanout {
    fn show(&self, html: &str) {
        for sink in &self.sinks {
            sink.show(html);
        }
    }
}

/// Keeps everything it receives. Handy for tests and one-shot rendering.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    notices: Arc<Mutex<Vec<Notice>>>,
    previews: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn previews(&self) -> Vec<String> {
        self.previews
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn last_preview(&self) -> Option<String> {
        self.previews().pop()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

impl PreviewSink for Recorder {
    fn show(&self, html: &str) {
        if let Ok(mut previews) = self.previews.lock() {
            previews.push(html.to_string());
        }
    }
}
