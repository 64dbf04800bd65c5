//! Client Sinks
//!
//! Bridges the controller's synchronous sinks to the async LSP client. Output
//! is queued on a channel and relayed by one task, so the client sees it in
//! the order it was produced.

use tokio::sync::mpsc;
use tower_lsp::lsp_types::MessageType;
use tower_lsp::Client;

use crate::core::notice::{Notice, NoticeLevel, Notifier, PreviewSink};
use crate::lsp::protocol::{DidRender, DidRenderParams};

/// Output waiting to be sent to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Preview(String),
    Notice(Notice),
}

/// Notifier and preview sink that enqueue for the client
#[derive(Debug, Clone)]
pub struct ClientSink {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ClientSink {
    pub fn new(tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { tx }
    }

    fn send(&self, outbound: Outbound) {
        if self.tx.send(outbound).is_err() {
            log::warn!("Client relay is gone, dropping output");
        }
    }
}

impl Notifier for ClientSink {
    fn notify(&self, notice: Notice) {
        self.send(Outbound::Notice(notice));
    }
}

impl PreviewSink for ClientSink {
    fn show(&self, html: &str) {
        self.send(Outbound::Preview(html.to_string()));
    }
}

/// Relay queued output to the client until every sender is dropped
pub async fn relay(client: Client, mut rx: mpsc::UnboundedReceiver<Outbound>) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Preview(html) => {
                client
                    .send_notification::<DidRender>(DidRenderParams { html })
                    .await;
            }
            Outbound::Notice(notice) => {
                client
                    .show_message(message_type(notice.level), notice.message)
                    .await;
            }
        }
    }
}

fn message_type(level: NoticeLevel) -> MessageType {
    match level {
        NoticeLevel::Error => MessageType::ERROR,
        NoticeLevel::Warning => MessageType::WARNING,
        NoticeLevel::Info => MessageType::INFO,
    }
}
