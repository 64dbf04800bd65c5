use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::core::notice::Fanout;
use crate::core::SyncController;
use crate::lsp::handlers::HandleExecuteCommand;
use crate::lsp::protocol::COMMANDS;
use crate::lsp::sink::{relay, ClientSink};
use crate::render::{HtmlPageSink, MarkdownRenderer};
use crate::Config;

/// The LSP backend: owns the preview controller and talks to the client
pub struct Backend {
    pub client: Client,
    pub controller: Arc<Mutex<SyncController>>,
    pub config: Config,
}

impl Backend {
    pub fn new(client: Client, config: Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(relay(client.clone(), rx));

        let sink = ClientSink::new(tx);
        let mut preview = Fanout::new().with(sink.clone());
        if let Some(output) = &config.output {
            log::info!("Writing preview page to {:?}", output);
            preview = preview.with(HtmlPageSink::new(output, config.title.clone()));
        }

        let renderer = MarkdownRenderer::new(config.render.clone());
        let controller = SyncController::new(renderer, sink, preview);

        Self {
            client,
            controller: Arc::new(Mutex::new(controller)),
            config,
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        _: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "mdpreview-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let output = match &self.config.output {
            Some(path) => format!("{:?}", path),
            None => "none".to_string(),
        };
        self.client
            .log_message(
                MessageType::INFO,
                format!(
                    "mdpreview-ls initialized (heading prefix: {:?}, hard breaks: {}, page output: {})",
                    self.config.render.heading_prefix, self.config.render.hard_breaks, output
                ),
            )
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        Ok(())
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> tower_lsp::jsonrpc::Result<Option<Value>> {
        self.handle_execute_command(params).await
    }
}
