use serde::Serialize;
use serde_json::Value;
use tower_lsp::jsonrpc::{self, Result as LspResult};
use tower_lsp::lsp_types::ExecuteCommandParams;

use crate::core::{LocalFile, Phase, SyncController};
use crate::lsp::backend::Backend;
use crate::lsp::protocol::{self, to_path, to_paths, to_text};

/// Reply to every preview command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Whether the command changed anything; absent for plain queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
    pub state: Phase,
    pub source: Option<String>,
    pub rendered: Option<String>,
    pub buffer: Option<String>,
}

impl Snapshot {
    pub fn of(controller: &SyncController, applied: Option<bool>) -> Self {
        Self {
            applied,
            state: controller.phase(),
            source: controller.source().map(str::to_string),
            rendered: controller.rendered().map(str::to_string),
            buffer: controller.buffer().map(str::to_string),
        }
    }
}

/// Trait for handling `workspace/executeCommand`
#[tower_lsp::async_trait]
pub trait HandleExecuteCommand {
    async fn handle_execute_command(&self, params: ExecuteCommandParams)
        -> LspResult<Option<Value>>;
}

#[tower_lsp::async_trait]
impl HandleExecuteCommand for Backend {
    async fn handle_execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<Value>> {
        let args = params.arguments;
        log::debug!("executeCommand {} ({} args)", params.command, args.len());

        // Held across the file read: one transition at a time.
        let mut controller = self.controller.lock().await;

        let applied = match params.command.as_str() {
            protocol::CMD_LOAD => {
                let arg = args
                    .first()
                    .ok_or_else(|| jsonrpc::Error::invalid_params("missing path argument"))?;
                let file = LocalFile::new(to_path(arg)?);
                Some(controller.load_from_file(&file).await.is_ok())
            }
            protocol::CMD_DROP => {
                let files: Vec<LocalFile> =
                    to_paths(&args)?.into_iter().map(LocalFile::new).collect();
                Some(controller.load_from_drop(&files).await.is_ok())
            }
            protocol::CMD_OPEN_EDITOR => Some(controller.open_editor().is_some()),
            protocol::CMD_EDIT => {
                let text = to_text(&args)?
                    .ok_or_else(|| jsonrpc::Error::invalid_params("missing text argument"))?;
                Some(controller.edit(text))
            }
            protocol::CMD_UPDATE => {
                let committed = match to_text(&args)? {
                    Some(text) => controller.commit_text(text),
                    None => controller.commit_edit(),
                };
                Some(committed.unwrap_or(false))
            }
            protocol::CMD_CLOSE_EDITOR => Some(controller.close_editor()),
            protocol::CMD_STATE => None,
            other => {
                return Err(jsonrpc::Error::invalid_params(format!(
                    "unknown command '{}'",
                    other
                )));
            }
        };

        let snapshot = Snapshot::of(&controller, applied);
        serde_json::to_value(snapshot)
            .map(Some)
            .map_err(|_| jsonrpc::Error::internal_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notice::Discard;
    use crate::render::MarkdownRenderer;

    #[test]
    fn test_snapshot_of_empty_controller() {
        let controller = SyncController::new(MarkdownRenderer::default(), Discard, Discard);
        let value = serde_json::to_value(Snapshot::of(&controller, None)).unwrap();

        assert_eq!(value["state"], "empty");
        assert!(value["source"].is_null());
        assert!(value.get("applied").is_none());
    }

    #[test]
    fn test_snapshot_reports_applied() {
        let controller = SyncController::new(MarkdownRenderer::default(), Discard, Discard);
        let value = serde_json::to_value(Snapshot::of(&controller, Some(false))).unwrap();
        assert_eq!(value["applied"], false);
    }
}
