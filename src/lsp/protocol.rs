//! Wire Protocol
//!
//! Command names, the preview notification and argument decoding for the
//! `workspace/executeCommand` surface.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::Url;

pub const CMD_LOAD: &str = "markdownPreview.load";
pub const CMD_DROP: &str = "markdownPreview.drop";
pub const CMD_OPEN_EDITOR: &str = "markdownPreview.openEditor";
pub const CMD_EDIT: &str = "markdownPreview.edit";
pub const CMD_UPDATE: &str = "markdownPreview.update";
pub const CMD_CLOSE_EDITOR: &str = "markdownPreview.closeEditor";
pub const CMD_STATE: &str = "markdownPreview.state";

/// Every command the server advertises
pub const COMMANDS: [&str; 7] = [
    CMD_LOAD,
    CMD_DROP,
    CMD_OPEN_EDITOR,
    CMD_EDIT,
    CMD_UPDATE,
    CMD_CLOSE_EDITOR,
    CMD_STATE,
];

/// Sent to the client whenever the preview changes
pub enum DidRender {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidRenderParams {
    pub html: String,
}

impl Notification for DidRender {
    type Params = DidRenderParams;
    const METHOD: &'static str = "markdownPreview/didRender";
}

/// Turn a `file://` URI or a plain path into a path
pub fn to_path(arg: &Value) -> jsonrpc::Result<PathBuf> {
    let text = arg
        .as_str()
        .ok_or_else(|| jsonrpc::Error::invalid_params("expected a path or file URI string"))?;

    if text.starts_with("file:") {
        let url = Url::parse(text)
            .map_err(|e| jsonrpc::Error::invalid_params(format!("invalid URI '{}': {}", text, e)))?;
        return url
            .to_file_path()
            .map_err(|_| jsonrpc::Error::invalid_params(format!("not a file URI: '{}'", text)));
    }

    Ok(PathBuf::from(text))
}

/// Paths for a drop: either one array argument or one argument per file
pub fn to_paths(args: &[Value]) -> jsonrpc::Result<Vec<PathBuf>> {
    match args {
        [Value::Array(items)] => items.iter().map(to_path).collect(),
        items => items.iter().map(to_path).collect(),
    }
}

/// The first argument as a string
pub fn to_text(args: &[Value]) -> jsonrpc::Result<Option<String>> {
    match args.first() {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(jsonrpc::Error::invalid_params("expected a text argument")),
    }
}
