use anyhow::Result;
use markdown_preview_server::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    serve().await
}
