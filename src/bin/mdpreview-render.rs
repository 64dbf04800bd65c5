//! Render a markdown file through the preview controller and print the
//! wrapped HTML, or write it as a page with `--output`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use markdown_preview_server::config::{self, Config};
use markdown_preview_server::core::notice::{Discard, Fanout};
use markdown_preview_server::core::LocalFile;
use markdown_preview_server::render::{HtmlPageSink, MarkdownRenderer};
use markdown_preview_server::SyncController;

#[derive(Debug, Parser)]
#[command(name = "mdpreview-render")]
#[command(about = "Render one markdown file the way the preview server does")]
struct Cli {
    /// Markdown file to render
    file: PathBuf,

    /// Apply the drop allow-list, as if the file had been dropped
    #[arg(long)]
    dropped: bool,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the preview page to this path instead of printing it
    #[arg(long)]
    output: Option<PathBuf>,

    /// Prefix for heading ids
    #[arg(long)]
    heading_prefix: Option<String>,

    /// Do not turn single newlines into <br>
    #[arg(long)]
    no_hard_breaks: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_args(config::Args {
        config: cli.config,
        output: cli.output,
        heading_prefix: cli.heading_prefix,
        no_hard_breaks: cli.no_hard_breaks,
        log_level: cli.log_level,
    })?;
    markdown_preview_server::init_logging(&config.log_level);

    let mut preview = Fanout::new();
    if let Some(output) = &config.output {
        preview = preview.with(HtmlPageSink::new(output, config.title.clone()));
    }

    let mut controller = SyncController::new(
        MarkdownRenderer::new(config.render.clone()),
        Discard,
        preview,
    );

    let file = LocalFile::new(&cli.file);
    let loaded = if cli.dropped {
        controller.load_from_drop(std::slice::from_ref(&file)).await
    } else {
        controller.load_from_file(&file).await
    };
    loaded.with_context(|| format!("Could not preview {:?}", cli.file))?;

    if config.output.is_none() {
        if let Some(html) = controller.rendered() {
            println!("{}", html);
        }
    }

    Ok(())
}
