use anyhow::Result;
use std::thread;
use std::time::Duration;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::Config;

/// Start the preview server on stdio
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;
    crate::init_logging(&config.log_level);

    if let Some(path) = &config.project_config_path {
        log::info!("Using project config {:?}", path);
    }

    // Under the integration tests, exit shortly so the test can read stdout to EOF.
    if std::env::var("MDPREVIEW_LS_TEST_EXIT").as_deref() == Ok("1") {
        thread::spawn(|| {
            thread::sleep(Duration::from_secs(2));
            std::process::exit(0);
        });
    }

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, config.clone())).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
