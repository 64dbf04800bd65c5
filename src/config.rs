//! Configuration management for the markdown preview server.
//!
//! Handles:
//! - Command-line argument parsing
//! - User and project TOML config files
//!
//! Layers, lowest priority first: built-in defaults, the user config in
//! `<config_dir>/mdpreview/config.toml`, the project `.mdpreview.toml` in the
//! working directory (or `--config`), and finally command-line flags.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::render::RenderOptions;

/// File name of the per-project config
pub const PROJECT_CONFIG_FILE: &str = ".mdpreview.toml";

/// Command-line arguments for the markdown preview server
#[derive(Debug, Default, Parser)]
#[command(name = "mdpreview-ls")]
#[command(about = "Live markdown preview server")]
#[command(version)]
pub struct Args {
    /// Config file to use instead of the project `.mdpreview.toml`
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    /// Also write every preview to this HTML file
    #[arg(long, help = "Write the preview page to this path")]
    pub output: Option<PathBuf>,

    /// Prefix for generated heading ids
    #[arg(long, help = "Prefix for heading ids (default: markdown-header-)")]
    pub heading_prefix: Option<String>,

    /// Render single newlines as soft breaks
    #[arg(long, help = "Do not turn single newlines into <br>")]
    pub no_hard_breaks: bool,

    /// Log level for the preview server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// On-disk config file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub render: Option<RenderTable>,
    pub preview: Option<PreviewTable>,
}

/// `[render]` table; every key is optional so layers can be merged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderTable {
    pub hard_breaks: Option<bool>,
    pub gfm: Option<bool>,
    pub heading_ids: Option<bool>,
    pub heading_prefix: Option<String>,
    pub raw_html: Option<bool>,
}

/// `[preview]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewTable {
    pub output: Option<PathBuf>,
    pub title: Option<String>,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Renderer switches
    pub render: RenderOptions,
    /// Preview page written on every update, if any
    pub output: Option<PathBuf>,
    /// Title of the preview page
    pub title: String,
    /// Project config that was applied
    pub project_config_path: Option<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            output: None,
            title: "Markdown Preview".to_string(),
            project_config_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments and config files
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let mut config = Config::default();

        if let Some(user_path) = user_config_path() {
            if user_path.is_file() {
                config.apply_file(&user_path)?;
            }
        }

        let project_path = args
            .config
            .clone()
            .or_else(|| Some(PathBuf::from(PROJECT_CONFIG_FILE)).filter(|p| p.is_file()));
        if let Some(project_path) = project_path {
            config.apply_file(&project_path)?;
            config.project_config_path = Some(project_path);
        }

        config.apply_args(args);
        Ok(config)
    }

    /// Merge a TOML config file on top of the current values
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let file = parse_config(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        log::debug!("Applying config file {:?}", path);
        self.apply(file);
        Ok(())
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(render) = file.render {
            let options = &mut self.render;
            if let Some(v) = render.hard_breaks {
                options.hard_breaks = v;
            }
            if let Some(v) = render.gfm {
                options.gfm = v;
            }
            if let Some(v) = render.heading_ids {
                options.heading_ids = v;
            }
            if let Some(v) = render.heading_prefix {
                options.heading_prefix = v;
            }
            if let Some(v) = render.raw_html {
                options.raw_html = v;
            }
        }

        if let Some(preview) = file.preview {
            if preview.output.is_some() {
                self.output = preview.output;
            }
            if let Some(title) = preview.title {
                self.title = title;
            }
        }
    }

    fn apply_args(&mut self, args: Args) {
        if let Some(output) = args.output {
            self.output = Some(output);
        }
        if let Some(prefix) = args.heading_prefix {
            self.render.heading_prefix = prefix;
        }
        if args.no_hard_breaks {
            self.render.hard_breaks = false;
        }
        self.log_level = args.log_level;
    }

    /// Whether a project config file was found and applied
    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }
}

/// Parse the contents of a config file
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Location of the user-global config file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mdpreview").join("config.toml"))
}
