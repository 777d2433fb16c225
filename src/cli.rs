use std::path::{Path, PathBuf};

mod export;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use export::Export;
use reqif::{Config, DocumentBundle};
use tracing::debug;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path).map_err(anyhow::Error::msg)?,
            None => Config::default(),
        };
        debug!(?config, "configuration loaded");

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Check documents for semantic problems
    ///
    /// Reports a missing XML declaration, a non UTF-8 encoding, and spec
    /// relations pointing at spec objects that do not exist.
    Validate(Validate),

    /// Rebuild every specification of a document as a nested tree
    Export(Export),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Validate(command) => command.run()?,
            Self::Export(command) => command.run(config)?,
        }
        Ok(())
    }
}

/// Reads a pre-parsed document saved as JSON.
fn load_bundle(path: &Path) -> anyhow::Result<DocumentBundle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file '{}'", path.display()))?;
    let bundle = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse input file '{}'", path.display()))?;
    Ok(bundle)
}
