use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use reqif::{Config, Reconstructor, Schema};
use tracing::{info, instrument};

use super::{
    load_bundle,
    terminal::{Colorize, warning_line},
};

#[derive(Debug, Parser)]
#[command(about = "Rebuild every specification of a document as a nested tree")]
pub struct Export {
    /// Pre-parsed document to export (JSON)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory the export file is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print the export to standard output
    #[arg(long)]
    stdout: bool,

    /// Do not write the export file
    #[arg(long)]
    no_filesystem: bool,
}

impl Export {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let bundle = load_bundle(&self.input)?;
        let schema = Schema::with_classifier(&bundle, config.heading_rule().clone())?;
        let export = Reconstructor::new(&bundle, &schema).export();
        // failed specifications are reported on stderr so `--stdout` stays valid JSON
        for failure in &export.failures {
            eprintln!("{}", warning_line(failure));
        }
        let json = serde_json::to_string_pretty(&export)?;

        if self.stdout {
            println!("{json}");
        }

        if !self.no_filesystem {
            let stem = self
                .input
                .file_stem()
                .with_context(|| format!("input path '{}' has no file name", self.input.display()))?;
            let path = self
                .output_dir
                .join(format!("{}.json", stem.to_string_lossy()));

            std::fs::create_dir_all(&self.output_dir).with_context(|| {
                format!("failed to create output directory '{}'", self.output_dir.display())
            })?;
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write '{}'", path.display()))?;

            info!(path = %path.display(), documents = export.documents.len(), "export written");
            if !self.stdout {
                println!(
                    "{}",
                    format!(
                        "Exported {} specifications to {}",
                        export.documents.len(),
                        path.display()
                    )
                    .success()
                );
            }
        }

        Ok(())
    }
}
