use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use reqif::{ValidationReport, index::DuplicateIdentifier};
use tracing::instrument;

use super::{
    load_bundle,
    terminal::{Colorize, warning_line},
};

#[derive(Debug, Parser)]
#[command(about = "Check documents for semantic problems")]
pub struct Validate {
    /// Pre-parsed documents to check (JSON)
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

/// What was found in one input file.
#[derive(Debug)]
struct FileResult {
    path: PathBuf,
    duplicates: Vec<DuplicateIdentifier>,
    report: ValidationReport,
}

impl FileResult {
    /// Upstream findings plus duplicate identifiers.
    fn schema_issues(&self) -> usize {
        self.report.schema_findings.len() + self.duplicates.len()
    }

    fn semantic_issues(&self) -> usize {
        self.report.semantic_findings.len()
    }
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        // files are checked in parallel, but reported in argument order
        let results: Vec<anyhow::Result<FileResult>> = self
            .inputs
            .par_iter()
            .map(|path| {
                let bundle = load_bundle(path)?;
                Ok(FileResult {
                    path: path.clone(),
                    duplicates: bundle.index().duplicates().to_vec(),
                    report: bundle.validate(),
                })
            })
            .collect();
        let results = results.into_iter().collect::<anyhow::Result<Vec<_>>>()?;

        match self.output {
            OutputFormat::Table => Self::output_table(&results),
            OutputFormat::Json => Self::output_json(&results)?,
            OutputFormat::Summary => Self::output_summary(&results),
        }

        Ok(())
    }

    fn output_table(results: &[FileResult]) {
        let show_paths = results.len() > 1;

        for result in results {
            if show_paths {
                println!("{}", format!("{}:", result.path.display()).dim());
            }

            for finding in &result.report.schema_findings {
                println!("{}", warning_line(finding));
            }
            for duplicate in &result.duplicates {
                println!("{}", warning_line(duplicate));
            }
            for finding in &result.report.semantic_findings {
                println!("{}", warning_line(format_args!("semantic error: {finding}")));
            }

            let summary = format!(
                "Validation complete with 0 errors, {} schema issues found, {} semantic issues found.",
                result.schema_issues(),
                result.semantic_issues()
            );
            if result.schema_issues() + result.semantic_issues() == 0 {
                println!("{}", summary.success());
            } else {
                println!("{}", summary.warning());
            }
        }
    }

    fn output_json(results: &[FileResult]) -> anyhow::Result<()> {
        use serde_json::json;

        let files: Vec<_> = results
            .iter()
            .map(|result| {
                let duplicates: Vec<_> = result.duplicates.iter().map(ToString::to_string).collect();
                let counts: serde_json::Map<_, _> = result
                    .report
                    .counts_by_kind()
                    .into_iter()
                    .map(|(kind, count)| (format!("{kind:?}"), json!(count)))
                    .collect();

                json!({
                    "input": result.path,
                    "status": if result.schema_issues() + result.semantic_issues() == 0 {
                        "clean"
                    } else {
                        "issues_found"
                    },
                    "schema_findings": result.report.schema_findings,
                    "duplicates": duplicates,
                    "semantic_findings": result.report.semantic_findings,
                    "summary": {
                        "schema_issues": result.schema_issues(),
                        "semantic_issues": result.semantic_issues(),
                        "by_kind": counts,
                    }
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&files)?);
        Ok(())
    }

    fn output_summary(results: &[FileResult]) {
        for result in results {
            println!(
                "{}: schema={} semantic={}",
                result.path.display(),
                result.schema_issues(),
                result.semantic_issues()
            );
        }
    }
}
