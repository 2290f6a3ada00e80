use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::analyzer::{self, AnalyzeOutcome, AnalyzerConfig};
use crate::cli::{utils, OutputFormat};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long, help = "JSON config merged over the defaults")]
    pub config: Option<PathBuf>,
}

pub fn handle(args: AnalyzeArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    match analyzer::run(&config)? {
        AnalyzeOutcome::NoLogs => utils::output_success(
            &output_format,
            &format!("No logs found in {}", config.log_dir.display()),
            None,
        ),
        AnalyzeOutcome::AlreadyReported(report) => utils::output_success(
            &output_format,
            &format!("Report {} already exists", report.display()),
            Some(json!({ "report": report })),
        ),
        AnalyzeOutcome::Written { report, rows } => utils::output_success(
            &output_format,
            &format!("Report written to {} ({} urls)", report.display(), rows),
            Some(json!({ "report": report, "rows": rows })),
        ),
    }
}
