// analyzer/mod.rs - nginx access-log report generator

pub mod parser;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use parser::{find_latest_log, parse_log, LogFile, ParsedLog};
pub use report::{build_rows, median, percentage, render, ReportRow};

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.html");

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("I/O error on {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to read log: {0}")]
    Read(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Too many unparseable lines: {percent:.2}% exceeds {threshold}%")]
    ThresholdExceeded { percent: f64, threshold: f64 },
}

impl AnalyzerError {
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), reason: err.to_string() }
    }
}

/// Analyzer settings. A config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    #[serde(rename = "REPORT_SIZE")]
    pub report_size: usize,
    #[serde(rename = "REPORT_DIR")]
    pub report_dir: PathBuf,
    #[serde(rename = "LOG_DIR")]
    pub log_dir: PathBuf,
    #[serde(rename = "ERRORS_THRESHOLD_%")]
    pub errors_threshold_percent: f64,
    /// Custom HTML template; the bundled one is used when unset
    #[serde(rename = "REPORT_TEMPLATE")]
    pub report_template: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            report_size: 100,
            report_dir: PathBuf::from("./reports"),
            log_dir: PathBuf::from("./logs"),
            errors_threshold_percent: 10.0,
            report_template: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self, AnalyzerError> {
        let content = fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AnalyzerError> {
        serde_json::from_str(content).map_err(|e| AnalyzerError::Config(e.to_string()))
    }

    fn template(&self) -> Result<String, AnalyzerError> {
        match &self.report_template {
            Some(path) => fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e)),
            None => Ok(DEFAULT_TEMPLATE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    NoLogs,
    AlreadyReported(PathBuf),
    Written { report: PathBuf, rows: usize },
}

pub fn report_name(log: &LogFile) -> String {
    format!("report-{}.html", log.date.format("%Y.%m.%d"))
}

/// Analyze the newest log in `log_dir` and write its report into `report_dir`
pub fn run(config: &AnalyzerConfig) -> Result<AnalyzeOutcome, AnalyzerError> {
    let Some(log) = find_latest_log(&config.log_dir)? else {
        tracing::info!("No logs found in {}", config.log_dir.display());
        return Ok(AnalyzeOutcome::NoLogs);
    };

    let report_path = config.report_dir.join(report_name(&log));
    if report_path.exists() {
        tracing::info!("Report {} already exists", report_path.display());
        return Ok(AnalyzeOutcome::AlreadyReported(report_path));
    }

    tracing::info!("Analyzing {}", log.path.display());
    let parsed = parse_log(log.open()?)?;

    let percent = parsed.error_percent();
    if percent > config.errors_threshold_percent {
        tracing::error!("{:.2}% of {} lines could not be parsed", percent, parsed.records);
        return Err(AnalyzerError::ThresholdExceeded { percent, threshold: config.errors_threshold_percent });
    }

    let mut rows = build_rows(&parsed);
    rows.truncate(config.report_size);

    let html = render(&config.template()?, &rows).map_err(|e| AnalyzerError::Config(e.to_string()))?;
    fs::create_dir_all(&config.report_dir).map_err(|e| AnalyzerError::io(&config.report_dir, e))?;
    fs::write(&report_path, html).map_err(|e| AnalyzerError::io(&report_path, e))?;

    tracing::info!("Report written to {}", report_path.display());
    Ok(AnalyzeOutcome::Written { report: report_path, rows: rows.len() })
}
