use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use once_cell::sync::Lazy;
use regex::Regex;

use super::AnalyzerError;

static LOG_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"nginx-access-ui\.log-(\d{8})(\.gz|\.txt)?$").expect("static regex")
});

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(https?://|/)").expect("static regex"));

/// The newest access log found in a log directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub gzipped: bool,
}

impl LogFile {
    pub fn open(&self) -> Result<Box<dyn BufRead>, AnalyzerError> {
        let file = File::open(&self.path).map_err(|e| AnalyzerError::io(&self.path, e))?;
        let reader: Box<dyn Read> = if self.gzipped { Box::new(GzDecoder::new(file)) } else { Box::new(file) };
        Ok(Box::new(BufReader::new(reader)))
    }
}

/// Find the access log with the latest date in its name. Files with other
/// extensions (e.g. `.bz2`) and impossible dates are ignored.
pub fn find_latest_log(dir: &Path) -> Result<Option<LogFile>, AnalyzerError> {
    let entries = std::fs::read_dir(dir).map_err(|e| AnalyzerError::io(dir, e))?;

    let mut latest: Option<LogFile> = None;
    for entry in entries {
        let entry = entry.map_err(|e| AnalyzerError::io(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(caps) = LOG_NAME.captures(&name) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y%m%d") else {
            continue;
        };
        if latest.as_ref().map_or(true, |l| date > l.date) {
            latest = Some(LogFile {
                path: entry.path(),
                date,
                gzipped: caps.get(2).is_some_and(|m| m.as_str() == ".gz"),
            });
        }
    }
    Ok(latest)
}

/// Request times grouped by URL, plus totals over the whole log
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedLog {
    pub timings: HashMap<String, Vec<f64>>,
    pub records: usize,
    pub bad_records: usize,
    pub time_total: f64,
}

impl ParsedLog {
    pub fn error_percent(&self) -> f64 {
        super::report::percentage(self.bad_records as f64, self.records as f64)
    }
}

/// Parse `ui_short` formatted lines: the URL is the 7th whitespace token
/// and the request time is the last one.
pub fn parse_log(reader: impl BufRead) -> Result<ParsedLog, AnalyzerError> {
    let mut parsed = ParsedLog::default();

    for line in reader.split(b'\n') {
        let line = line.map_err(|e| AnalyzerError::Read(e.to_string()))?;
        let line = String::from_utf8_lossy(&line);
        if line.trim().is_empty() {
            continue;
        }
        parsed.records += 1;

        match parse_line(&line) {
            Some((url, time)) => {
                parsed.timings.entry(url.to_string()).or_default().push(time);
                parsed.time_total += time;
            }
            None => parsed.bad_records += 1,
        }
    }

    Ok(parsed)
}

fn parse_line(line: &str) -> Option<(&str, f64)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 7 {
        return None;
    }
    let url = tokens[6];
    if !URL.is_match(url) {
        return None;
    }
    let time = tokens.last()?.parse::<f64>().ok()?;
    Some((url, time))
}
