use std::cmp::Ordering;

use serde::Serialize;

use super::parser::ParsedLog;

/// Placeholder in the HTML template replaced by the report rows
pub const TABLE_PLACEHOLDER: &str = "$table_json";

/// Per-URL statistics, rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub url: String,
    pub count: usize,
    pub count_perc: f64,
    pub time_sum: f64,
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

/// `part` as a percentage of `total`; an empty total yields 0
pub fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    part / total * 100.0
}

/// Median of the values, averaging the middle pair for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build one row per URL, slowest total time first
pub fn build_rows(parsed: &ParsedLog) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = parsed
        .timings
        .iter()
        .map(|(url, timings)| {
            let time_sum = round2(timings.iter().sum());
            ReportRow {
                url: url.clone(),
                count: timings.len(),
                count_perc: round2(percentage(timings.len() as f64, parsed.records as f64)),
                time_sum,
                time_perc: round2(percentage(time_sum, parsed.time_total)),
                time_avg: round2(time_sum / timings.len() as f64),
                time_max: round2(timings.iter().copied().fold(f64::MIN, f64::max)),
                time_med: round2(median(timings).unwrap_or_default()),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.time_sum
            .partial_cmp(&a.time_sum)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.url.cmp(&b.url))
    });
    rows
}

/// Substitute the rows into the template as a JSON array
pub fn render(template: &str, rows: &[ReportRow]) -> Result<String, serde_json::Error> {
    let table = serde_json::to_string(rows)?;
    Ok(template.replace(TABLE_PLACEHOLDER, &table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_even_odd_and_empty() {
        assert_eq!(median(&[1.0, 1.0, 2.0, 3.0]), Some(1.5));
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn percentage_of_parts() {
        assert!((percentage(41.0, 100.0) - 41.0).abs() < 1e-9);
        assert!((percentage(22.2, 100.0) - 22.2).abs() < 1e-9);
        assert_eq!(percentage(1.0, 0.0), 0.0);
    }

    #[test]
    fn rows_are_sorted_by_total_time() {
        let mut parsed = ParsedLog { records: 4, time_total: 4.0, ..ParsedLog::default() };
        parsed.timings.insert("/fast".into(), vec![0.5, 0.5]);
        parsed.timings.insert("/slow".into(), vec![3.0]);

        let rows = build_rows(&parsed);
        assert_eq!(rows[0].url, "/slow");
        assert_eq!(rows[0].count_perc, 25.0);
        assert_eq!(rows[0].time_perc, 75.0);
        assert_eq!(rows[1].count, 2);
        assert_eq!(rows[1].time_avg, 0.5);
        assert_eq!(rows[1].time_med, 0.5);
        assert_eq!(rows[1].time_max, 0.5);
    }

    #[test]
    fn render_replaces_placeholder() {
        let rows = vec![ReportRow {
            url: "/a".into(),
            count: 1,
            count_perc: 100.0,
            time_sum: 1.0,
            time_perc: 100.0,
            time_avg: 1.0,
            time_max: 1.0,
            time_med: 1.0,
        }];
        let html = render("<script>var t = $table_json;</script>", &rows).unwrap();
        assert!(html.starts_with(r#"<script>var t = [{"url":"/a","count":1,"#));
        assert!(!html.contains(TABLE_PLACEHOLDER));
    }
}
