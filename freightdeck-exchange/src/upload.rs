//! Bulk upload plumbing.
//!
//! The uploaded spreadsheet is an opaque binary payload; row validation and
//! the created/updated/failed counts all come back from the server and are
//! rendered verbatim, one line per failed row.

use std::path::Path;

use freightdeck_core::api::ScheduleApi;
use freightdeck_core::schema::{UploadMode, UploadReport};

use crate::ExchangeError;

/// Read a file and send it to the bulk upload endpoint.
pub fn upload_file(
    api: &dyn ScheduleApi,
    path: &Path,
    overwrite: bool,
    mode: UploadMode,
) -> Result<UploadReport, ExchangeError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.xlsx".to_string());
    Ok(api.upload_schedules(&file_name, bytes, overwrite, mode)?)
}

/// Render an upload report for display: summary line, then one line per
/// failed row echoing the row data and the server's error string.
pub fn report_lines(report: &UploadReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} rows: {} created, {} updated, {} failed",
        report.total, report.created, report.updated, report.failed
    )];
    for failure in &report.errors {
        lines.push(format!("  {} — {}", render_row(&failure.row), failure.error));
    }
    lines
}

/// Compact single-line rendering of an echoed row object.
fn render_row(row: &serde_json::Value) -> String {
    match row.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| match v.as_str() {
                Some(s) => format!("{k}={s}"),
                None => format!("{k}={v}"),
            })
            .collect::<Vec<_>>()
            .join(" "),
        None => row.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freightdeck_core::schema::RowFailure;
    use serde_json::json;

    #[test]
    fn report_renders_one_line_per_failure() {
        let report = UploadReport {
            total: 10,
            created: 7,
            updated: 2,
            failed: 1,
            errors: vec![RowFailure {
                row: json!({"voyage": "012E", "etd": "not-a-date"}),
                error: "invalid ETD".into(),
            }],
        };
        let lines = report_lines(&report);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "10 rows: 7 created, 2 updated, 1 failed");
        assert!(lines[1].contains("voyage=012E"));
        assert!(lines[1].contains("invalid ETD"));
    }

    #[test]
    fn clean_report_is_a_single_summary_line() {
        let report = UploadReport {
            total: 3,
            created: 3,
            updated: 0,
            failed: 0,
            errors: vec![],
        };
        assert_eq!(report_lines(&report).len(), 1);
    }

    #[test]
    fn non_object_rows_render_as_json() {
        let report = UploadReport {
            total: 1,
            created: 0,
            updated: 0,
            failed: 1,
            errors: vec![RowFailure {
                row: json!([1, 2, 3]),
                error: "bad shape".into(),
            }],
        };
        let lines = report_lines(&report);
        assert!(lines[1].contains("[1,2,3]"));
    }
}
