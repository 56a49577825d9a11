use crate::domain::model::{FailureRow, RunSummary};
use crate::domain::ports::Storage;
use crate::utils::error::{DeleteError, Result};
use std::io::Write;

pub const DEFAULT_REPORT_FILE: &str = "failed_deletions.csv";

/// Serializes failures as `user_id,status_code,error`; a transport failure
/// leaves `status_code` empty.
pub fn failure_report_csv(summary: &RunSummary) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if summary.failures.is_empty() {
        writer.write_record(["user_id", "status_code", "error"])?;
    }
    for failure in &summary.failures {
        writer.serialize(FailureRow::from(failure))?;
    }
    writer
        .into_inner()
        .map_err(|e| DeleteError::Io(e.into_error()))
}

pub struct Reporter<'a, S: Storage> {
    storage: &'a S,
    report_file: &'a str,
}

impl<'a, S: Storage> Reporter<'a, S> {
    pub fn new(storage: &'a S, report_file: &'a str) -> Self {
        Self {
            storage,
            report_file,
        }
    }

    /// Writes the failure report when there is something to report.
    pub async fn save(&self, summary: &RunSummary) -> Result<Option<String>> {
        if !summary.has_failures() {
            tracing::debug!("No failures, skipping {}", self.report_file);
            return Ok(None);
        }

        let data = failure_report_csv(summary)?;
        let path = self.storage.write_file(self.report_file, &data).await?;
        tracing::info!("📄 Failed users report saved to: {}", path);
        Ok(Some(path))
    }
}

/// Renders the summary line and, when present, the failure table.
pub fn render_summary<W: Write>(summary: &RunSummary, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "✅ {}", summary.success_message())?;

    if !summary.has_failures() {
        return Ok(());
    }

    writeln!(out, "❌ Failed to delete some users:")?;

    let rows: Vec<[String; 3]> = summary
        .failures
        .iter()
        .map(|f| {
            [
                f.user_id.clone(),
                f.status_code.map(|s| s.to_string()).unwrap_or_default(),
                single_line(f.error.as_deref().unwrap_or_default()),
            ]
        })
        .collect();

    let header = ["user_id", "status_code", "error"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &header.map(String::from), &widths)?;
    write_row(out, &widths.map(|w| "-".repeat(w)), &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String; 3], widths: &[usize; 3]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<w0$}  {:<w1$}  {}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1]
    )
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DeletionOutcome;
    use chrono::Utc;

    fn summary(outcomes: Vec<DeletionOutcome>) -> RunSummary {
        let now = Utc::now();
        RunSummary::from_outcomes(outcomes, now, now)
    }

    #[test]
    fn test_report_columns() {
        let summary = summary(vec![
            DeletionOutcome::deleted("A"),
            DeletionOutcome::rejected("B", 500, "server error"),
            DeletionOutcome::unreachable("C", "connection refused"),
        ]);

        let csv = String::from_utf8(failure_report_csv(&summary).unwrap()).unwrap();
        assert_eq!(
            csv,
            "user_id,status_code,error\nB,500,server error\nC,,connection refused\n"
        );
    }

    #[test]
    fn test_report_quotes_multiline_bodies() {
        let summary = summary(vec![DeletionOutcome::rejected(
            "B",
            400,
            "{\"detail\": \"bad, request\"}\n",
        )]);

        let data = failure_report_csv(&summary).unwrap();
        let mut reader = csv::Reader::from_reader(data.as_slice());
        let rows: Vec<FailureRow> = reader.deserialize().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].error.as_deref(), Some("{\"detail\": \"bad, request\"}\n"));
    }

    #[test]
    fn test_render_without_failures() {
        let summary = summary(vec![DeletionOutcome::deleted("A"), DeletionOutcome::deleted("B")]);

        let mut out = Vec::new();
        render_summary(&summary, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "✅ Successfully deleted 2 out of 2 users\n");
    }

    #[test]
    fn test_render_failure_table() {
        let summary = summary(vec![
            DeletionOutcome::deleted("A"),
            DeletionOutcome::rejected("B", 500, "server\nerror"),
        ]);

        let mut out = Vec::new();
        render_summary(&summary, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "✅ Successfully deleted 1 out of 2 users");
        assert_eq!(lines[1], "❌ Failed to delete some users:");
        assert!(lines[2].starts_with("user_id"));
        assert_eq!(lines[4], "B        500          server error");
    }
}
