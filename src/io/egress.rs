//! Report egress - writes the analytics report to stdout or a file
//!
//! Reports are pretty-printed JSON. Logs go to stderr so stdout carries only
//! the report.

use crate::domain::report::AnalyticsReport;
use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Render a report as pretty JSON
pub fn render_report(report: &AnalyticsReport) -> anyhow::Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Write a rendered report to any writer, newline terminated
pub fn write_report<W: Write>(mut out: W, report: &AnalyticsReport) -> anyhow::Result<()> {
    let json = render_report(report)?;
    writeln!(out, "{}", json).context("Failed to write report")?;
    out.flush().context("Failed to flush report")?;
    Ok(())
}

/// Print a report to stdout
pub fn print_report(report: &AnalyticsReport) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    write_report(stdout.lock(), report)
}

/// Write a report to `path`, creating parent directories as needed
pub fn write_report_file(path: &str, report: &AnalyticsReport) -> anyhow::Result<()> {
    let file_path = Path::new(path);

    // Create parent directories if they don't exist
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let file = std::fs::File::create(file_path)
        .with_context(|| format!("Failed to create report file {path}"))?;
    write_report(file, report)?;

    debug!(file = %path, "report_file_written");
    info!(
        file = %path,
        gates = %report.gate_visitors.len(),
        dwell_records = %report.time_at_venues.len(),
        "report_egressed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::DwellRecord;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    fn sample_report() -> AnalyticsReport {
        AnalyticsReport {
            named_venue_visitors: Some(1),
            gate_visitors: BTreeMap::from([("Gate 1".to_string(), 1)]),
            time_at_venues: vec![DwellRecord::new("Ducati", "u1", 300.0)],
        }
    }

    #[test]
    fn test_write_report_to_buffer() {
        let mut buf = Vec::new();
        write_report(&mut buf, &sample_report()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["ducatiVisitorsCount"], 1);
        assert_eq!(parsed["timeAtVenues"][0]["secondsAtVenue"], 300.0);
    }

    #[test]
    fn test_write_report_file_creates_dirs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nested").join("report.json");
        let file_str = file_path.to_str().unwrap();

        write_report_file(file_str, &sample_report()).unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["gateVisitors"]["Gate 1"], 1);
    }
}
