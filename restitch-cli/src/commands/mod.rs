//! Command implementations for the restitch binary

pub mod process;
pub mod stats;
pub mod verify;

use anyhow::{Context, Result};
use restitch_core::{
    grouper::{Grouper, RunStats},
    parser::parse_line,
    sink::{DiagnosticSink, Severity},
};
use std::fs;
use std::io::Read;

/// Read the input source into memory ("-" or `None` reads stdin)
fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) if path != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path)),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parse and group every input line, reporting rejections to the sink
///
/// Parse rejections and duplicate ids are recorded with the 1-based line
/// number and the offending line; both drop only the line in question.
fn ingest(raw: &str, sink: &dyn DiagnosticSink) -> (Grouper, RunStats) {
    let mut grouper = Grouper::new();
    let mut stats = RunStats::default();

    for (index, line) in raw.lines().enumerate() {
        let line_number = index + 1;
        stats.lines_read += 1;

        let record = match parse_line(line) {
            Ok(record) => record,
            Err(err) => {
                stats.parse_errors += 1;
                sink.record(
                    Severity::Error,
                    &format!(
                        "Wrong format on the log at line {}: {} - '{}'",
                        line_number,
                        err,
                        line.trim()
                    ),
                );
                continue;
            }
        };

        if let Err(anomaly) = grouper.insert(record) {
            stats.duplicate_ids += 1;
            sink.record(
                Severity::Error,
                &format!("{} at line {} - '{}'", anomaly, line_number, line.trim()),
            );
        }
    }

    stats.pipelines = grouper.len();
    stats.records = grouper.record_count();

    (grouper, stats)
}
