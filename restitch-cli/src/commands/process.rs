use anyhow::{Context, Result};
use restitch_core::{
    decoder::decode_body,
    grouper::RunStats,
    linker::reconstruct,
    sink::{DiagnosticSink, Severity, TracingSink},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use tracing::info;

#[derive(Serialize, Deserialize)]
struct FragmentJson {
    id: String,
    body: String,
}

#[derive(Serialize, Deserialize)]
struct PipelineJson {
    pipeline_id: String,
    fragments: Vec<FragmentJson>,
    orphans: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct StatsJson {
    lines_read: usize,
    parse_errors: usize,
    duplicate_ids: usize,
    pipelines: usize,
    records: usize,
    acceptance_rate: f64,
}

impl From<&RunStats> for StatsJson {
    fn from(stats: &RunStats) -> Self {
        Self {
            lines_read: stats.lines_read,
            parse_errors: stats.parse_errors,
            duplicate_ids: stats.duplicate_ids,
            pipelines: stats.pipelines,
            records: stats.records,
            acceptance_rate: stats.acceptance_rate(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ProcessOutput {
    pipelines: Vec<PipelineJson>,
    stats: StatsJson,
}

pub fn execute(input: Option<&str>, output: &str, json: bool, include_orphans: bool) -> Result<()> {
    let raw = super::read_input(input)?;

    let sink = TracingSink;
    let (grouper, stats) = super::ingest(&raw, &sink);

    info!(
        "Grouped {} records into {} pipelines",
        stats.records, stats.pipelines
    );

    let mut rendered = String::new();
    let mut pipelines_json: Vec<PipelineJson> = Vec::new();

    for (pipeline_id, group) in grouper.pipelines() {
        let reconstruction = reconstruct(group, &sink);

        // A discarded pipeline produces no rows at all
        if reconstruction.sequence.is_empty() {
            continue;
        }

        if json {
            let fragments = reconstruction
                .sequence
                .iter()
                .filter_map(|entry| match decode_body(entry.encoding, &entry.body) {
                    Ok(body) => Some(FragmentJson {
                        id: entry.id.clone(),
                        body,
                    }),
                    Err(err) => {
                        sink.record(Severity::Error, &err.to_string());
                        None
                    }
                })
                .collect();

            pipelines_json.push(PipelineJson {
                pipeline_id: pipeline_id.to_string(),
                fragments,
                orphans: if include_orphans {
                    reconstruction.orphans.clone()
                } else {
                    Vec::new()
                },
            });
        } else {
            rendered.push_str(&format!("Pipeline {}\n", pipeline_id));
            for entry in &reconstruction.sequence {
                match decode_body(entry.encoding, &entry.body) {
                    // A fragment that fails to decode is skipped, not
                    // replaced with a placeholder
                    Ok(body) => rendered.push_str(&format!("{}| {}\n", entry.id, body)),
                    Err(err) => sink.record(Severity::Error, &err.to_string()),
                }
            }
        }
    }

    let text = if json {
        let output_obj = ProcessOutput {
            pipelines: pipelines_json,
            stats: StatsJson::from(&stats),
        };
        let mut text = serde_json::to_string_pretty(&output_obj)?;
        text.push('\n');
        text
    } else {
        rendered
    };

    if output == "-" {
        io::stdout().write_all(text.as_bytes())?;
    } else {
        fs::write(output, &text)
            .with_context(|| format!("Failed to write output file: {}", output))?;
        info!("Sequences written to: {}", output);
    }

    Ok(())
}
