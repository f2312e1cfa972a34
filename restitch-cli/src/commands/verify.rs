use anyhow::{bail, Result};
use colored::*;
use restitch_core::{
    linker::reconstruct,
    sink::{MemorySink, Severity},
};
use tracing::info;

pub fn execute(input: Option<&str>, strict: bool) -> Result<()> {
    let raw = super::read_input(input)?;

    // Collect diagnostics instead of streaming them, so the summary can
    // count what the run produced
    let sink = MemorySink::new();
    let (grouper, stats) = super::ingest(&raw, &sink);

    info!(
        "Verifying {} records across {} pipelines",
        stats.records, stats.pipelines
    );

    let mut sequenced = 0usize;
    let mut discarded = 0usize;
    let mut orphaned = 0usize;

    for (_, group) in grouper.pipelines() {
        let reconstruction = reconstruct(group, &sink);
        if reconstruction.sequence.is_empty() {
            discarded += 1;
        } else {
            sequenced += 1;
            orphaned += reconstruction.stats().orphans;
        }
    }

    for (severity, message) in sink.entries() {
        match severity {
            Severity::Warning => eprintln!("{} {}", "warning:".yellow().bold(), message),
            Severity::Error => eprintln!("{} {}", "error:".red().bold(), message),
        }
    }

    let errors = sink.count(Severity::Error);
    let warnings = sink.count(Severity::Warning);

    println!("\n=== Verification Results ===");
    println!("Lines read:          {}", stats.lines_read);
    println!("Parse rejections:    {}", stats.parse_errors);
    println!("Duplicate ids:       {}", stats.duplicate_ids);
    println!("Pipelines:           {}", stats.pipelines);
    println!("Sequenced pipelines: {}", sequenced.to_string().green());
    if discarded > 0 {
        println!("Discarded pipelines: {}", discarded.to_string().red());
    } else {
        println!("Discarded pipelines: {}", discarded);
    }
    println!("Orphaned fragments:  {}", orphaned);
    println!("Errors:              {}", errors);
    println!("Warnings:            {}", warnings);

    if strict && errors > 0 {
        bail!("{} error-severity anomalies found", errors);
    }

    Ok(())
}
