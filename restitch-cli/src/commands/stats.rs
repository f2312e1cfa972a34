use anyhow::Result;
use restitch_core::sink::TracingSink;
use tracing::info;

pub fn execute(input: Option<&str>) -> Result<()> {
    let raw = super::read_input(input)?;

    let sink = TracingSink;
    let (_, stats) = super::ingest(&raw, &sink);

    info!("Ingest finished: {} lines", stats.lines_read);

    println!("\n=== Ingest Statistics ===");
    println!("Lines read:        {}", stats.lines_read);
    println!("Parse rejections:  {}", stats.parse_errors);
    println!("Duplicate ids:     {}", stats.duplicate_ids);
    println!("Pipelines:         {}", stats.pipelines);
    println!("Records grouped:   {}", stats.records);
    println!("Acceptance rate:   {:.2}%", stats.acceptance_rate());

    Ok(())
}
