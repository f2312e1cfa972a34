//! Integration tests for the complete parse → group → reconstruct → decode flow

use restitch_core::{
    decoder::decode_body,
    grouper::Grouper,
    linker::reconstruct,
    parser::parse_line,
    sink::{DiagnosticSink, MemorySink, Severity},
};

/// Parse every line, report rejections and duplicates to the sink
fn ingest(lines: &[&str], sink: &MemorySink) -> Grouper {
    let mut grouper = Grouper::new();
    for line in lines {
        match parse_line(line) {
            Ok(record) => {
                if let Err(anomaly) = grouper.insert(record) {
                    sink.record(anomaly.severity(), &anomaly.to_string());
                }
            }
            Err(err) => sink.record(Severity::Error, &err.to_string()),
        }
    }
    grouper
}

/// Render surviving sequences the way the reporter does
fn render(grouper: &Grouper, sink: &MemorySink) -> String {
    let mut out = String::new();
    for (pipeline_id, group) in grouper.pipelines() {
        let reconstruction = reconstruct(group, sink);
        if reconstruction.sequence.is_empty() {
            continue;
        }
        out.push_str(&format!("Pipeline {}\n", pipeline_id));
        for entry in &reconstruction.sequence {
            match decode_body(entry.encoding, &entry.body) {
                Ok(body) => out.push_str(&format!("{}| {}\n", entry.id, body)),
                Err(err) => sink.record(Severity::Error, &err.to_string()),
            }
        }
    }
    out
}

#[test]
fn test_backward_chain_end_to_end() {
    let sink = MemorySink::new();
    let grouper = ingest(&["P1 0 0 [a] 1", "P1 1 0 [b] 2", "P1 2 0 [c] -1"], &sink);

    let output = render(&grouper, &sink);

    assert_eq!(output, "Pipeline P1\n2| c\n1| b\n0| a\n");
    assert!(sink.entries().is_empty());
}

#[test]
fn test_mutual_cycle_suppresses_all_output() {
    let sink = MemorySink::new();
    let grouper = ingest(&["P2 4 0 [x] 5", "P2 5 0 [y] 4"], &sink);

    let output = render(&grouper, &sink);

    assert_eq!(output, "");
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, Severity::Error);
    assert!(entries[0].1.contains("Cycle detected in pipeline P2"));
}

#[test]
fn test_malformed_line_does_not_poison_later_lines() {
    let sink = MemorySink::new();
    let grouper = ingest(
        &["P1 0 0 no brackets here 1", "P1 2 0 [fine] -1"],
        &sink,
    );

    let output = render(&grouper, &sink);

    assert_eq!(output, "Pipeline P1\n2| fine\n");
    assert_eq!(sink.count(Severity::Error), 1);
    assert!(sink.entries()[0]
        .1
        .contains("Missing opening '[' or closing ']' brackets"));
}

#[test]
fn test_hex_fragment_decodes_in_place() {
    let sink = MemorySink::new();
    let grouper = ingest(&["P1 0 0 [plain] 1", "P1 1 1 [48656C6C6F] -1"], &sink);

    let output = render(&grouper, &sink);

    assert_eq!(output, "Pipeline P1\n1| Hello\n0| plain\n");
}

#[test]
fn test_undecodable_fragment_is_skipped_not_replaced() {
    // FF is valid hex (passes the parser) but not ASCII text
    let sink = MemorySink::new();
    let grouper = ingest(&["P1 0 0 [plain] 1", "P1 1 1 [FF] -1"], &sink);

    let output = render(&grouper, &sink);

    assert_eq!(output, "Pipeline P1\n0| plain\n");
    let errors: Vec<_> = sink
        .entries()
        .into_iter()
        .filter(|(severity, _)| *severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].1.contains("cannot be decoded to ASCII"));
}

#[test]
fn test_orphans_warned_but_sequence_emitted() {
    let sink = MemorySink::new();
    let grouper = ingest(
        &["P1 0 0 [a] 1", "P1 1 0 [b] -1", "P1 9 0 [stray] 77"],
        &sink,
    );

    let output = render(&grouper, &sink);

    assert_eq!(output, "Pipeline P1\n1| b\n0| a\n");
    assert_eq!(sink.count(Severity::Warning), 1);
    assert!(sink.entries()[0].1.contains("Orphan messages in pipeline P1"));
}

#[test]
fn test_duplicate_id_drops_later_record() {
    let sink = MemorySink::new();
    let grouper = ingest(
        &["P1 0 0 [kept] -1", "P1 0 0 [dropped] 3"],
        &sink,
    );

    let output = render(&grouper, &sink);

    assert_eq!(output, "Pipeline P1\n0| kept\n");
    assert_eq!(sink.count(Severity::Error), 1);
    assert!(sink.entries()[0]
        .1
        .contains("Duplicate message id 0 in pipeline P1"));
}

#[test]
fn test_pipelines_render_in_first_seen_order() {
    let sink = MemorySink::new();
    let grouper = ingest(
        &[
            "Beta 1 0 [b1] -1",
            "Alpha 1 0 [a1] -1",
            "Beta 2 0 [b2] 1",
        ],
        &sink,
    );

    let output = render(&grouper, &sink);

    assert_eq!(
        output,
        "Pipeline Beta\n1| b1\n2| b2\nPipeline Alpha\n1| a1\n"
    );
}

#[test]
fn test_rerun_produces_identical_output_and_diagnostics() {
    let lines = [
        "P1 0 0 [a] 1",
        "P1 1 0 [b] -1",
        "P1 9 0 [stray] 77",
        "P2 4 0 [x] 5",
        "P2 5 0 [y] 4",
    ];

    let sink_a = MemorySink::new();
    let output_a = render(&ingest(&lines, &sink_a), &sink_a);

    let sink_b = MemorySink::new();
    let output_b = render(&ingest(&lines, &sink_b), &sink_b);

    assert_eq!(output_a, output_b);
    assert_eq!(sink_a.entries(), sink_b.entries());
}
