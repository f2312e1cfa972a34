//! Sequence reconstruction for one pipeline's fragments
//!
//! Given one pipeline's unordered records, this module finds the chain
//! order by following (or reversing) the `next_id` linkage and flags the
//! structural defects that make an ordering impossible.

use crate::error::Anomaly;
use crate::grouper::PipelineGroup;
use crate::sink::DiagnosticSink;
use crate::types::{Encoding, Record};
use std::collections::{HashMap, HashSet};

#[cfg(feature = "logging")]
use tracing::debug;

/// One fragment of a reconstructed sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Fragment id
    pub id: String,

    /// Body encoding, needed by the decode step downstream
    pub encoding: Encoding,

    /// Undecoded body
    pub body: String,
}

impl SequenceEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            encoding: record.encoding,
            body: record.body.clone(),
        }
    }
}

/// The outcome of reconstructing one pipeline
///
/// A pipeline whose walk hit a cycle, a branch, or multiple terminators
/// has an empty `sequence`: the valid prefix already walked is discarded
/// too, so no partial output can leak out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// Fragments in walk order (terminal-first in backward mode,
    /// start-first in forward mode)
    pub sequence: Vec<SequenceEntry>,

    /// Fragment ids present in the group but unreachable from the
    /// sequence, in arrival order
    pub orphans: Vec<String>,

    /// Every anomaly found during the walk
    pub anomalies: Vec<Anomaly>,
}

/// Reconstruction statistics
#[derive(Debug, Clone)]
pub struct ReconstructionStats {
    /// Fragments placed plus fragments orphaned
    pub total_fragments: usize,

    /// Fragments placed in the sequence
    pub sequenced: usize,

    /// Fragments left unreachable
    pub orphans: usize,

    /// Percentage of known fragments that made it into the sequence
    pub coverage: f64,
}

impl Reconstruction {
    /// Get statistics about this reconstruction
    pub fn stats(&self) -> ReconstructionStats {
        let total = self.sequence.len() + self.orphans.len();
        let coverage = if total == 0 {
            0.0
        } else {
            (self.sequence.len() as f64 / total as f64) * 100.0
        };

        ReconstructionStats {
            total_fragments: total,
            sequenced: self.sequence.len(),
            orphans: self.orphans.len(),
            coverage,
        }
    }
}

/// Reconstruct the ordered fragment sequence of one pipeline
///
/// Terminal detection picks the mode:
///
/// - No fragment carries the terminal sentinel: walk **forward** from the
///   first-arrived record, following `next_id`. A pointer to an id the
///   group does not hold ends the walk silently; a pointer back into the
///   walk raises [`Anomaly::Cycle`] and discards the sequence.
/// - Exactly one terminal: walk **backward** from it via a predecessor
///   index. Two predecessors of one fragment raise [`Anomaly::Branch`],
///   a revisited predecessor raises [`Anomaly::Cycle`]; either discards
///   the sequence.
/// - Several terminals: [`Anomaly::MultipleTerminators`], nothing else is
///   attempted for the pipeline.
///
/// Orphans are computed only for a surviving sequence and downgrade to a
/// warning; the sequence is still emitted. Every anomaly is recorded on
/// `sink` and also returned, so reruns over the same group reproduce the
/// identical sequence and anomaly set.
pub fn reconstruct(group: &PipelineGroup, sink: &dyn DiagnosticSink) -> Reconstruction {
    if group.is_empty() {
        return Reconstruction::default();
    }

    let terminals: Vec<&Record> = group.records().filter(|r| r.is_terminal()).collect();

    #[cfg(feature = "logging")]
    debug!(
        "Reconstructing pipeline {}: {} fragments, {} terminal",
        group.pipeline_id(),
        group.len(),
        terminals.len()
    );

    let mut reconstruction = match terminals.as_slice() {
        [] => walk_forward(group),
        [terminal] => walk_backward(group, terminal),
        many => {
            let anomaly = Anomaly::MultipleTerminators {
                pipeline_id: group.pipeline_id().to_string(),
                ids: many.iter().map(|r| r.id.clone()).collect(),
            };
            Reconstruction {
                anomalies: vec![anomaly],
                ..Default::default()
            }
        }
    };

    if !reconstruction.sequence.is_empty() {
        let placed: HashSet<&str> = reconstruction
            .sequence
            .iter()
            .map(|entry| entry.id.as_str())
            .collect();
        let orphans: Vec<String> = group
            .ids()
            .filter(|id| !placed.contains(id))
            .map(str::to_string)
            .collect();

        if !orphans.is_empty() {
            reconstruction.anomalies.push(Anomaly::Orphans {
                pipeline_id: group.pipeline_id().to_string(),
                ids: orphans.clone(),
            });
            reconstruction.orphans = orphans;
        }
    }

    for anomaly in &reconstruction.anomalies {
        sink.record(anomaly.severity(), &anomaly.to_string());
    }

    reconstruction
}

/// Forward walk used when no fragment is marked terminal
///
/// The start fragment is the first-arrived record of the group, so the
/// result is stable across reruns.
fn walk_forward(group: &PipelineGroup) -> Reconstruction {
    let Some(start) = group.records().next() else {
        return Reconstruction::default();
    };

    let mut sequence = vec![SequenceEntry::from_record(start)];
    let mut visited: HashSet<&str> = HashSet::from([start.id.as_str()]);
    let mut current = start;

    loop {
        let next_id = current.next_id.as_str();
        let Some(next) = group.get(next_id) else {
            // Dangling pointer: the chain simply ends here
            break;
        };

        if visited.contains(next_id) {
            return discard(
                group,
                Anomaly::Cycle {
                    pipeline_id: group.pipeline_id().to_string(),
                    id: next_id.to_string(),
                },
            );
        }

        #[cfg(feature = "logging")]
        debug!("Linked fragment {} -> {}", current.id, next.id);

        visited.insert(next_id);
        sequence.push(SequenceEntry::from_record(next));
        current = next;
    }

    Reconstruction {
        sequence,
        ..Default::default()
    }
}

/// Backward walk from the unique terminal fragment
fn walk_backward(group: &PipelineGroup, terminal: &Record) -> Reconstruction {
    // Reverse index next_id -> predecessors, built once so each step is a
    // lookup instead of a scan over the whole group
    let mut predecessors: HashMap<&str, Vec<&Record>> = HashMap::new();
    for record in group.records() {
        predecessors
            .entry(record.next_id.as_str())
            .or_default()
            .push(record);
    }

    let mut sequence = vec![SequenceEntry::from_record(terminal)];
    let mut visited: HashSet<&str> = HashSet::from([terminal.id.as_str()]);
    let mut current = terminal;

    loop {
        let preds = predecessors
            .get(current.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        match preds {
            [] => break,
            [prev] => {
                let prev = *prev;
                if visited.contains(prev.id.as_str()) {
                    return discard(
                        group,
                        Anomaly::Cycle {
                            pipeline_id: group.pipeline_id().to_string(),
                            id: prev.id.clone(),
                        },
                    );
                }

                #[cfg(feature = "logging")]
                debug!("Linked fragment {} <- {}", current.id, prev.id);

                visited.insert(prev.id.as_str());
                sequence.push(SequenceEntry::from_record(prev));
                current = prev;
            }
            many => {
                return discard(
                    group,
                    Anomaly::Branch {
                        pipeline_id: group.pipeline_id().to_string(),
                        next_id: current.id.clone(),
                        ids: many.iter().map(|r| r.id.clone()).collect(),
                    },
                );
            }
        }
    }

    Reconstruction {
        sequence,
        ..Default::default()
    }
}

/// Drop everything walked so far, keeping only the anomaly
fn discard(_group: &PipelineGroup, anomaly: Anomaly) -> Reconstruction {
    #[cfg(feature = "logging")]
    debug!(
        "Discarding pipeline {} output: {}",
        _group.pipeline_id(),
        anomaly
    );

    Reconstruction {
        anomalies: vec![anomaly],
        ..Default::default()
    }
}
