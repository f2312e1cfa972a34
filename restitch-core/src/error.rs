//! Error and anomaly taxonomies for restitch operations

use crate::sink::Severity;

/// Reasons a raw log line is rejected by the parser
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Line has no content
    #[error("Line is empty or only whitespace")]
    Empty,

    /// One or both body brackets are absent
    #[error("Missing opening '[' or closing ']' brackets")]
    MissingBrackets,

    /// Brackets are present but in the wrong order
    #[error("Opening '[' appears after closing ']'")]
    BracketOrder,

    /// Wrong number of fields before the bracketed body
    #[error("Expected 3 fields before '[body]', got {0}")]
    FieldsBeforeBody(usize),

    /// Wrong number of fields after the bracketed body
    #[error("Expected 1 field after '[body]', got {0}")]
    FieldsAfterBody(usize),

    /// Encoding field is not an integer at all
    #[error("Encoding '{0}' is not a valid integer")]
    EncodingNotInteger(String),

    /// Encoding field is an integer outside the known codes
    #[error("Encoding must be 0 or 1, got {0}")]
    EncodingOutOfRange(i64),

    /// Body declared as hex but does not parse as hex digits
    #[error("Body '{0}' is not valid hexadecimal for encoding 1")]
    BodyNotHex(String),
}

/// Failures turning an encoded body into printable text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Body is not a valid hex digit string
    #[error("Invalid hexadecimal string in body: '{0}'")]
    InvalidHex(String),

    /// Decoded bytes fall outside the ASCII range
    #[error("Body '{0}' cannot be decoded to ASCII")]
    NotAscii(String),
}

/// Structural anomalies found while grouping or reconstructing a pipeline
///
/// Anomalies are reported to the diagnostic sink, never silently dropped.
/// All of them except [`Anomaly::Orphans`] discard the affected record or
/// pipeline output; none of them aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Anomaly {
    /// A fragment id appeared twice within one pipeline; the first record
    /// is kept, the later one dropped
    #[error("Duplicate message id {id} in pipeline {pipeline_id}")]
    DuplicateId {
        /// Pipeline the collision happened in
        pipeline_id: String,
        /// The colliding fragment id
        id: String,
    },

    /// More than one fragment carries the terminal sentinel
    #[error("Pipeline {pipeline_id} has multiple last messages: {ids:?}")]
    MultipleTerminators {
        /// Affected pipeline
        pipeline_id: String,
        /// Every terminal fragment id found
        ids: Vec<String>,
    },

    /// The chain walk revisited a fragment it had already placed
    #[error("Cycle detected in pipeline {pipeline_id} involving id {id}")]
    Cycle {
        /// Affected pipeline
        pipeline_id: String,
        /// The fragment id the walk came back to
        id: String,
    },

    /// Two or more fragments point at the same successor
    #[error(
        "Branching detected in pipeline {pipeline_id} for next_id {next_id}. \
         Messages pointing to it: {ids:?}"
    )]
    Branch {
        /// Affected pipeline
        pipeline_id: String,
        /// The contested successor id
        next_id: String,
        /// Every fragment id pointing at it
        ids: Vec<String>,
    },

    /// Fragments present in the pipeline but unreachable from the
    /// reconstructed sequence; the sequence itself is still emitted
    #[error("Orphan messages in pipeline {pipeline_id}: {ids:?}")]
    Orphans {
        /// Affected pipeline
        pipeline_id: String,
        /// Unreachable fragment ids, in arrival order
        ids: Vec<String>,
    },
}

impl Anomaly {
    /// Severity at which this anomaly is reported to the sink
    ///
    /// Orphans are a warning; everything else discards output and is an
    /// error.
    pub fn severity(&self) -> Severity {
        match self {
            Anomaly::Orphans { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
