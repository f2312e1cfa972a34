//! Core types for restitch records

use crate::constants::{ENCODING_HEX, ENCODING_RAW, TERMINAL_SENTINEL};
use serde::{Deserialize, Serialize};

/// Body encoding of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// Body is plain text, passed through unchanged
    Raw,
    /// Body is hex digits, decoded to ASCII text
    Hex,
}

impl Encoding {
    /// Parse the integer wire code used in log lines
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            ENCODING_RAW => Some(Encoding::Raw),
            ENCODING_HEX => Some(Encoding::Hex),
            _ => None,
        }
    }

    /// The integer wire code for this encoding
    pub const fn code(&self) -> u8 {
        match self {
            Encoding::Raw => ENCODING_RAW,
            Encoding::Hex => ENCODING_HEX,
        }
    }
}

/// A validated log fragment
///
/// Created once by the parser, immutable thereafter. Within one pipeline,
/// `id` values are unique; the grouper rejects duplicates before records
/// reach the reconstruction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Pipeline this fragment belongs to
    pub pipeline_id: String,

    /// Fragment identifier, unique within its pipeline
    pub id: String,

    /// How the body is encoded
    pub encoding: Encoding,

    /// Message body, verbatim from between the brackets (trimmed)
    pub body: String,

    /// Identifier of the successor fragment, or the `"-1"` sentinel
    pub next_id: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        pipeline_id: impl Into<String>,
        id: impl Into<String>,
        encoding: Encoding,
        body: impl Into<String>,
        next_id: impl Into<String>,
    ) -> Self {
        Self {
            pipeline_id: pipeline_id.into(),
            id: id.into(),
            encoding,
            body: body.into(),
            next_id: next_id.into(),
        }
    }

    /// Check if this fragment ends a chain
    pub fn is_terminal(&self) -> bool {
        self.next_id == TERMINAL_SENTINEL
    }
}
