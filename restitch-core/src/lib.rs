//! # Restitch Core
//!
//! Reassembles fragmented pipeline log records into ordered, decodable
//! message sequences.
//!
//! ## Modules
//!
//! - `constants`: Record format constants
//! - `types`: Core types (Record, Encoding)
//! - `error`: Parse, decode and structural-anomaly taxonomies
//! - `parser`: Raw line tokenizing and validation
//! - `grouper`: Partitioning records by pipeline
//! - `linker`: Sequence reconstruction engine
//! - `decoder`: Body decoding (hex to ASCII)
//! - `sink`: Injected diagnostic sink seam

#![warn(missing_docs)]

pub mod constants;
pub mod decoder;
pub mod error;
pub mod grouper;
pub mod linker;
pub mod parser;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use error::{Anomaly, DecodeError, ParseError};
pub use types::{Encoding, Record};
