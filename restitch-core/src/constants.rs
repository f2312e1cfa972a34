//! Constants for the restitch record format

/// Sentinel `next_id` value marking a terminal fragment (end of a chain)
pub const TERMINAL_SENTINEL: &str = "-1";

/// Wire code for raw (pass-through) bodies
pub const ENCODING_RAW: u8 = 0;

/// Wire code for hex-encoded bodies
pub const ENCODING_HEX: u8 = 1;

/// Number of whitespace-separated fields expected before the bracketed body
/// (`pipeline_id`, `id`, `encoding`)
pub const FIELDS_BEFORE_BODY: usize = 3;

/// Number of whitespace-separated fields expected after the bracketed body
/// (`next_id`)
pub const FIELDS_AFTER_BODY: usize = 1;
