//! Line parser for the restitch record format

use crate::constants::{FIELDS_AFTER_BODY, FIELDS_BEFORE_BODY};
use crate::error::ParseError;
use crate::types::{Encoding, Record};

/// Parse one raw log line into a [`Record`]
///
/// Expected format:
///
/// ```text
/// <pipeline_id> <fragment_id> <encoding:0|1> [<body>] <next_id>
/// ```
///
/// The body is taken verbatim between the first `[` and the last `]`
/// (then trimmed), so it may itself contain whitespace and brackets.
/// Exactly three whitespace-separated fields must precede the opening
/// bracket and exactly one must follow the closing one. When the encoding
/// is 1 the body must already be valid hexadecimal; decoding happens
/// later, but a non-hex body is rejected up front.
pub fn parse_line(line: &str) -> Result<Record, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let open = line.find('[');
    let close = line.rfind(']');
    let (open, close) = match (open, close) {
        (Some(open), Some(close)) => (open, close),
        _ => return Err(ParseError::MissingBrackets),
    };
    if open >= close {
        return Err(ParseError::BracketOrder);
    }

    let body = line[open + 1..close].trim();
    let before: Vec<&str> = line[..open].split_whitespace().collect();
    let after: Vec<&str> = line[close + 1..].split_whitespace().collect();

    if before.len() != FIELDS_BEFORE_BODY {
        return Err(ParseError::FieldsBeforeBody(before.len()));
    }
    if after.len() != FIELDS_AFTER_BODY {
        return Err(ParseError::FieldsAfterBody(after.len()));
    }

    let code: i64 = before[2]
        .parse()
        .map_err(|_| ParseError::EncodingNotInteger(before[2].to_string()))?;
    let encoding = u8::try_from(code)
        .ok()
        .and_then(Encoding::from_code)
        .ok_or(ParseError::EncodingOutOfRange(code))?;

    if encoding == Encoding::Hex && hex::decode(body).is_err() {
        return Err(ParseError::BodyNotHex(body.to_string()));
    }

    Ok(Record::new(before[0], before[1], encoding, body, after[0]))
}
