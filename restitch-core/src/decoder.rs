//! Body decoding (hex to ASCII text)

use crate::error::DecodeError;
use crate::types::Encoding;

/// Decode a fragment body according to its encoding
///
/// Raw bodies pass through unchanged. Hex bodies are decoded to bytes,
/// every byte of which must fall in the ASCII range. Pure function: no
/// logging, no state; callers decide how to report failures.
pub fn decode_body(encoding: Encoding, body: &str) -> Result<String, DecodeError> {
    match encoding {
        Encoding::Raw => Ok(body.to_string()),
        Encoding::Hex => {
            let bytes =
                hex::decode(body).map_err(|_| DecodeError::InvalidHex(body.to_string()))?;
            if !bytes.is_ascii() {
                return Err(DecodeError::NotAscii(body.to_string()));
            }
            String::from_utf8(bytes).map_err(|_| DecodeError::NotAscii(body.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_passes_through() {
        assert_eq!(
            decode_body(Encoding::Raw, "plain text").unwrap(),
            "plain text"
        );
    }

    #[test]
    fn test_hex_decodes_to_ascii() {
        assert_eq!(decode_body(Encoding::Hex, "48656C6C6F").unwrap(), "Hello");
    }

    #[test]
    fn test_hex_accepts_lowercase_digits() {
        assert_eq!(decode_body(Encoding::Hex, "6f6b").unwrap(), "ok");
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert_eq!(
            decode_body(Encoding::Hex, "GG"),
            Err(DecodeError::InvalidHex("GG".to_string()))
        );
        // Odd digit count cannot form bytes
        assert_eq!(
            decode_body(Encoding::Hex, "ABC"),
            Err(DecodeError::InvalidHex("ABC".to_string()))
        );
    }

    #[test]
    fn test_non_ascii_bytes_rejected() {
        assert_eq!(
            decode_body(Encoding::Hex, "FF"),
            Err(DecodeError::NotAscii("FF".to_string()))
        );
    }

    #[test]
    fn test_empty_hex_body_is_empty_text() {
        assert_eq!(decode_body(Encoding::Hex, "").unwrap(), "");
    }
}
