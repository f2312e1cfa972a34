//! Fuzzing placeholder for restitch-core parsing
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_parse

pub fn fuzz_parse(data: &[u8]) {
    use restitch_core::parser::parse_line;

    // Try to parse - should never panic
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = parse_line(line);
    }
}

pub fn fuzz_decode(data: &[u8]) {
    use restitch_core::decoder::decode_body;
    use restitch_core::types::Encoding;

    // Try to decode - should never panic
    if let Ok(body) = std::str::from_utf8(data) {
        let _ = decode_body(Encoding::Hex, body);
        let _ = decode_body(Encoding::Raw, body);
    }
}
