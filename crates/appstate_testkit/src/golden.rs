//! Hex helpers for golden values.

/// Encodes bytes as hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes hexadecimal string to bytes.
///
/// Whitespace is ignored. Panics on invalid input; this is test tooling.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}

/// Asserts that bytes equal a golden hex value, printing both on failure.
pub fn assert_hex_eq(actual: &[u8], expected_hex: &str) {
    let expected = hex_decode(expected_hex);
    assert!(
        actual == expected.as_slice(),
        "golden mismatch\n  expected: {}\n  actual:   {}",
        hex_encode(&expected),
        hex_encode(actual)
    );
}
