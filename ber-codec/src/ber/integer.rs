//! Unsigned big-endian integer codec
//!
//! Used for INTEGER, ENUMERATED and BOOLEAN content as well as for long-form
//! length fields.

/// Decode big-endian unsigned bytes of arbitrary length
///
/// Computed as `acc = acc * 256 + byte` for every byte. Inputs longer than
/// 8 bytes wrap modulo 2^64; callers that need an exact value (such as the
/// length parser) must bound the input length first.
pub fn decode_integer(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &byte| acc.wrapping_mul(256).wrapping_add(u64::from(byte)))
}

/// Encode an unsigned value as its minimal big-endian byte sequence
///
/// Leading zero bytes are dropped, but at least one byte is always emitted,
/// so `0` encodes as a single `0x00`.
pub fn encode_integer(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    bytes[leading_zero_bytes(value)..].to_vec()
}

/// Number of bytes [`encode_integer`] emits for `value`
pub fn encoded_integer_len(value: u64) -> usize {
    8 - leading_zero_bytes(value)
}

fn leading_zero_bytes(value: u64) -> usize {
    // Keep the least significant byte even when the value is zero
    ((value.leading_zeros() / 8) as usize).min(7)
}
