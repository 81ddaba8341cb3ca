//! Scalar/byte conversion utilities.
//!
//! Provides conversion between scalar words and byte strings using
//! big-endian byte ordering, the convention every engine in this crate uses
//! when it turns its native outputs into bytes.

use crate::error::{BitGenError, Result};

/// Converts a slice of scalars to bytes, emitting the low `width_bytes`
/// bytes of each scalar in big-endian order.
///
/// # Parameters
/// - `input`: Scalars to serialize.
/// - `width_bytes`: Bytes per scalar (1..=8).
///
/// # Returns
/// A `Vec<u8>` containing `input.len() * width_bytes` bytes.
pub fn scalars_to_bytes(input: &[u64], width_bytes: usize) -> Vec<u8> {
    let width = width_bytes.clamp(1, 8);
    let mut output = Vec::with_capacity(input.len() * width);
    for &value in input {
        output.extend_from_slice(&value.to_be_bytes()[8 - width..]);
    }
    output
}

/// Converts a byte slice to a `Vec<u32>` using big-endian byte ordering.
///
/// Each group of 4 bytes becomes one word, first byte most significant.
/// This reverses [`scalars_to_bytes`] for 32-bit engines: an observed
/// [`Mt19937::generate_bytes`](crate::Mt19937::generate_bytes) stream of
/// 2496 bytes turns back into the 624 outputs that
/// [`Mt19937::from_outputs`](crate::Mt19937::from_outputs) needs.
///
/// # Errors
/// Returns [`BitGenError::InvalidParameter`] if `input.len() % 4 != 0`.
pub fn bytes_to_u32_be(input: &[u8]) -> Result<Vec<u32>> {
    if !input.len().is_multiple_of(4) {
        return Err(BitGenError::InvalidParameter(
            "byte length must be a multiple of 4",
        ));
    }
    Ok(input
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Interprets up to 8 bytes as a big-endian unsigned integer.
pub(crate) fn be_bytes_to_u64(input: &[u8]) -> u64 {
    input
        .iter()
        .take(8)
        .fold(0u64, |acc, &b| (acc << 8) | b as u64)
}
