//! Byte/bit/int/float adapter over any [`ScalarSource`].
//!
//! The adapter is stateless: it only pulls scalars from the engine it is
//! handed. Scalars are serialized big-endian using the smallest number of
//! whole bytes that covers the engine's scalar width (4 bytes for MT19937,
//! 1 byte for Blum-Blum-Shub, ...).

use super::source::ScalarSource;
use crate::error::Result;
use crate::utils::{bits, converter};

/// Number of bytes one scalar of `source` occupies once serialized.
pub fn scalar_width_bytes<S: ScalarSource + ?Sized>(source: &S) -> usize {
    (source.scalar_bits().clamp(1, 64) as usize).div_ceil(8)
}

/// Generates `n` bytes by packing successive scalars big-endian and
/// truncating the final scalar.
pub fn generate_bytes<S: ScalarSource + ?Sized>(source: &mut S, n: usize) -> Vec<u8> {
    let width = scalar_width_bytes(source);
    let mut out = Vec::with_capacity(n + width);
    while out.len() < n {
        let scalar = source.next_scalar();
        out.extend_from_slice(&converter::scalars_to_bytes(&[scalar], width));
    }
    out.truncate(n);
    out
}

/// Returns the next `n` scalars.
pub fn generate_sequence<S: ScalarSource + ?Sized>(source: &mut S, n: usize) -> Vec<u64> {
    (0..n).map(|_| source.next_scalar()).collect()
}

/// Returns a float in `[0, 1)` computed as `scalar / 2^scalar_bits`.
///
/// Scalars wider than 53 bits contribute only their top 53 bits.
pub fn next_float<S: ScalarSource + ?Sized>(source: &mut S) -> f64 {
    let num_bits = source.scalar_bits().clamp(1, 64);
    bits::unit_float(source.next_scalar(), num_bits)
}

/// Generates a string of `num_bits` `'0'`/`'1'` characters, most
/// significant bit first within each generated byte.
pub fn generate_bit_string<S: ScalarSource + ?Sized>(source: &mut S, num_bits: usize) -> String {
    let bytes = generate_bytes(source, num_bits.div_ceil(8));
    // Length is exact by construction.
    bits::bytes_to_bit_string(&bytes, num_bits).unwrap_or_default()
}

/// Draws an integer uniformly from `[low, high]` by rejection sampling over
/// the minimal number of bits covering the range.
///
/// # Errors
/// - [`BitGenError::InvalidParameter`](crate::BitGenError::InvalidParameter) if `low > high`.
/// - [`BitGenError::RangeGenerationFailed`](crate::BitGenError::RangeGenerationFailed) if every attempt was rejected.
pub fn random_int<S: ScalarSource + ?Sized>(source: &mut S, low: i64, high: i64) -> Result<i64> {
    bits::sample_inclusive(low, high, |num_bits| {
        let bytes = generate_bytes(&mut *source, num_bits.div_ceil(8) as usize);
        bits::leading_bits(&bytes, num_bits)
    })
}
