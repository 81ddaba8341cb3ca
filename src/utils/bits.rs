//! Bit-level helpers shared by the engines and the DRBGs.
//!
//! Covers bit-length computation, MSB-first bit extraction, wide
//! big-endian modular addition (used by Hash-DRBG on its 440-bit `V`)
//! and bounded rejection sampling.

use crate::error::{BitGenError, Result};

/// Maximum number of draws attempted by [`sample_inclusive`].
pub(crate) const MAX_RANGE_ATTEMPTS: usize = 1000;

/// Returns the number of bits required to represent the given number.
///
/// # Parameters
/// - `num`: The number to analyze.
///
/// # Returns
/// The number of significant bits (0 for 0).
pub fn bit_length(num: u128) -> u32 {
    128 - num.leading_zeros()
}

/// Renders the first `num_bits` bits of `bytes` as a string of `'0'`/`'1'`,
/// most significant bit first within each byte.
///
/// # Errors
/// Returns [`BitGenError::InvalidParameter`] if `num_bits` exceeds the
/// number of bits available in `bytes`.
pub fn bytes_to_bit_string(bytes: &[u8], num_bits: usize) -> Result<String> {
    if num_bits > bytes.len() * 8 {
        return Err(BitGenError::InvalidParameter(
            "more bits requested than bytes provided",
        ));
    }
    let mut out = String::with_capacity(num_bits);
    for i in 0..num_bits {
        let bit = (bytes[i / 8] >> (7 - (i % 8))) & 1;
        out.push(if bit == 1 { '1' } else { '0' });
    }
    Ok(out)
}

/// Interprets the first `num_bits` bits of `bytes` (MSB-first) as an
/// unsigned integer.
///
/// # Errors
/// Returns [`BitGenError::InvalidParameter`] if `num_bits > 64` or if
/// `bytes` is too short.
pub fn leading_bits(bytes: &[u8], num_bits: u32) -> Result<u64> {
    if num_bits > 64 {
        return Err(BitGenError::InvalidParameter("at most 64 bits per value"));
    }
    let needed = num_bits.div_ceil(8) as usize;
    if bytes.len() < needed {
        return Err(BitGenError::InvalidParameter(
            "more bits requested than bytes provided",
        ));
    }
    if num_bits == 0 {
        return Ok(0);
    }
    let mut acc: u64 = 0;
    for &b in &bytes[..needed] {
        acc = (acc << 8) | b as u64;
    }
    Ok(acc >> (needed as u32 * 8 - num_bits))
}

/// Largest `f64` strictly below 1.0.
pub(crate) const ONE_BELOW: f64 = 1.0 - f64::EPSILON / 2.0;

/// Maps a `num_bits`-bit value onto `[0, 1)` as `value / 2^num_bits`.
///
/// Values wider than the 53-bit mantissa keep only their top 53 bits, so
/// the result never rounds up to 1.0.
pub(crate) fn unit_float(value: u64, num_bits: u32) -> f64 {
    let mantissa = f64::MANTISSA_DIGITS;
    if num_bits > mantissa {
        (value >> (num_bits - mantissa)) as f64 / 2f64.powi(mantissa as i32)
    } else {
        value as f64 / 2f64.powi(num_bits as i32)
    }
}

/// Adds `addend` (big-endian, right-aligned) into `acc` modulo
/// `2^(8 * acc.len())`.
///
/// `addend` must not be longer than `acc`.
pub(crate) fn add_be_mod(acc: &mut [u8], addend: &[u8]) {
    debug_assert!(addend.len() <= acc.len());
    let offset = acc.len() - addend.len();
    let mut carry: u16 = 0;
    for i in (0..acc.len()).rev() {
        let rhs = if i >= offset { addend[i - offset] as u16 } else { 0 };
        let sum = acc[i] as u16 + rhs + carry;
        acc[i] = sum as u8;
        carry = sum >> 8;
    }
}

/// Adds a 64-bit integer into a big-endian byte string modulo
/// `2^(8 * acc.len())`.
pub(crate) fn add_be_u64(acc: &mut [u8], value: u64) {
    let bytes = value.to_be_bytes();
    if acc.len() >= bytes.len() {
        add_be_mod(acc, &bytes);
    } else {
        add_be_mod(acc, &bytes[bytes.len() - acc.len()..]);
    }
}

/// Draws an integer uniformly from `[low, high]` by rejection sampling.
///
/// `draw_bits(n)` must return a fresh `n`-bit value (`1 <= n <= 64`). The
/// number of bits requested is the minimal bit length covering
/// `[0, high - low]`; a degenerate range returns `low` without drawing.
///
/// # Errors
/// - [`BitGenError::InvalidParameter`] if `low > high`.
/// - [`BitGenError::RangeGenerationFailed`] after [`MAX_RANGE_ATTEMPTS`]
///   rejected draws.
/// - Any error produced by `draw_bits`.
pub(crate) fn sample_inclusive<F>(low: i64, high: i64, mut draw_bits: F) -> Result<i64>
where
    F: FnMut(u32) -> Result<u64>,
{
    if low > high {
        return Err(BitGenError::InvalidParameter(
            "lower bound must not exceed upper bound",
        ));
    }
    let span = (high as i128 - low as i128) as u64;
    let num_bits = bit_length(span as u128);
    if num_bits == 0 {
        return Ok(low);
    }
    for _ in 0..MAX_RANGE_ATTEMPTS {
        let value = draw_bits(num_bits)?;
        if value <= span {
            return Ok((low as i128 + value as i128) as i64);
        }
    }
    Err(BitGenError::RangeGenerationFailed)
}
