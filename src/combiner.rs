//! XOR combination of byte streams.
//!
//! The combined output is at least as unpredictable as the most
//! unpredictable input, so a single sound entropy source protects a mix of
//! weak deterministic streams.

use crate::error::{BitGenError, Result};
use crate::random::lcg::{Lcg, LcgPreset};
use crate::random::mersenne_twister::Mt19937;
use crate::random::os_entropy::OsEntropy;
use crate::random::source::EntropySource;

/// XORs equal-length byte strings position by position.
///
/// # Errors
/// - [`BitGenError::InvalidParameter`] if `outputs` is empty.
/// - [`BitGenError::LengthMismatch`] if the inputs differ in length.
pub fn xor_combine(outputs: &[&[u8]]) -> Result<Vec<u8>> {
    let first = outputs
        .first()
        .ok_or(BitGenError::InvalidParameter("nothing to combine"))?;
    if outputs.iter().any(|o| o.len() != first.len()) {
        return Err(BitGenError::LengthMismatch);
    }
    let mut result = vec![0u8; first.len()];
    for output in outputs {
        for (r, b) in result.iter_mut().zip(output.iter()) {
            *r ^= b;
        }
    }
    Ok(result)
}

/// XORs the first `n` bytes of every input.
///
/// # Errors
/// - [`BitGenError::InvalidParameter`] if `outputs` is empty.
/// - [`BitGenError::LengthMismatch`] if an input is shorter than `n`.
pub fn xor_combine_prefix(n: usize, outputs: &[&[u8]]) -> Result<Vec<u8>> {
    if outputs.iter().any(|o| o.len() < n) {
        return Err(BitGenError::LengthMismatch);
    }
    let prefixes: Vec<&[u8]> = outputs.iter().map(|o| &o[..n]).collect();
    xor_combine(&prefixes)
}

/// Hybrid generator XORing an LCG (glibc parameters), MT19937 and an
/// entropy source.
#[derive(Debug, Clone)]
pub struct XorNrbg<E: EntropySource> {
    lcg: Lcg,
    mt: Mt19937,
    source: E,
}

impl XorNrbg<OsEntropy> {
    /// Creates a hybrid generator backed by the operating system entropy
    /// source. Both deterministic engines are seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self::with_source(seed, OsEntropy)
    }
}

impl<E: EntropySource> XorNrbg<E> {
    /// Creates a hybrid generator over an arbitrary entropy source.
    pub fn with_source(seed: u32, source: E) -> Self {
        XorNrbg {
            lcg: Lcg::with_preset(seed as u64, LcgPreset::Glibc),
            mt: Mt19937::new(seed),
            source,
        }
    }

    /// Generates `n` combined bytes.
    ///
    /// # Errors
    /// Returns any error produced by the entropy source.
    pub fn generate_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let lcg_data = self.lcg.generate_bytes(n);
        let mt_data = self.mt.generate_bytes(n);
        let entropy = self.source.random_bytes(n)?;
        xor_combine(&[&lcg_data, &mt_data, &entropy])
    }
}

/// One-shot helper: `n` bytes from a fresh [`XorNrbg`] seeded with `seed`.
///
/// # Errors
/// Returns [`BitGenError::EntropyUnavailable`] if the OS source fails.
pub fn xor_nrbg_generate_bytes(n: usize, seed: u32) -> Result<Vec<u8>> {
    XorNrbg::new(seed).generate_bytes(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Zeros;

    impl EntropySource for Zeros {
        fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
            dest.fill(0);
            Ok(())
        }
    }

    struct Failing;

    impl EntropySource for Failing {
        fn fill_bytes(&mut self, _dest: &mut [u8]) -> Result<()> {
            Err(BitGenError::EntropyUnavailable)
        }
    }

    #[test]
    fn test_self_cancellation() {
        let a = [0x5Au8, 0x01, 0xFF, 0x80];
        assert_eq!(xor_combine(&[&a, &a]).unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_length_preserved() {
        let a = [1u8; 10];
        let b = [2u8; 10];
        let c = [4u8; 10];
        let out = xor_combine(&[&a, &b, &c]).unwrap();
        assert_eq!(out, vec![7u8; 10]);
    }

    #[test]
    fn test_single_input_identity() {
        let a = [9u8, 8, 7];
        assert_eq!(xor_combine(&[&a]).unwrap(), a.to_vec());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            xor_combine(&[]),
            Err(BitGenError::InvalidParameter(_))
        ));
        assert_eq!(
            xor_combine(&[&[1u8, 2][..], &[1u8][..]]),
            Err(BitGenError::LengthMismatch)
        );
    }

    #[test]
    fn test_prefix_combine() {
        let a = [0xF0u8, 0x0F, 0xAA];
        let b = [0x0Fu8, 0x0F];
        assert_eq!(xor_combine_prefix(2, &[&a, &b]).unwrap(), vec![0xFF, 0x00]);
        assert_eq!(
            xor_combine_prefix(3, &[&a, &b]),
            Err(BitGenError::LengthMismatch)
        );
    }

    #[test]
    fn test_nrbg_with_silent_source_is_lcg_xor_mt() {
        let mut nrbg = XorNrbg::with_source(42, Zeros);
        let combined = nrbg.generate_bytes(16).unwrap();
        let lcg = Lcg::with_preset(42, LcgPreset::Glibc).generate_bytes(16);
        let mt = Mt19937::new(42).generate_bytes(16);
        let expected: Vec<u8> = lcg.iter().zip(&mt).map(|(a, b)| a ^ b).collect();
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_nrbg_propagates_entropy_failure() {
        let mut nrbg = XorNrbg::with_source(1, Failing);
        assert_eq!(
            nrbg.generate_bytes(4),
            Err(BitGenError::EntropyUnavailable)
        );
    }

    #[test]
    fn test_one_shot_helper() {
        let a = xor_nrbg_generate_bytes(32, 42).unwrap();
        let b = xor_nrbg_generate_bytes(32, 42).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
