//! Operating system entropy adapter.
//!
//! Thin pass-through to the platform CSPRNG via `getrandom`
//! (`getrandom(2)` on Linux, `getentropy` on macOS, `BCryptGenRandom` on
//! Windows). Entropy quality is the operating system's responsibility.

use log::error;

use super::source::EntropySource;
use crate::error::{BitGenError, Result};
use crate::utils::converter;

/// System-provided entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl OsEntropy {
    /// Returns a uniformly random 32-bit integer.
    ///
    /// # Errors
    /// Returns [`BitGenError::EntropyUnavailable`] if the OS source fails.
    pub fn next_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Returns a float in `[0, 1)` computed as `next_u32 / 2^32`.
    ///
    /// # Errors
    /// Returns [`BitGenError::EntropyUnavailable`] if the OS source fails.
    pub fn next_float(&mut self) -> Result<f64> {
        Ok(self.next_u32()? as f64 / 4_294_967_296.0)
    }

    /// Returns `n` integers of `bits` bits each.
    ///
    /// Each integer is read big-endian from `ceil(bits / 8)` fresh bytes and
    /// masked down to `bits` bits.
    ///
    /// # Errors
    /// - [`BitGenError::InvalidParameter`] unless `1 <= bits <= 64`.
    /// - [`BitGenError::EntropyUnavailable`] if the OS source fails.
    pub fn integers(&mut self, n: usize, bits: u32) -> Result<Vec<u64>> {
        if !(1..=64).contains(&bits) {
            return Err(BitGenError::InvalidParameter(
                "integer width must be between 1 and 64 bits",
            ));
        }
        let width = bits.div_ceil(8) as usize;
        let raw = self.random_bytes(n * width)?;
        let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        Ok(raw
            .chunks_exact(width)
            .map(|chunk| converter::be_bytes_to_u64(chunk) & mask)
            .collect())
    }
}

impl EntropySource for OsEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        getrandom::getrandom(dest).map_err(|e| {
            error!("OS entropy source failed: {}", e);
            BitGenError::EntropyUnavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        let mut os = OsEntropy;
        assert_eq!(os.random_bytes(0).unwrap().len(), 0);
        assert_eq!(os.random_bytes(37).unwrap().len(), 37);
    }

    #[test]
    fn test_random_bytes_differ() {
        let mut os = OsEntropy;
        let a = os.random_bytes(32).unwrap();
        let b = os.random_bytes(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_next_float_range() {
        let mut os = OsEntropy;
        for _ in 0..100 {
            let v = os.next_float().unwrap();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_integers_respect_width() {
        let mut os = OsEntropy;
        for v in os.integers(200, 12).unwrap() {
            assert!(v < 4096);
        }
        assert_eq!(os.integers(5, 64).unwrap().len(), 5);
    }

    #[test]
    fn test_integers_reject_bad_width() {
        let mut os = OsEntropy;
        assert!(matches!(
            os.integers(1, 0),
            Err(BitGenError::InvalidParameter(_))
        ));
        assert!(os.integers(1, 65).is_err());
    }
}
