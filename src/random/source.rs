//! Uniform generator contracts.
//!
//! [`ScalarSource`] is the single capability the byte/bit/int/float adapter
//! needs from an engine. [`EntropySource`] abstracts the operating system
//! entropy pool so that combiners and seedless constructors can be driven by
//! a deterministic source in tests.

use crate::error::Result;

/// Trait for engines producing a stream of fixed-width scalar outputs.
///
/// Implementations advance their own state on every call to
/// [`next_scalar`](Self::next_scalar); the returned value always fits in
/// [`scalar_bits`](Self::scalar_bits) bits.
pub trait ScalarSource {
    /// Number of significant bits in every scalar (1..=64).
    fn scalar_bits(&self) -> u32;

    /// Produces the next scalar and advances the engine state.
    fn next_scalar(&mut self) -> u64;
}

impl<S: ScalarSource + ?Sized> ScalarSource for &mut S {
    fn scalar_bits(&self) -> u32 {
        (**self).scalar_bits()
    }

    fn next_scalar(&mut self) -> u64 {
        (**self).next_scalar()
    }
}

/// Trait for sources of unpredictable bytes.
pub trait EntropySource {
    /// Fills `dest` entirely with entropy.
    ///
    /// # Errors
    /// Returns [`BitGenError::EntropyUnavailable`](crate::BitGenError::EntropyUnavailable)
    /// if the source cannot deliver.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()>;

    /// Returns `n` bytes of entropy.
    fn random_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; n];
        self.fill_bytes(&mut out)?;
        Ok(out)
    }
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(dest)
    }
}
