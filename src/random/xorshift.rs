//! Marsaglia XorShift32 generator (13/17/5 shift triple).

use super::source::ScalarSource;
use crate::error::{BitGenError, Result};

/// XorShift32 state. Never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Creates a generator.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidSeed`] for a zero seed, which is a
    /// fixed point of the recurrence.
    pub fn new(seed: u32) -> Result<Self> {
        if seed == 0 {
            return Err(BitGenError::InvalidSeed);
        }
        Ok(XorShift32 { state: seed })
    }

    /// Current state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advances the state and returns it.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl ScalarSource for XorShift32 {
    fn scalar_bits(&self) -> u32 {
        32
    }

    fn next_scalar(&mut self) -> u64 {
        self.next_u32() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_rejected() {
        assert_eq!(XorShift32::new(0), Err(BitGenError::InvalidSeed));
    }

    #[test]
    fn test_reference_sequence() {
        let mut rng = XorShift32::new(123_456_789).unwrap();
        let values: Vec<u32> = (0..5).map(|_| rng.next_u32()).collect();
        assert_eq!(
            values,
            vec![2_714_967_881, 2_238_813_396, 1_250_077_441, 3_820_100_336, 3_177_519_686]
        );
    }

    #[test]
    fn test_never_reaches_zero() {
        let mut rng = XorShift32::new(1).unwrap();
        for _ in 0..100_000 {
            assert_ne!(rng.next_u32(), 0);
        }
    }
}
