//! Linear congruential generator.
//!
//! Implements the recurrence `X(n+1) = (a * X(n) + c) mod m` with the
//! classic parameter tables exposed as named presets. The LCG is fast but
//! statistically weak and offers no cryptographic security: its keystream
//! can be brute-forced from a handful of known bytes.

use std::fmt;
use std::str::FromStr;

use super::source::ScalarSource;
use crate::error::{BitGenError, Result};
use crate::utils::bits;

/// Largest supported modulus (2^64).
const MAX_MODULUS: u128 = 1u128 << 64;

/// Validated LCG parameters.
///
/// The multiplier and increment are stored reduced modulo `m`, so that the
/// product `a * state` always fits in 128-bit arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcgParams {
    a: u64,
    c: u64,
    m: u128,
}

impl LcgParams {
    /// Creates a parameter set.
    ///
    /// # Parameters
    /// - `a`: Multiplier.
    /// - `c`: Increment.
    /// - `m`: Modulus, `1 <= m <= 2^64`.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidParameter`] if `m` is zero or larger than `2^64`.
    pub fn new(a: u64, c: u64, m: u128) -> Result<Self> {
        if m == 0 {
            return Err(BitGenError::InvalidParameter("modulus must be positive"));
        }
        if m > MAX_MODULUS {
            return Err(BitGenError::InvalidParameter("modulus must not exceed 2^64"));
        }
        Ok(LcgParams {
            a: (a as u128 % m) as u64,
            c: (c as u128 % m) as u64,
            m,
        })
    }

    /// Multiplier (reduced modulo `m`).
    pub fn a(&self) -> u64 {
        self.a
    }

    /// Increment (reduced modulo `m`).
    pub fn c(&self) -> u64 {
        self.c
    }

    /// Modulus.
    pub fn m(&self) -> u128 {
        self.m
    }
}

impl Default for LcgParams {
    fn default() -> Self {
        LcgPreset::Glibc.params()
    }
}

/// Named parameter tables found in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcgPreset {
    /// glibc `rand()`: a = 1103515245, c = 12345, m = 2^31.
    Glibc,
    /// IBM RANDU: a = 65539, c = 0, m = 2^31.
    Randu,
    /// Knuth MMIX: a = 6364136223846793005, c = 1442695040888963407, m = 2^64.
    KnuthMmix,
    /// Numerical Recipes: a = 1664525, c = 1013904223, m = 2^32.
    NumericalRecipes,
}

impl LcgPreset {
    /// Returns the parameter set of this preset.
    pub fn params(self) -> LcgParams {
        // Preset moduli are all within 1..=2^64, so no validation is needed.
        let (a, c, m) = match self {
            LcgPreset::Glibc => (1_103_515_245, 12_345, 1u128 << 31),
            LcgPreset::Randu => (65_539, 0, 1u128 << 31),
            LcgPreset::KnuthMmix => (
                6_364_136_223_846_793_005,
                1_442_695_040_888_963_407,
                1u128 << 64,
            ),
            LcgPreset::NumericalRecipes => (1_664_525, 1_013_904_223, 1u128 << 32),
        };
        LcgParams { a, c, m }
    }
}

impl fmt::Display for LcgPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LcgPreset::Glibc => "glibc",
            LcgPreset::Randu => "randu",
            LcgPreset::KnuthMmix => "knuth-mmix",
            LcgPreset::NumericalRecipes => "numerical-recipes",
        };
        f.write_str(name)
    }
}

impl FromStr for LcgPreset {
    type Err = BitGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "glibc" => Ok(LcgPreset::Glibc),
            "randu" => Ok(LcgPreset::Randu),
            "knuth-mmix" | "mmix" => Ok(LcgPreset::KnuthMmix),
            "numerical-recipes" => Ok(LcgPreset::NumericalRecipes),
            _ => Err(BitGenError::InvalidParameter("unknown LCG preset")),
        }
    }
}

/// Linear congruential generator state.
///
/// Invariant: `0 <= state < m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u64,
    params: LcgParams,
}

impl Lcg {
    /// Creates a generator positioned at `seed mod m`.
    pub fn new(seed: u64, params: LcgParams) -> Self {
        Lcg {
            state: (seed as u128 % params.m) as u64,
            params,
        }
    }

    /// Creates a generator from raw parameters.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidParameter`] if `m` is zero or larger than `2^64`.
    pub fn with_params(seed: u64, a: u64, c: u64, m: u128) -> Result<Self> {
        Ok(Self::new(seed, LcgParams::new(a, c, m)?))
    }

    /// Creates a generator using one of the named presets.
    pub fn with_preset(seed: u64, preset: LcgPreset) -> Self {
        Self::new(seed, preset.params())
    }

    /// Current recurrence position.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Parameters of this generator.
    pub fn params(&self) -> LcgParams {
        self.params
    }

    /// Advances the recurrence and returns the new state value.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        let p = &self.params;
        let next = (p.a as u128 * self.state as u128 + p.c as u128) % p.m;
        self.state = next as u64;
        self.state
    }

    /// Returns a float in `[0, 1)` computed as `value / m`.
    ///
    /// Above 2^53 the quotient can round up to 1.0; it is clamped to the
    /// largest float below 1.
    pub fn next_float(&mut self) -> f64 {
        let value = self.next();
        (value as f64 / self.params.m as f64).min(bits::ONE_BELOW)
    }

    /// Generates `n` bytes, each the low 8 bits of a successive state.
    pub fn generate_bytes(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.next() as u8).collect()
    }

    /// Generates the next `n` state values.
    pub fn generate_sequence(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.next()).collect()
    }
}

impl ScalarSource for Lcg {
    fn scalar_bits(&self) -> u32 {
        bits::bit_length(self.params.m - 1).max(1)
    }

    fn next_scalar(&mut self) -> u64 {
        self.next()
    }
}
