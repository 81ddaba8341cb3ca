//! Error types for the bitgen library.

use std::fmt;

/// Errors produced by the bitgen engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitGenError {
    /// A generator parameter is outside its valid domain (zero modulus,
    /// composite BBS factor, malformed bit-length request, ...).
    InvalidParameter(&'static str),
    /// A seed is unusable for the engine (BBS seed not coprime with the
    /// modulus, zero XorShift state).
    InvalidSeed,
    /// A DRBG was asked to generate past its reseed interval.
    ReseedRequired,
    /// Bounded rejection sampling exhausted its attempt budget.
    RangeGenerationFailed,
    /// Byte strings handed to the XOR combiner differ in length.
    LengthMismatch,
    /// MT19937 state cloning received fewer than 624 outputs.
    InsufficientData,
    /// The operating system entropy source failed.
    EntropyUnavailable,
}

impl fmt::Display for BitGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitGenError::InvalidParameter(reason) => {
                write!(f, "Invalid parameter: {}", reason)
            }
            BitGenError::InvalidSeed => {
                write!(f, "Seed is not valid for this generator")
            }
            BitGenError::ReseedRequired => {
                write!(f, "Reseed required before further generation")
            }
            BitGenError::RangeGenerationFailed => {
                write!(f, "Unable to generate a number in the requested range")
            }
            BitGenError::LengthMismatch => {
                write!(f, "Input byte strings must have the same length")
            }
            BitGenError::InsufficientData => {
                write!(f, "Not enough outputs to reconstruct the generator state")
            }
            BitGenError::EntropyUnavailable => {
                write!(f, "Operating system entropy source is unavailable")
            }
        }
    }
}

impl std::error::Error for BitGenError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BitGenError>;
