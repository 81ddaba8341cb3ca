//! Deterministic random bit generators per NIST SP 800-90A.
//!
//! Two SHA-256 based variants share the [`Drbg`] contract:
//!
//! - [`HmacDrbg`]: `Key`/`V` state refreshed through the HMAC update
//!   function.
//! - [`HashDrbg`]: `V`/`C` state of `seedlen = 440` bits driven by `Hash_df`.
//!
//! A DRBG value only exists after instantiation, so the uninstantiated
//! state of the SP 800-90A state machine cannot be observed. Generation is
//! refused with [`BitGenError::ReseedRequired`] once the reseed counter
//! exceeds the configured interval; a refused request leaves the state
//! untouched.

pub mod hash_drbg;
pub mod hmac_drbg;

pub use hash_drbg::HashDrbg;
pub use hmac_drbg::HmacDrbg;

use log::warn;

use crate::error::{BitGenError, Result};
use crate::utils::bits;

/// Default number of `generate` calls allowed between reseeds.
pub const DEFAULT_RESEED_INTERVAL: u64 = 10_000;

/// Default per-request output cap in bytes (2^19 bits).
pub const DEFAULT_MAX_BYTES_PER_REQUEST: usize = 65_536;

/// Entropy input length drawn by the `from_os_entropy` constructors and by
/// `reseed_from`.
pub const ENTROPY_INPUT_LEN: usize = 32;

/// Nonce length drawn by the `from_os_entropy` constructors.
pub const NONCE_LEN: usize = 16;

/// Observable DRBG state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrbgStatus {
    /// `generate` will succeed.
    Ready,
    /// The reseed interval is exhausted; `reseed` must be called first.
    ReseedRequired,
}

/// Limits applied to a DRBG instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrbgConfig {
    /// Maximum number of successful `generate` calls between reseeds.
    pub reseed_interval: u64,
    /// Maximum number of bytes a single `generate` call may return.
    pub max_bytes_per_request: usize,
}

impl Default for DrbgConfig {
    fn default() -> Self {
        DrbgConfig {
            reseed_interval: DEFAULT_RESEED_INTERVAL,
            max_bytes_per_request: DEFAULT_MAX_BYTES_PER_REQUEST,
        }
    }
}

impl DrbgConfig {
    /// Validates the limits.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidParameter`] if either limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.reseed_interval == 0 {
            return Err(BitGenError::InvalidParameter(
                "reseed interval must be positive",
            ));
        }
        if self.max_bytes_per_request == 0 {
            return Err(BitGenError::InvalidParameter(
                "max bytes per request must be positive",
            ));
        }
        Ok(())
    }
}

/// Common contract of the SP 800-90A generators.
pub trait Drbg {
    /// Produces `n_bytes` pseudorandom bytes and advances the state.
    ///
    /// An empty `additional_input` is treated as absent.
    ///
    /// # Errors
    /// - [`BitGenError::ReseedRequired`] if the reseed counter exceeds the
    ///   interval. The state is not modified.
    /// - [`BitGenError::InvalidParameter`] if `n_bytes` exceeds the
    ///   configured per-request cap.
    fn generate(&mut self, n_bytes: usize, additional_input: Option<&[u8]>) -> Result<Vec<u8>>;

    /// Mixes fresh entropy into the state and resets the reseed counter to 1.
    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<()>;

    /// Number of the next `generate` call since the last (re)seed, starting at 1.
    fn reseed_counter(&self) -> u64;

    /// Configured reseed interval.
    fn reseed_interval(&self) -> u64;

    /// Current state of the generator.
    fn status(&self) -> DrbgStatus {
        if self.reseed_counter() > self.reseed_interval() {
            DrbgStatus::ReseedRequired
        } else {
            DrbgStatus::Ready
        }
    }

    /// Generates `n_bits` bits as a `'0'`/`'1'` string, most significant bit
    /// first per byte.
    fn generate_bits(&mut self, n_bits: usize) -> Result<String> {
        let bytes = self.generate(n_bits.div_ceil(8), None)?;
        bits::bytes_to_bit_string(&bytes, n_bits)
    }

    /// Draws an integer uniformly from `[low, high]` by rejection sampling.
    ///
    /// Each attempt consumes one `generate` call.
    ///
    /// # Errors
    /// - [`BitGenError::InvalidParameter`] if `low > high`.
    /// - [`BitGenError::RangeGenerationFailed`] if every attempt is rejected.
    /// - Any error returned by [`generate`](Self::generate).
    fn random_int(&mut self, low: i64, high: i64) -> Result<i64> {
        bits::sample_inclusive(low, high, |num_bits| {
            let bytes = self.generate(num_bits.div_ceil(8) as usize, None)?;
            bits::leading_bits(&bytes, num_bits)
        })
    }
}

/// Refuses a request that exceeds the reseed interval or the size cap.
pub(crate) fn check_request(
    name: &str,
    config: &DrbgConfig,
    reseed_counter: u64,
    n_bytes: usize,
) -> Result<()> {
    if reseed_counter > config.reseed_interval {
        warn!(
            "{}: reseed interval of {} exhausted, refusing to generate",
            name, config.reseed_interval
        );
        return Err(BitGenError::ReseedRequired);
    }
    if n_bytes > config.max_bytes_per_request {
        return Err(BitGenError::InvalidParameter(
            "requested output exceeds the per-request limit",
        ));
    }
    Ok(())
}

/// Maps an empty additional input to `None`.
pub(crate) fn non_empty(input: Option<&[u8]>) -> Option<&[u8]> {
    input.filter(|data| !data.is_empty())
}
