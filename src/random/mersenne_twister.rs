//! 32-bit Mersenne Twister PRNG (MT19937).
//!
//! Period 2^19937 - 1 and excellent equidistribution, but NOT suitable for
//! cryptographic use: tempering is an invertible linear map, so 624
//! consecutive outputs are enough to rebuild the complete internal state
//! (see [`Mt19937::from_outputs`]).

use log::{debug, trace};
use rand_core::{impls, Error as RandError, RngCore, SeedableRng};

use super::source::ScalarSource;
use crate::error::{BitGenError, Result};
use crate::utils::converter;

/// Number of 32-bit words in the state vector.
pub const STATE_WORDS: usize = 624;

/// Twist offset.
const MM: usize = 397;

/// Twist matrix constant.
const MATRIX_A: u32 = 0x9908_B0DF;

/// Most significant bit.
const UPPER_MASK: u32 = 0x8000_0000;

/// Least significant 31 bits.
const LOWER_MASK: u32 = 0x7FFF_FFFF;

/// Initialization multiplier.
const INIT_MULTIPLIER: u32 = 1_812_433_253;

/// Tempering masks.
const TEMPER_B: u32 = 0x9D2C_5680;
const TEMPER_C: u32 = 0xEFC6_0000;

/// Reference default seed.
pub const DEFAULT_SEED: u32 = 5489;

/// Applies the MT19937 output tempering to a raw state word.
pub fn temper(y: u32) -> u32 {
    let mut y = y;
    y ^= y >> 11;
    y ^= (y << 7) & TEMPER_B;
    y ^= (y << 15) & TEMPER_C;
    y ^= y >> 18;
    y
}

/// Inverts [`temper`], recovering the raw state word from an output.
///
/// Each tempering step is undone in reverse order. The `>> 18` and
/// `<< 15` steps are their own inverse because the shift is at least half
/// the word. The `<< 7` step needs four fixed-point iterations and the
/// `>> 11` step two, each iteration fixing another shift-width of bits.
pub fn untemper(y: u32) -> u32 {
    let mut y = y;
    y ^= y >> 18;
    y ^= (y << 15) & TEMPER_C;

    let mut t = y;
    for _ in 0..4 {
        t = y ^ ((t << 7) & TEMPER_B);
    }
    y = t;

    let mut t = y;
    for _ in 0..2 {
        t = y ^ (t >> 11);
    }
    t
}

/// MT19937 generator state.
///
/// Invariant: `index <= 624`; a twist happens exactly when `index == 624`
/// before an extraction.
#[derive(Clone, PartialEq, Eq)]
pub struct Mt19937 {
    mt: [u32; STATE_WORDS],
    index: usize,
}

impl std::fmt::Debug for Mt19937 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt19937")
            .field("index", &self.index)
            .field("head", &&self.mt[..4])
            .finish()
    }
}

impl Default for Mt19937 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Mt19937 {
    /// Creates a generator from a 32-bit seed.
    ///
    /// The cursor starts at 624 so the first extraction twists.
    pub fn new(seed: u32) -> Self {
        let mut mt = [0u32; STATE_WORDS];
        mt[0] = seed;
        for i in 1..STATE_WORDS {
            let prev = mt[i - 1];
            mt[i] = INIT_MULTIPLIER
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Mt19937 {
            mt,
            index: STATE_WORDS,
        }
    }

    /// Clones a generator from 624 consecutive outputs of a victim.
    ///
    /// Every output is untempered back into a state word; the cursor is
    /// forced to 624 so the clone twists on its next extraction and follows
    /// the victim's future trajectory exactly. The clone is an independent
    /// value.
    ///
    /// # Parameters
    /// - `outputs`: Raw extracted outputs in emission order.
    ///
    /// # Errors
    /// - [`BitGenError::InsufficientData`] if fewer than 624 outputs are given.
    /// - [`BitGenError::InvalidParameter`] if more than 624 outputs are given.
    pub fn from_outputs(outputs: &[u32]) -> Result<Self> {
        if outputs.len() < STATE_WORDS {
            return Err(BitGenError::InsufficientData);
        }
        if outputs.len() > STATE_WORDS {
            return Err(BitGenError::InvalidParameter(
                "state cloning needs exactly 624 outputs",
            ));
        }
        let mut mt = [0u32; STATE_WORDS];
        for (word, &out) in mt.iter_mut().zip(outputs) {
            *word = untemper(out);
        }
        debug!("reconstructed MT19937 state from {} outputs", outputs.len());
        Ok(Mt19937 {
            mt,
            index: STATE_WORDS,
        })
    }

    /// Current cursor position in `0..=624`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw (untempered) state words.
    pub fn words(&self) -> &[u32; STATE_WORDS] {
        &self.mt
    }

    /// Regenerates all 624 state words and resets the cursor.
    pub fn twist(&mut self) {
        const NN: usize = STATE_WORDS;
        let mag01: [u32; 2] = [0, MATRIX_A];

        for i in 0..(NN - MM) {
            let x = (self.mt[i] & UPPER_MASK) | (self.mt[i + 1] & LOWER_MASK);
            self.mt[i] = self.mt[i + MM] ^ (x >> 1) ^ mag01[(x & 1) as usize];
        }
        for i in (NN - MM)..(NN - 1) {
            let x = (self.mt[i] & UPPER_MASK) | (self.mt[i + 1] & LOWER_MASK);
            self.mt[i] = self.mt[i + MM - NN] ^ (x >> 1) ^ mag01[(x & 1) as usize];
        }
        let x = (self.mt[NN - 1] & UPPER_MASK) | (self.mt[0] & LOWER_MASK);
        self.mt[NN - 1] = self.mt[MM - 1] ^ (x >> 1) ^ mag01[(x & 1) as usize];

        self.index = 0;
        trace!("MT19937 twist");
    }

    /// Extracts the next tempered 32-bit output.
    pub fn extract(&mut self) -> u32 {
        if self.index >= STATE_WORDS {
            self.twist();
        }
        let y = self.mt[self.index];
        self.index += 1;
        temper(y)
    }

    /// Returns a float in `[0, 1)` computed as `value / 2^32`.
    pub fn next_float(&mut self) -> f64 {
        self.extract() as f64 / 4_294_967_296.0
    }

    /// Generates `n` bytes from big-endian 32-bit outputs, truncating the
    /// last word.
    pub fn generate_bytes(&mut self, n: usize) -> Vec<u8> {
        let words: Vec<u64> = (0..n.div_ceil(4)).map(|_| self.extract() as u64).collect();
        let mut out = converter::scalars_to_bytes(&words, 4);
        out.truncate(n);
        out
    }

    /// Generates the next `n` outputs.
    pub fn generate_sequence(&mut self, n: usize) -> Vec<u32> {
        (0..n).map(|_| self.extract()).collect()
    }
}

impl ScalarSource for Mt19937 {
    fn scalar_bits(&self) -> u32 {
        32
    }

    fn next_scalar(&mut self) -> u64 {
        self.extract() as u64
    }
}

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        self.extract()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt19937 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
