//! Blum-Blum-Shub quadratic residue generator.
//!
//! The state is squared modulo `n = p * q` on every step and the parity of
//! the result is emitted. Bytes and wider integers are assembled from
//! successive bits, most significant bit first.
//!
//! The modulus is limited to 64 bits so that squaring fits in 128-bit
//! arithmetic; the default factors are far too small for real security and
//! exist for teaching and cryptanalysis.

use log::debug;
use rand_core::{impls, Error as RandError, RngCore};

use super::os_entropy::OsEntropy;
use super::source::{EntropySource, ScalarSource};
use crate::error::{BitGenError, Result};
use crate::utils::converter;

/// Default prime `p` (≡ 3 mod 4).
pub const DEFAULT_P: u64 = 1_000_003;

/// Default prime `q` (≡ 3 mod 4).
pub const DEFAULT_Q: u64 = 2_001_911;

/// Maximum draws used to find a coprime seed.
const MAX_SEED_ATTEMPTS: usize = 1000;

/// Validated Blum prime pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BbsParams {
    p: u64,
    q: u64,
    n: u64,
}

impl BbsParams {
    /// Validates a prime pair.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidParameter`] unless `p` and `q` are
    /// distinct primes, both ≡ 3 mod 4, with `p * q < 2^64`.
    pub fn new(p: u64, q: u64) -> Result<Self> {
        if p == q {
            return Err(BitGenError::InvalidParameter("p and q must be distinct"));
        }
        if !is_prime(p) || !is_prime(q) {
            return Err(BitGenError::InvalidParameter("p and q must be prime"));
        }
        if p % 4 != 3 || q % 4 != 3 {
            return Err(BitGenError::InvalidParameter("p and q must be 3 mod 4"));
        }
        let n = p
            .checked_mul(q)
            .ok_or(BitGenError::InvalidParameter("p * q must fit in 64 bits"))?;
        Ok(BbsParams { p, q, n })
    }

    /// First prime factor.
    pub fn p(&self) -> u64 {
        self.p
    }

    /// Second prime factor.
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Modulus `p * q`.
    pub fn modulus(&self) -> u64 {
        self.n
    }
}

impl Default for BbsParams {
    fn default() -> Self {
        BbsParams {
            p: DEFAULT_P,
            q: DEFAULT_Q,
            n: DEFAULT_P * DEFAULT_Q,
        }
    }
}

/// Blum-Blum-Shub generator state.
///
/// Invariant: `gcd(x, n) == 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bbs {
    x: u64,
    params: BbsParams,
}

impl Bbs {
    /// Creates a generator.
    ///
    /// With `Some(seed)` the seed must be coprime with `n`. With `None` a
    /// seed is rejection-sampled uniformly from `[2, n - 1]` using the
    /// operating system entropy source.
    ///
    /// # Errors
    /// - [`BitGenError::InvalidSeed`] if the seed shares a factor with `n`.
    /// - [`BitGenError::EntropyUnavailable`] if seed sampling fails.
    pub fn new(seed: Option<u64>, params: BbsParams) -> Result<Self> {
        match seed {
            Some(seed) => Self::with_seed(seed, params),
            None => Self::from_entropy(params, &mut OsEntropy),
        }
    }

    /// Creates a generator from raw primes, validating them first.
    ///
    /// # Errors
    /// Same as [`BbsParams::new`] and [`Bbs::new`].
    pub fn with_primes(seed: Option<u64>, p: u64, q: u64) -> Result<Self> {
        Self::new(seed, BbsParams::new(p, q)?)
    }

    /// Creates a generator from an explicit seed, stored reduced modulo `n`.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidSeed`] if `gcd(seed, n) != 1`.
    pub fn with_seed(seed: u64, params: BbsParams) -> Result<Self> {
        if gcd(seed, params.n) != 1 {
            return Err(BitGenError::InvalidSeed);
        }
        Ok(Bbs {
            x: seed % params.n,
            params,
        })
    }

    /// Creates a generator whose seed is drawn from `source`.
    ///
    /// # Errors
    /// - [`BitGenError::EntropyUnavailable`] if `source` fails.
    /// - [`BitGenError::RangeGenerationFailed`] if no coprime seed was found
    ///   within the attempt budget.
    pub fn from_entropy<E: EntropySource + ?Sized>(params: BbsParams, source: &mut E) -> Result<Self> {
        let n = params.n;
        let span = n - 2; // candidates 2..=n-1
        // Largest multiple of `span` representable, for unbiased reduction.
        let zone = u64::MAX - (u64::MAX % span);
        let mut buf = [0u8; 8];
        for attempt in 0..MAX_SEED_ATTEMPTS {
            source.fill_bytes(&mut buf)?;
            let raw = converter::be_bytes_to_u64(&buf);
            if raw >= zone {
                continue;
            }
            let candidate = 2 + raw % span;
            if gcd(candidate, n) == 1 {
                debug!("BBS seed sampled after {} attempt(s)", attempt + 1);
                return Ok(Bbs {
                    x: candidate,
                    params,
                });
            }
        }
        Err(BitGenError::RangeGenerationFailed)
    }

    /// Parameters of this generator.
    pub fn params(&self) -> BbsParams {
        self.params
    }

    /// Current quadratic residue.
    pub fn state(&self) -> u64 {
        self.x
    }

    /// Squares the state modulo `n` and returns its parity bit.
    pub fn next_bit(&mut self) -> u8 {
        let x = self.x as u128;
        self.x = ((x * x) % self.params.n as u128) as u64;
        (self.x & 1) as u8
    }

    /// Assembles 8 bits MSB-first.
    pub fn next_byte(&mut self) -> u8 {
        (0..8).fold(0u8, |acc, _| (acc << 1) | self.next_bit())
    }

    /// Assembles 32 bits MSB-first.
    pub fn next_u32(&mut self) -> u32 {
        (0..32).fold(0u32, |acc, _| (acc << 1) | self.next_bit() as u32)
    }

    /// Generates `n` individual bits.
    pub fn generate_bits(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.next_bit()).collect()
    }

    /// Generates `n` bits rendered as a `'0'`/`'1'` string.
    pub fn generate_bit_string(&mut self, n: usize) -> String {
        (0..n)
            .map(|_| if self.next_bit() == 1 { '1' } else { '0' })
            .collect()
    }

    /// Generates `n` bytes, each assembled from 8 bits MSB-first.
    pub fn generate_bytes(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.next_byte()).collect()
    }
}

impl ScalarSource for Bbs {
    fn scalar_bits(&self) -> u32 {
        8
    }

    fn next_scalar(&mut self) -> u64 {
        self.next_byte() as u64
    }
}

impl RngCore for Bbs {
    fn next_u32(&mut self) -> u32 {
        Bbs::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), RandError> {
        RngCore::fill_bytes(self, dest);
        Ok(())
    }
}

/// Greatest common divisor (Euclid).
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1 % m;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// Deterministic Miller-Rabin primality test, exact for all 64-bit inputs.
pub(crate) fn is_prime(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    if n < 2 {
        return false;
    }
    for &w in &WITNESSES {
        if n.is_multiple_of(w) {
            return n == w;
        }
    }
    let mut d = n - 1;
    let mut s = 0;
    while d.is_multiple_of(2) {
        d /= 2;
        s += 1;
    }
    'witness: for &a in &WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Entropy source replaying a fixed byte pattern.
    struct Replay(Vec<u8>, usize);

    impl EntropySource for Replay {
        fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
            for byte in dest.iter_mut() {
                *byte = self.0[self.1 % self.0.len()];
                self.1 += 1;
            }
            Ok(())
        }
    }

    #[test]
    fn test_default_params_are_valid() {
        let params = BbsParams::new(DEFAULT_P, DEFAULT_Q).unwrap();
        assert_eq!(params, BbsParams::default());
        assert_eq!(params.modulus(), 2_001_917_005_733);
    }

    #[test]
    fn test_rejects_bad_primes() {
        assert!(BbsParams::new(11, 11).is_err(), "equal primes");
        assert!(BbsParams::new(13, 19).is_err(), "13 is 1 mod 4");
        assert!(BbsParams::new(15, 19).is_err(), "15 is composite");
        assert!(BbsParams::new(4_294_967_311, 4_294_967_371).is_err(), "overflow");
        assert!(BbsParams::new(4_294_967_291, 3).is_ok());
    }

    #[test]
    fn test_rejects_non_coprime_seed() {
        let params = BbsParams::new(11, 19).unwrap();
        assert_eq!(Bbs::with_seed(22, params), Err(BitGenError::InvalidSeed));
        assert_eq!(Bbs::with_seed(19 * 3, params), Err(BitGenError::InvalidSeed));
        assert_eq!(Bbs::with_seed(0, params), Err(BitGenError::InvalidSeed));
        assert!(Bbs::with_seed(3, params).is_ok());
    }

    #[test]
    fn test_small_modulus_bits() {
        let params = BbsParams::new(11, 19).unwrap();
        let mut bbs = Bbs::with_seed(3, params).unwrap();
        assert_eq!(bbs.generate_bit_string(16), "1100000101101100");
    }

    #[test]
    fn test_default_modulus_reference_bits() {
        let mut bbs = Bbs::with_seed(123_456, BbsParams::default()).unwrap();
        assert_eq!(
            bbs.generate_bit_string(32),
            "00101000010000111001111110100101"
        );
    }

    #[test]
    fn test_int32_and_bytes_are_msb_first() {
        let mut a = Bbs::with_seed(123_456, BbsParams::default()).unwrap();
        let mut b = a.clone();
        assert_eq!(a.next_u32(), 675_520_421);
        assert_eq!(b.generate_bytes(4), vec![0x28, 0x43, 0x9f, 0xa5]);
    }

    #[test]
    fn test_seed_above_modulus_is_reduced() {
        let params = BbsParams::new(11, 19).unwrap();
        let mut wide = Bbs::with_seed(3 + 209 * 5, params).unwrap();
        assert_eq!(wide.state(), 3);
        let mut narrow = Bbs::with_seed(3, params).unwrap();
        assert_eq!(wide.generate_bytes(4), narrow.generate_bytes(4));
    }

    #[test]
    fn test_state_stays_coprime() {
        let mut bbs = Bbs::with_seed(123_456, BbsParams::default()).unwrap();
        for _ in 0..1000 {
            bbs.next_bit();
            assert_eq!(gcd(bbs.state(), bbs.params().modulus()), 1);
        }
    }

    #[test]
    fn test_from_entropy_is_deterministic_for_fixed_source() {
        let params = BbsParams::default();
        let mut s1 = Replay(vec![0x12, 0x34, 0x56, 0x78], 0);
        let mut s2 = Replay(vec![0x12, 0x34, 0x56, 0x78], 0);
        let a = Bbs::from_entropy(params, &mut s1).unwrap();
        let b = Bbs::from_entropy(params, &mut s2).unwrap();
        assert_eq!(a, b);
        assert!(a.state() >= 2 && a.state() < params.modulus());
        assert_eq!(gcd(a.state(), params.modulus()), 1);
    }

    #[test]
    fn test_with_primes_validates() {
        assert!(Bbs::with_primes(Some(3), 11, 19).is_ok());
        assert!(matches!(
            Bbs::with_primes(Some(3), 11, 13),
            Err(BitGenError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_seedless_construction() {
        let bbs = Bbs::new(None, BbsParams::default()).unwrap();
        assert_eq!(gcd(bbs.state(), bbs.params().modulus()), 1);
    }

    #[test]
    fn test_is_prime() {
        assert!(is_prime(2));
        assert!(is_prime(1_000_003));
        assert!(is_prime(2_001_911));
        assert!(is_prime(18_446_744_073_709_551_557));
        assert!(!is_prime(1));
        assert!(!is_prime(561));
        assert!(!is_prime(1_000_003 * 3));
    }
}
