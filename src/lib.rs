//! Deterministic and pseudorandom bit-generator engines.
//!
//! Three strength classes behind a small set of shared contracts:
//!
//! - Non-cryptographic: linear congruential generators with named
//!   parameter presets, MT19937 (with tempering, untempering and state
//!   cloning) and XorShift32.
//! - Number-theoretic: Blum-Blum-Shub.
//! - Standards-based: HMAC-DRBG and Hash-DRBG per NIST SP 800-90A.
//!
//! An operating system entropy adapter and an XOR combiner complete the set.
//!
//! # Architecture
//!
//! ```text
//! engine state ──> scalar output ──> adapter (bytes / bits / ints / floats)
//!                                        │
//!                   OS entropy ──────> XOR combiner
//! ```
//!
//! Every engine is a plain owned value mutated through `&mut self`.
//! Sharing one between threads requires external synchronization.
//!
//! # Examples
//!
//! Reproduce a Mersenne Twister stream and clone it from 624 outputs:
//!
//! ```
//! use bitgen::Mt19937;
//!
//! let mut victim = Mt19937::new(42);
//! let observed = victim.generate_sequence(624);
//!
//! let mut clone = Mt19937::from_outputs(&observed).unwrap();
//! assert_eq!(clone.generate_sequence(10), victim.generate_sequence(10));
//! ```
//!
//! Generate bytes from an HMAC-DRBG:
//!
//! ```
//! use bitgen::{Drbg, HmacDrbg};
//!
//! let mut drbg = HmacDrbg::instantiate(&[0x42; 32], Some(b"nonce"), None).unwrap();
//! let bytes = drbg.generate(32, None).unwrap();
//! assert_eq!(bytes.len(), 32);
//! assert_eq!(drbg.reseed_counter(), 2);
//! ```
//!
//! Drive any engine through the adapter:
//!
//! ```
//! use bitgen::random::adapter;
//! use bitgen::{Lcg, LcgPreset};
//!
//! let mut lcg = Lcg::with_preset(42, LcgPreset::Glibc);
//! let value = adapter::random_int(&mut lcg, 1, 6).unwrap();
//! assert!((1..=6).contains(&value));
//! ```

#![deny(clippy::all)]

pub mod combiner;
pub mod drbg;
pub mod error;
pub mod random;
pub mod utils;

pub use combiner::{xor_combine, xor_combine_prefix, xor_nrbg_generate_bytes, XorNrbg};
pub use drbg::{Drbg, DrbgConfig, DrbgStatus, HashDrbg, HmacDrbg};
pub use error::{BitGenError, Result};
pub use random::blum_blum_shub::{Bbs, BbsParams};
pub use random::box_muller::GaussianSampler;
pub use random::lcg::{Lcg, LcgParams, LcgPreset};
pub use random::mersenne_twister::{temper, untemper, Mt19937};
pub use random::os_entropy::OsEntropy;
pub use random::source::{EntropySource, ScalarSource};
pub use random::xorshift::XorShift32;
