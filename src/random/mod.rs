//! Bit-generator engines and the uniform contracts they share.
//!
//! Non-cryptographic engines ([`Lcg`](lcg::Lcg), [`Mt19937`](mersenne_twister::Mt19937),
//! [`XorShift32`](xorshift::XorShift32)), the number-theoretic
//! [`Bbs`](blum_blum_shub::Bbs) generator, the operating system entropy
//! adapter and the engine-agnostic byte/bit/int/float adapter.

pub mod adapter;
pub mod blum_blum_shub;
pub mod box_muller;
pub mod lcg;
pub mod mersenne_twister;
pub mod os_entropy;
pub mod source;
pub mod xorshift;
