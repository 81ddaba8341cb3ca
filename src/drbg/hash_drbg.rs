//! Hash-DRBG with SHA-256 (SP 800-90A, section 10.1.1).
//!
//! `V` and `C` are `seedlen = 440` bits (55 bytes). All additions are
//! performed big-endian modulo `2^440`.

use log::debug;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::{check_request, non_empty, Drbg, DrbgConfig, ENTROPY_INPUT_LEN, NONCE_LEN};
use crate::error::Result;
use crate::random::os_entropy::OsEntropy;
use crate::random::source::EntropySource;
use crate::utils::bits::{add_be_mod, add_be_u64};

/// Seed length of the SHA-256 instantiation in bytes.
pub const SEED_LEN: usize = 55;

/// SHA-256 digest length in bytes.
const OUT_LEN: usize = 32;

/// Computes `SHA-256(parts[0] || parts[1] || ...)`.
fn sha256(parts: &[&[u8]]) -> [u8; OUT_LEN] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&digest);
    out
}

/// Hash derivation function `Hash_df(input, no_of_bits)`.
///
/// Concatenates `Hash(counter || no_of_bits || input)` for
/// `counter = 1, 2, ...`, where `no_of_bits` is the requested length in
/// bits as a 32-bit big-endian integer, and truncates to `SEED_LEN` bytes.
pub fn hash_df(parts: &[&[u8]]) -> [u8; SEED_LEN] {
    let no_of_bits = ((SEED_LEN * 8) as u32).to_be_bytes();
    let mut out = [0u8; SEED_LEN];
    for (i, chunk) in out.chunks_mut(OUT_LEN).enumerate() {
        let counter = [(i + 1) as u8];
        let mut hasher = Sha256::new();
        hasher.update(counter);
        hasher.update(no_of_bits);
        for part in parts {
            hasher.update(part);
        }
        let digest = hasher.finalize();
        chunk.copy_from_slice(&digest[..chunk.len()]);
    }
    out
}

/// Hash-DRBG working state.
///
/// `V` and `C` are wiped when the value is dropped.
pub struct HashDrbg {
    v: [u8; SEED_LEN],
    c: [u8; SEED_LEN],
    reseed_counter: u64,
    config: DrbgConfig,
}

impl std::fmt::Debug for HashDrbg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashDrbg")
            .field("reseed_counter", &self.reseed_counter)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Drop for HashDrbg {
    fn drop(&mut self) {
        self.v.zeroize();
        self.c.zeroize();
    }
}

impl HashDrbg {
    /// Instantiates the generator with the default [`DrbgConfig`].
    ///
    /// `V = Hash_df(entropy || nonce || personalization)`,
    /// `C = Hash_df(0x00 || V)`.
    pub fn instantiate(
        entropy: &[u8],
        nonce: Option<&[u8]>,
        personalization: Option<&[u8]>,
    ) -> Result<Self> {
        Self::with_config(entropy, nonce, personalization, DrbgConfig::default())
    }

    /// Instantiates the generator with explicit limits.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidParameter`](crate::BitGenError::InvalidParameter)
    /// if `config` is invalid.
    pub fn with_config(
        entropy: &[u8],
        nonce: Option<&[u8]>,
        personalization: Option<&[u8]>,
        config: DrbgConfig,
    ) -> Result<Self> {
        config.validate()?;
        let v = hash_df(&[
            entropy,
            nonce.unwrap_or_default(),
            personalization.unwrap_or_default(),
        ]);
        let c = hash_df(&[&[0x00], &v[..]]);
        debug!(
            "Hash-DRBG instantiated (reseed interval {})",
            config.reseed_interval
        );
        Ok(HashDrbg {
            v,
            c,
            reseed_counter: 1,
            config,
        })
    }

    /// Instantiates the generator from an entropy source.
    ///
    /// Draws 32 bytes of entropy input and a 16-byte nonce.
    pub fn from_entropy<E: EntropySource + ?Sized>(
        source: &mut E,
        personalization: Option<&[u8]>,
    ) -> Result<Self> {
        let mut entropy = source.random_bytes(ENTROPY_INPUT_LEN)?;
        let nonce = source.random_bytes(NONCE_LEN)?;
        let drbg = Self::instantiate(&entropy, Some(nonce.as_slice()), personalization);
        entropy.zeroize();
        drbg
    }

    /// Instantiates the generator from the operating system entropy source.
    pub fn from_os_entropy(personalization: Option<&[u8]>) -> Result<Self> {
        Self::from_entropy(&mut OsEntropy, personalization)
    }

    /// Reseeds with 32 bytes drawn from `source`.
    pub fn reseed_from<E: EntropySource + ?Sized>(
        &mut self,
        source: &mut E,
        additional_input: Option<&[u8]>,
    ) -> Result<()> {
        let mut entropy = source.random_bytes(ENTROPY_INPUT_LEN)?;
        let result = self.reseed(&entropy, additional_input);
        entropy.zeroize();
        result
    }

    /// Limits in effect for this instance.
    pub fn config(&self) -> &DrbgConfig {
        &self.config
    }

    /// Hashgen: hashes successive increments of `V` into `n_bytes` of output.
    fn hashgen(&self, n_bytes: usize) -> Vec<u8> {
        let mut data = self.v;
        let mut output = Vec::with_capacity(n_bytes.div_ceil(OUT_LEN) * OUT_LEN);
        while output.len() < n_bytes {
            output.extend_from_slice(&sha256(&[&data[..]]));
            add_be_u64(&mut data, 1);
        }
        data.zeroize();
        output.truncate(n_bytes);
        output
    }
}

impl Drbg for HashDrbg {
    fn generate(&mut self, n_bytes: usize, additional_input: Option<&[u8]>) -> Result<Vec<u8>> {
        check_request("Hash-DRBG", &self.config, self.reseed_counter, n_bytes)?;
        if let Some(additional) = non_empty(additional_input) {
            let w = sha256(&[&[0x02], &self.v[..], additional]);
            add_be_mod(&mut self.v, &w);
        }

        let output = self.hashgen(n_bytes);

        let h = sha256(&[&[0x03], &self.v[..]]);
        add_be_mod(&mut self.v, &h);
        add_be_mod(&mut self.v, &self.c);
        add_be_u64(&mut self.v, self.reseed_counter);
        self.reseed_counter += 1;
        Ok(output)
    }

    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<()> {
        let additional_input = additional_input.unwrap_or_default();
        self.v = hash_df(&[&[0x01], &self.v[..], entropy, additional_input]);
        self.c = hash_df(&[&[0x00], &self.v[..]]);
        self.reseed_counter = 1;
        debug!("Hash-DRBG reseeded");
        Ok(())
    }

    fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }

    fn reseed_interval(&self) -> u64 {
        self.config.reseed_interval
    }
}
