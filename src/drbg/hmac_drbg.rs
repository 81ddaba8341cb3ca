//! HMAC-DRBG with HMAC-SHA-256 (SP 800-90A, section 10.1.2).

use hmac::{Hmac, Mac};
use log::debug;
use sha2::Sha256;
use zeroize::Zeroize;

use super::{check_request, non_empty, Drbg, DrbgConfig, ENTROPY_INPUT_LEN, NONCE_LEN};
use crate::error::{BitGenError, Result};
use crate::random::os_entropy::OsEntropy;
use crate::random::source::EntropySource;

type HmacSha256 = Hmac<Sha256>;

/// Output length of HMAC-SHA-256 in bytes; also the length of `Key` and `V`.
pub const OUT_LEN: usize = 32;

/// Computes `HMAC(key, parts[0] || parts[1] || ...)`.
fn hmac_sha256(key: &[u8; OUT_LEN], parts: &[&[u8]]) -> Result<[u8; OUT_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| BitGenError::InvalidParameter("HMAC key rejected"))?;
    for part in parts {
        mac.update(part);
    }
    let tag = mac.finalize().into_bytes();
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&tag);
    Ok(out)
}

/// HMAC-DRBG working state.
///
/// `Key` and `V` are wiped when the value is dropped.
pub struct HmacDrbg {
    key: [u8; OUT_LEN],
    v: [u8; OUT_LEN],
    reseed_counter: u64,
    config: DrbgConfig,
}

impl std::fmt::Debug for HmacDrbg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacDrbg")
            .field("reseed_counter", &self.reseed_counter)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Drop for HmacDrbg {
    fn drop(&mut self) {
        self.key.zeroize();
        self.v.zeroize();
    }
}

impl HmacDrbg {
    /// Instantiates the generator with the default [`DrbgConfig`].
    ///
    /// # Parameters
    /// - `entropy`: Entropy input.
    /// - `nonce`: Optional nonce.
    /// - `personalization`: Optional personalization string.
    ///
    /// # Returns
    /// A generator in the `Ready` state with a reseed counter of 1.
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
    /// Returns [`BitGenError::InvalidParameter`] if `config` is invalid.
    pub fn with_config(
        entropy: &[u8],
        nonce: Option<&[u8]>,
        personalization: Option<&[u8]>,
        config: DrbgConfig,
    ) -> Result<Self> {
        config.validate()?;
        let nonce = nonce.unwrap_or_default();
        let personalization = personalization.unwrap_or_default();
        let mut seed_material =
            Vec::with_capacity(entropy.len() + nonce.len() + personalization.len());
        seed_material.extend_from_slice(entropy);
        seed_material.extend_from_slice(nonce);
        seed_material.extend_from_slice(personalization);

        let mut drbg = HmacDrbg {
            key: [0x00; OUT_LEN],
            v: [0x01; OUT_LEN],
            reseed_counter: 1,
            config,
        };
        let updated = drbg.update(non_empty(Some(seed_material.as_slice())));
        seed_material.zeroize();
        updated?;
        debug!(
            "HMAC-DRBG instantiated (reseed interval {})",
            drbg.config.reseed_interval
        );
        Ok(drbg)
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
        let drbg = Self::instantiate(&entropy, Some(&nonce), personalization);
        entropy.zeroize();
        drbg
    }

    /// Instantiates the generator from the operating system entropy source.
    ///
    /// # Errors
    /// Returns [`BitGenError::EntropyUnavailable`] if the OS source fails.
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

    /// HMAC_DRBG_Update.
    ///
    /// The second round only runs when `provided_data` is present.
    fn update(&mut self, provided_data: Option<&[u8]>) -> Result<()> {
        let data = provided_data.unwrap_or_default();
        self.key = hmac_sha256(&self.key, &[&self.v[..], &[0x00], data])?;
        self.v = hmac_sha256(&self.key, &[&self.v[..]])?;
        if provided_data.is_some() {
            self.key = hmac_sha256(&self.key, &[&self.v[..], &[0x01], data])?;
            self.v = hmac_sha256(&self.key, &[&self.v[..]])?;
        }
        Ok(())
    }
}

impl Drbg for HmacDrbg {
    fn generate(&mut self, n_bytes: usize, additional_input: Option<&[u8]>) -> Result<Vec<u8>> {
        check_request("HMAC-DRBG", &self.config, self.reseed_counter, n_bytes)?;
        let additional_input = non_empty(additional_input);
        if additional_input.is_some() {
            self.update(additional_input)?;
        }

        let mut output = Vec::with_capacity(n_bytes.div_ceil(OUT_LEN) * OUT_LEN);
        while output.len() < n_bytes {
            self.v = hmac_sha256(&self.key, &[&self.v[..]])?;
            output.extend_from_slice(&self.v);
        }
        output.truncate(n_bytes);

        // Post-generate update runs even without additional input.
        self.update(additional_input)?;
        self.reseed_counter += 1;
        Ok(output)
    }

    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<()> {
        let additional_input = additional_input.unwrap_or_default();
        let mut seed_material = Vec::with_capacity(entropy.len() + additional_input.len());
        seed_material.extend_from_slice(entropy);
        seed_material.extend_from_slice(additional_input);
        let updated = self.update(non_empty(Some(seed_material.as_slice())));
        seed_material.zeroize();
        updated?;
        self.reseed_counter = 1;
        debug!("HMAC-DRBG reseeded");
        Ok(())
    }

    fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }

    fn reseed_interval(&self) -> u64 {
        self.config.reseed_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drbg::{DrbgStatus, DEFAULT_MAX_BYTES_PER_REQUEST};

    fn test_inputs() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        (
            (0u8..32).collect(),
            (32u8..48).collect(),
            b"bitgen-test".to_vec(),
        )
    }

    fn reference_drbg() -> HmacDrbg {
        let (e, n, p) = test_inputs();
        HmacDrbg::instantiate(&e, Some(&n), Some(&p)).unwrap()
    }

    #[test]
    fn test_reference_generate() {
        let mut drbg = reference_drbg();
        assert_eq!(
            hex::encode(drbg.generate(32, None).unwrap()),
            "6a9a1d0ca616bc299c56ded026ab31fa00eee765f0b5b7308633c0948c92aad2"
        );
        assert_eq!(
            hex::encode(drbg.generate(32, None).unwrap()),
            "6ea6d33ef84de9943525acc6980e47e5eae42cdf0550dcece94dc52cfeed5a8b"
        );
        assert_eq!(drbg.reseed_counter(), 3);
    }

    #[test]
    fn test_reference_reseed() {
        let mut drbg = reference_drbg();
        drbg.generate(32, None).unwrap();
        drbg.generate(32, None).unwrap();
        drbg.reseed(&[0xAA; 32], None).unwrap();
        assert_eq!(drbg.reseed_counter(), 1);
        assert_eq!(
            hex::encode(drbg.generate(16, None).unwrap()),
            "f81a4c7999601eb5e117b2cda83edf91"
        );
    }

    #[test]
    fn test_reference_additional_input() {
        let mut drbg = reference_drbg();
        assert_eq!(
            hex::encode(drbg.generate(40, Some(b"extra")).unwrap()),
            "9e18f7e53a1ae1065981151ee47b1b19f4c0d2864604c2a47b7fc0d0686848bf70793035bc113dda"
        );
    }

    #[test]
    fn test_entropy_only() {
        let mut drbg = HmacDrbg::instantiate(&[b'A'; 32], None, None).unwrap();
        assert_eq!(
            hex::encode(drbg.generate(32, None).unwrap()),
            "2be347dc89ba07f0ad6fa2be27719ce0230e59a8c6f125dc64c8da10e073040a"
        );
    }

    #[test]
    fn test_empty_additional_input_is_absent() {
        let mut a = reference_drbg();
        let mut b = reference_drbg();
        assert_eq!(
            a.generate(32, Some(b"")).unwrap(),
            b.generate(32, None).unwrap()
        );
    }

    #[test]
    fn test_reseed_interval_enforced() {
        let config = DrbgConfig {
            reseed_interval: 3,
            ..DrbgConfig::default()
        };
        let mut drbg = HmacDrbg::with_config(&[7; 32], None, None, config).unwrap();
        for _ in 0..3 {
            drbg.generate(16, None).unwrap();
        }
        assert_eq!(drbg.status(), DrbgStatus::ReseedRequired);
        let counter = drbg.reseed_counter();
        assert_eq!(drbg.generate(16, None), Err(BitGenError::ReseedRequired));
        assert_eq!(drbg.reseed_counter(), counter);

        drbg.reseed(&[8; 32], Some(b"more")).unwrap();
        assert_eq!(drbg.status(), DrbgStatus::Ready);
        assert!(drbg.generate(16, None).is_ok());
    }

    #[test]
    fn test_refused_generate_keeps_state() {
        let config = DrbgConfig {
            reseed_interval: 1,
            ..DrbgConfig::default()
        };
        let mut a = HmacDrbg::with_config(&[1; 32], None, None, config).unwrap();
        let mut b = HmacDrbg::with_config(&[1; 32], None, None, config).unwrap();
        a.generate(8, None).unwrap();
        b.generate(8, None).unwrap();
        assert!(a.generate(8, None).is_err());
        a.reseed(&[2; 32], None).unwrap();
        b.reseed(&[2; 32], None).unwrap();
        assert_eq!(a.generate(32, None).unwrap(), b.generate(32, None).unwrap());
    }

    #[test]
    fn test_request_size_limit() {
        let mut drbg = reference_drbg();
        assert!(matches!(
            drbg.generate(DEFAULT_MAX_BYTES_PER_REQUEST + 1, None),
            Err(BitGenError::InvalidParameter(_))
        ));
        assert_eq!(drbg.reseed_counter(), 1);
        let out = drbg.generate(DEFAULT_MAX_BYTES_PER_REQUEST, None).unwrap();
        assert_eq!(out.len(), DEFAULT_MAX_BYTES_PER_REQUEST);
    }

    #[test]
    fn test_generate_bits_and_random_int() {
        let mut drbg = reference_drbg();
        let bits = drbg.generate_bits(13).unwrap();
        assert_eq!(bits.len(), 13);
        assert!(bits.chars().all(|c| c == '0' || c == '1'));
        for _ in 0..200 {
            let v = drbg.random_int(-5, 5).unwrap();
            assert!((-5..=5).contains(&v));
        }
        assert_eq!(drbg.random_int(9, 9).unwrap(), 9);
    }

    #[test]
    fn test_from_os_entropy() {
        let mut a = HmacDrbg::from_os_entropy(Some(b"a")).unwrap();
        let mut b = HmacDrbg::from_os_entropy(Some(b"a")).unwrap();
        assert_ne!(a.generate(32, None).unwrap(), b.generate(32, None).unwrap());
        a.reseed_from(&mut OsEntropy, None).unwrap();
        assert_eq!(a.reseed_counter(), 1);
    }

    #[test]
    fn test_debug_redacts_state() {
        let drbg = reference_drbg();
        let rendered = format!("{:?}", drbg);
        assert!(rendered.contains("reseed_counter"));
        assert!(!rendered.contains("key"));
    }
}
