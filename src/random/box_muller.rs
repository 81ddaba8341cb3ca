//! Box-Muller transform over an MT19937 uniform stream.
//!
//! Two independent uniforms `U1, U2 ~ U(0, 1)` become two independent
//! standard normals:
//!
//! ```text
//! Z0 = sqrt(-2 ln U1) * cos(2 pi U2)
//! Z1 = sqrt(-2 ln U1) * sin(2 pi U2)
//! ```

use std::f64::consts::PI;

use super::mersenne_twister::Mt19937;
use crate::error::{BitGenError, Result};

/// Clamp bound used when mapping normals onto bytes.
const BYTE_CLAMP: f64 = 4.0;

/// Applies the Box-Muller transform to two uniforms in `(0, 1)`.
pub fn box_muller(u1: f64, u2: f64) -> (f64, f64) {
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;
    (r * theta.cos(), r * theta.sin())
}

/// Gaussian sampler producing `N(mu, sigma^2)` values.
///
/// Normals are produced in pairs; the second of each pair is cached and
/// returned by the following call.
#[derive(Debug, Clone)]
pub struct GaussianSampler {
    mt: Mt19937,
    mu: f64,
    sigma: f64,
    spare: Option<f64>,
}

impl GaussianSampler {
    /// Creates a sampler seeded with `seed`.
    ///
    /// # Errors
    /// Returns [`BitGenError::InvalidParameter`] if `sigma` is negative or
    /// either parameter is not finite.
    pub fn new(seed: u32, mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() || !sigma.is_finite() || sigma < 0.0 {
            return Err(BitGenError::InvalidParameter(
                "mu must be finite and sigma finite and non-negative",
            ));
        }
        Ok(GaussianSampler {
            mt: Mt19937::new(seed),
            mu,
            sigma,
            spare: None,
        })
    }

    /// Creates a standard normal sampler.
    pub fn standard(seed: u32) -> Self {
        GaussianSampler {
            mt: Mt19937::new(seed),
            mu: 0.0,
            sigma: 1.0,
            spare: None,
        }
    }

    /// Returns the next normal value.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        if let Some(z1) = self.spare.take() {
            return self.mu + self.sigma * z1;
        }
        let mut u1 = self.mt.next_float();
        let u2 = self.mt.next_float();
        while u1 == 0.0 {
            u1 = self.mt.next_float();
        }
        let (z0, z1) = box_muller(u1, u2);
        self.spare = Some(z1);
        self.mu + self.sigma * z0
    }

    /// Returns the next `n` normal values.
    pub fn generate(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.next()).collect()
    }

    /// Generates `n` bytes by clamping normals to `[-4, 4]` and mapping that
    /// interval linearly onto `0..=255`.
    pub fn generate_bytes(&mut self, n: usize) -> Vec<u8> {
        (0..n)
            .map(|_| {
                let z = self.next().clamp(-BYTE_CLAMP, BYTE_CLAMP);
                let scaled = ((z + BYTE_CLAMP) / (2.0 * BYTE_CLAMP) * 256.0) as i64;
                scaled.clamp(0, 255) as u8
            })
            .collect()
    }
}
