use rand_distr::{Distribution, Normal};

use crate::source::Source;

/// Tail cut of the noise distribution, in multiples of the standard deviation.
pub const SIX_SIGMA: f64 = 6.0;

/// Centered Gaussian rounded to the nearest integer and tail-cut at
/// [`SIX_SIGMA`] standard deviations.
#[derive(Clone, Copy, Debug)]
pub struct RoundedGaussian {
    normal: Normal<f64>,
    bound: f64,
}

impl RoundedGaussian {
    /// Returns `None` if `sigma` is negative or not finite.
    pub fn new(sigma: f64) -> Option<Self> {
        if !(sigma.is_finite() && sigma >= 0.0) {
            return None;
        }
        let normal: Normal<f64> = Normal::new(0.0, sigma).ok()?;
        Some(Self {
            normal,
            bound: (SIX_SIGMA * sigma).max(1.0),
        })
    }

    pub fn sigma(&self) -> f64 {
        self.normal.std_dev()
    }

    #[inline]
    pub fn sample(&self, source: &mut Source) -> i64 {
        loop {
            let x: f64 = self.normal.sample(source);
            if x.abs() <= self.bound {
                return x.round() as i64;
            }
        }
    }

    /// Noise sample reduced into Z_{2^32}.
    #[inline]
    pub fn sample_u32(&self, source: &mut Source) -> u32 {
        self.sample(source) as u32
    }

    /// Noise sample reduced into Z_q, `q` must be below 2^63.
    #[inline]
    pub fn sample_mod(&self, source: &mut Source, q: u64) -> u64 {
        self.sample(source).rem_euclid(q as i64) as u64
    }
}
