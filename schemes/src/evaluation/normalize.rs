use fhe16_core::{Error, Result, lwe::LweCiphertext};
use tracing::trace;

use crate::{ciphertext::Ciphertext, context::CryptoContext, evaluation::Evaluator};

impl CryptoContext {
    /// Re-bootstraps `a` into canonical form: same value, every digit a bit,
    /// unit noise. Canonical inputs are returned unchanged and cost nothing.
    pub fn refresh(&self, a: &Ciphertext) -> Result<Ciphertext> {
        self.evaluate("refresh", &[a], |eval| eval.refresh(a))
    }
}

impl Evaluator<'_> {
    pub(crate) fn refresh(&self, a: &Ciphertext) -> Result<Ciphertext> {
        if a.is_canonical() {
            return Ok(a.clone());
        }
        if !a.within_capacity(self.params()) {
            return Err(Error::CapacityExceeded {
                span: a.digit_span(),
                noise: a.noise,
            });
        }
        let digits: Vec<LweCiphertext> = self.normalize_digits(&a.digits, a.lo, a.hi)?;
        Ok(self.output(a, a.kind, digits))
    }

    /// Carry propagation over digits in `[lo, hi]`, modulo `2^digits.len()`.
    ///
    /// Digits are first shifted into `[0, hi - lo]` by adding `R + bit_i(R)`
    /// to digit `i`, with `R = -lo`, which leaves the value unchanged. Digits
    /// are then processed from low to high: the bits of the digit plus its
    /// pending carries are peeled off with sign bootstraps, bit 0 is the
    /// output digit and bit `j` is carried into position `i + j`.
    pub(crate) fn normalize_digits(&self, digits: &[LweCiphertext], lo: i32, hi: i32) -> Result<Vec<LweCiphertext>> {
        let message_bits: u32 = self.params().message_bits;
        let width: usize = digits.len();
        let span: i64 = hi as i64 - lo as i64;
        let r: i64 = -(lo as i64);

        trace!(width = width, lo = lo, hi = hi, "normalize");

        let mut carries: Vec<LweCiphertext> = (0..width).map(|_| self.zero()).collect();
        let mut carries_max: Vec<i64> = vec![0; width];
        let mut res: Vec<LweCiphertext> = Vec::with_capacity(width);

        for i in 0..width {
            let bit_r: i64 = if i < 63 { (r >> i) & 1 } else { 0 };
            let t_max: i64 = span + bit_r + carries_max[i];
            if t_max >= 1 << message_bits {
                return Err(Error::CapacityExceeded {
                    span: t_max,
                    noise: 0,
                });
            }
            if t_max == 0 {
                res.push(self.zero());
                continue;
            }

            let mut t: LweCiphertext = digits[i].clone();
            t.add_assign(&self.constant((r + bit_r) as u32));
            t.add_assign(&carries[i]);

            let n_bits: u32 = u64::BITS - (t_max as u64).leading_zeros();
            for j in 0..n_bits as usize {
                let mut x: LweCiphertext = t.clone();
                x.mul_scalar_assign(1 << (message_bits as usize - 1 - j));
                let bit: LweCiphertext = self.extract_msb(&x);

                let mut weighted: LweCiphertext = bit.clone();
                weighted.mul_scalar_assign(1 << j);
                t.sub_assign(&weighted);

                if j == 0 {
                    res.push(bit);
                } else if i + j < width {
                    carries[i + j].add_assign(&bit);
                    carries_max[i + j] += 1;
                }
            }
        }
        Ok(res)
    }
}
