use fhe16_core::{Result, lwe::LweCiphertext};

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
    evaluation::Evaluator,
};

impl CryptoContext {
    /// `a << (amount mod W)`, i.e. `wrapping_shl`.
    ///
    /// Barrel shifter over the low `log2(W)` bits of the encrypted amount:
    /// each stage is a W-digit select, 160 bootstraps at W = 32.
    pub fn lshift(&self, a: &Ciphertext, amount: &Ciphertext) -> Result<Ciphertext> {
        self.evaluate("lshift", &[a, amount], |eval| eval.lshift(a, amount))
    }
}

impl Evaluator<'_> {
    pub(crate) fn lshift(&self, a: &Ciphertext, amount: &Ciphertext) -> Result<Ciphertext> {
        let a: Ciphertext = self.refresh(a)?;
        let amount: Ciphertext = self.refresh(amount)?;
        let stages: usize = a.width().trailing_zeros() as usize;

        let mut digits: Vec<LweCiphertext> = a.digits.clone();
        for k in 0..stages {
            let shifted: Vec<LweCiphertext> = self.shl_digits(&digits, 1 << k);
            digits = self.select_digits(&amount.digits[k], &shifted, &digits);
        }
        Ok(self.output(&a, CiphertextKind::Int, digits))
    }

    fn shl_digits(&self, digits: &[LweCiphertext], k: usize) -> Vec<LweCiphertext> {
        let width: usize = digits.len();
        let k: usize = k.min(width);
        (0..k)
            .map(|_| self.zero())
            .chain(digits[..width - k].iter().cloned())
            .collect()
    }
}
