use fhe16_core::{Result, lwe::LweCiphertext};

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
    evaluation::Evaluator,
};

impl CryptoContext {
    /// `max(a, 0)`, a select on the complement of the sign digit.
    pub fn relu(&self, a: &Ciphertext) -> Result<Ciphertext> {
        self.evaluate("relu", &[a], |eval| eval.relu(a))
    }

    /// `wrapping_abs`, so that `abs(MIN) = MIN`.
    pub fn abs(&self, a: &Ciphertext) -> Result<Ciphertext> {
        self.evaluate("abs", &[a], |eval| eval.abs(a))
    }
}

impl Evaluator<'_> {
    pub(crate) fn relu(&self, a: &Ciphertext) -> Result<Ciphertext> {
        let a: Ciphertext = self.refresh(a)?;
        let positive: LweCiphertext = self.complement(&a.digits[a.width() - 1], 1);
        let zeros: Vec<LweCiphertext> = (0..a.width()).map(|_| self.zero()).collect();
        let digits: Vec<LweCiphertext> = self.select_digits(&positive, &a.digits, &zeros);
        Ok(self.output(&a, CiphertextKind::Int, digits))
    }

    pub(crate) fn abs(&self, a: &Ciphertext) -> Result<Ciphertext> {
        let a: Ciphertext = self.refresh(a)?;
        self.conditional_neg(&a.digits[a.width() - 1], &a)
    }
}
