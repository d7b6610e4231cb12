use fhe16_core::{Error, Result, lwe::LweCiphertext};
use itertools::izip;

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
    evaluation::{Evaluator, LutId},
};

impl CryptoContext {
    /// `c ? a : b`. The condition must be a flag. Costs W bootstraps after
    /// refreshing the operands.
    pub fn select(&self, c: &Ciphertext, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.evaluate("select", &[c, a, b], |eval| eval.select(c, a, b))
    }
}

impl Evaluator<'_> {
    pub(crate) fn select(&self, c: &Ciphertext, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        if !c.is_flag() {
            return Err(Error::KindMismatch {
                expected: CiphertextKind::Flag.name(),
                found: c.kind.name(),
            });
        }
        let c: Ciphertext = self.refresh(c)?;
        let a: Ciphertext = self.refresh(a)?;
        let b: Ciphertext = self.refresh(b)?;
        let kind: CiphertextKind = if a.is_flag() && b.is_flag() {
            CiphertextKind::Flag
        } else {
            CiphertextKind::Int
        };
        let digits: Vec<LweCiphertext> = self.select_digits(&c.digits[0], &a.digits, &b.digits);
        Ok(self.output(&a, kind, digits))
    }

    /// Digit-wise `c ? a_i : b_i` over bits, one bootstrap per digit.
    pub(crate) fn select_digits(&self, c: &LweCiphertext, a: &[LweCiphertext], b: &[LweCiphertext]) -> Vec<LweCiphertext> {
        izip!(a.iter(), b.iter())
            .map(|(a_i, b_i)| {
                let x: LweCiphertext = self.linear(&[(c, 4), (a_i, 2), (b_i, 1)]);
                self.bootstrap(&x, LutId::Select)
            })
            .collect()
    }
}
