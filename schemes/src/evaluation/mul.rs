use fhe16_core::{Result, lwe::LweCiphertext};

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
    evaluation::{Evaluator, LogicOp},
};

impl CryptoContext {
    /// Product modulo 2^W, i.e. `wrapping_mul` on the low W bits.
    ///
    /// Partial products `a_i & b_j` for `i + j < W` cost W(W+1)/2 bootstraps.
    /// Rows are summed lazily and the accumulator is refreshed only when the
    /// next row would exceed capacity.
    pub fn smull(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.evaluate("smull", &[a, b], |eval| eval.smull(a, b))
    }
}

impl Evaluator<'_> {
    pub(crate) fn smull(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let a: Ciphertext = self.refresh(a)?;
        let b: Ciphertext = self.refresh(b)?;
        let width: usize = a.width();
        let max_span: i64 = self.params().max_digit_span();
        let max_noise: u32 = self.params().max_noise_level;

        let mut acc: Ciphertext = self.partial_products(&a, &b, 0);
        for i in 1..width {
            if acc.digit_span() + 1 > max_span || acc.noise + 1 > max_noise {
                acc = self.refresh(&acc)?;
            }
            acc = acc.add(&self.partial_products(&a, &b, i));
        }
        self.refresh(&acc)
    }

    /// Row `i` of the schoolbook product: `a_i & b_j` at position `i + j`.
    fn partial_products(&self, a: &Ciphertext, b: &Ciphertext, i: usize) -> Ciphertext {
        let width: usize = a.width();
        let mut row: Vec<LweCiphertext> = (0..i).map(|_| self.zero()).collect();
        row.extend((0..width - i).map(|j| self.logic_bit(&a.digits[i], &b.digits[j], LogicOp::And)));
        self.output(a, CiphertextKind::Int, row)
    }
}
