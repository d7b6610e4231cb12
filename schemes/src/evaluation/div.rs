use fhe16_core::{Result, lwe::LweCiphertext};

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
    evaluation::{Evaluator, LogicOp, Predicate},
};

/// Result of [`CryptoContext::sdiv`].
#[derive(Clone, Debug)]
pub struct Division {
    pub quotient: Ciphertext,
    pub remainder: Ciphertext,
    /// Flag set when the divisor is zero. Division by zero is not an error:
    /// the quotient is then -1 for a non-negative dividend and 1 otherwise,
    /// and the remainder is the dividend.
    pub is_zero: Ciphertext,
}

impl CryptoContext {
    /// Truncating signed division, `wrapping_div` and `wrapping_rem` on W
    /// bits, so that `MIN / -1 = MIN` with remainder 0.
    ///
    /// Runs W rounds of restoring division on the magnitudes, each refreshing
    /// a (W+1)-digit difference and selecting the next partial remainder.
    pub fn sdiv(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Division> {
        self.evaluate("sdiv", &[a, b], |eval| eval.sdiv(a, b))
    }
}

impl Evaluator<'_> {
    pub(crate) fn sdiv(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Division> {
        let a: Ciphertext = self.refresh(a)?;
        let b: Ciphertext = self.refresh(b)?;
        let width: usize = a.width();

        let sign_a: &LweCiphertext = &a.digits[width - 1];
        let sign_b: &LweCiphertext = &b.digits[width - 1];
        let abs_a: Vec<LweCiphertext> = self.abs_digits(&a)?;
        let abs_b: Vec<LweCiphertext> = self.abs_digits(&b)?;

        let mut abs_b_ext: Vec<LweCiphertext> = abs_b;
        abs_b_ext.push(self.zero());

        let mut rem: Vec<LweCiphertext> = (0..width).map(|_| self.zero()).collect();
        let mut quotient: Vec<LweCiphertext> = (0..width).map(|_| self.zero()).collect();

        for i in (0..width).rev() {
            // (rem << 1) | |a|_i
            let mut shifted: Vec<LweCiphertext> = Vec::with_capacity(width + 1);
            shifted.push(abs_a[i].clone());
            shifted.extend(rem[..width - 1].iter().cloned());

            let mut diff: Vec<LweCiphertext> = shifted.clone();
            diff.push(self.zero());
            diff.iter_mut()
                .zip(abs_b_ext.iter())
                .for_each(|(d, b)| d.sub_assign(b));
            let diff: Vec<LweCiphertext> = self.normalize_digits(&diff, -1, 1)?;

            let q_i: LweCiphertext = self.complement(&diff[width], 1);
            rem = self.select_digits(&q_i, &diff[..width], &shifted);
            quotient[i] = q_i;
        }

        let quotient: Ciphertext = self.output(&a, CiphertextKind::Int, quotient);
        let rem: Ciphertext = self.output(&a, CiphertextKind::Int, rem);

        let sign_q: LweCiphertext = self.logic_bit(sign_a, sign_b, LogicOp::Xor);
        let quotient: Ciphertext = self.conditional_neg(&sign_q, &quotient)?;
        let remainder: Ciphertext = self.conditional_neg(sign_a, &rem)?;

        let zero: Ciphertext = Ciphertext::from_digits(
            &b,
            CiphertextKind::Int,
            0,
            1,
            0,
            (0..width).map(|_| self.zero()).collect(),
        );
        let is_zero: Ciphertext = self.compare(&b, &zero, Predicate::Eq)?;

        Ok(Division {
            quotient,
            remainder,
            is_zero,
        })
    }

    /// Digits of `|a|` as a W-bit unsigned value, `a` canonical.
    fn abs_digits(&self, a: &Ciphertext) -> Result<Vec<LweCiphertext>> {
        Ok(self.conditional_neg(&a.digits[a.width() - 1], a)?.digits)
    }

    /// `c ? -a : a` for a canonical `a`.
    pub(crate) fn conditional_neg(&self, c: &LweCiphertext, a: &Ciphertext) -> Result<Ciphertext> {
        let neg: Ciphertext = self.refresh(&a.neg())?;
        let digits: Vec<LweCiphertext> = self.select_digits(c, &neg.digits, &a.digits);
        Ok(self.output(a, CiphertextKind::Int, digits))
    }
}
