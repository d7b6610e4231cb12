use fhe16_core::{Result, lwe::LweCiphertext};
use serde::{Deserialize, Serialize};

use crate::{
    ciphertext::Ciphertext,
    context::CryptoContext,
    evaluation::{Evaluator, LutId},
};

/// Comparison direction of [`CryptoContext::compare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Predicate {
    pub const ALL: [Predicate; 6] = [
        Predicate::Lt,
        Predicate::Le,
        Predicate::Gt,
        Predicate::Ge,
        Predicate::Eq,
        Predicate::Ne,
    ];

    /// Whether the predicate holds for `sign = signum(a - b)`.
    pub fn holds(&self, sign: i64) -> bool {
        match self {
            Predicate::Lt => sign < 0,
            Predicate::Le => sign <= 0,
            Predicate::Gt => sign > 0,
            Predicate::Ge => sign >= 0,
            Predicate::Eq => sign == 0,
            Predicate::Ne => sign != 0,
        }
    }

    pub fn eval(&self, a: i32, b: i32) -> bool {
        self.holds(a.cmp(&b) as i64)
    }

    pub(crate) fn code(&self) -> u8 {
        match self {
            Predicate::Lt => 0,
            Predicate::Le => 1,
            Predicate::Gt => 2,
            Predicate::Ge => 3,
            Predicate::Eq => 4,
            Predicate::Ne => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinMax {
    Max,
    Min,
}

impl CryptoContext {
    /// Signed comparison of `a` and `b`, returned as a flag. Costs W
    /// bootstraps after refreshing both operands.
    pub fn compare(&self, a: &Ciphertext, b: &Ciphertext, predicate: Predicate) -> Result<Ciphertext> {
        self.evaluate("compare", &[a, b], |eval| eval.compare(a, b, predicate))
    }

    pub fn eq(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.compare(a, b, Predicate::Eq)
    }

    pub fn neq(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.compare(a, b, Predicate::Ne)
    }

    pub fn max_or_min(&self, a: &Ciphertext, b: &Ciphertext, direction: MinMax) -> Result<Ciphertext> {
        self.evaluate("max_or_min", &[a, b], |eval| eval.max_or_min(a, b, direction))
    }

    pub fn max(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.max_or_min(a, b, MinMax::Max)
    }

    pub fn min(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.max_or_min(a, b, MinMax::Min)
    }
}

impl Evaluator<'_> {
    pub(crate) fn compare(&self, a: &Ciphertext, b: &Ciphertext, predicate: Predicate) -> Result<Ciphertext> {
        let a: Ciphertext = self.refresh(a)?;
        let b: Ciphertext = self.refresh(b)?;
        let width: usize = a.width();

        // A positive leaf at any position means a > b at that position, the
        // sign digit has negative weight.
        let mut level: Vec<LweCiphertext> = (0..width)
            .map(|i| {
                let (x, y) = if i + 1 < width {
                    (&a.digits[i], &b.digits[i])
                } else {
                    (&b.digits[i], &a.digits[i])
                };
                let mut leaf: LweCiphertext = x.clone();
                leaf.sub_assign(y);
                leaf
            })
            .collect();

        while level.len() > 1 {
            let mut next: Vec<LweCiphertext> = Vec::with_capacity(level.len().div_ceil(2));
            level.chunks(2).for_each(|pair| match pair {
                [lo, hi] => {
                    let mut x: LweCiphertext = self.linear(&[(hi, 3), (lo, 1)]);
                    x.add_assign(&self.constant(4));
                    next.push(self.bootstrap(&x, LutId::Combine));
                }
                [last] => next.push(last.clone()),
                _ => unreachable!(),
            });
            level = next;
        }

        let mut sign: LweCiphertext = level.swap_remove(0);
        sign.add_assign(&self.constant(1));
        let bit: LweCiphertext = self.bootstrap(&sign, LutId::Predicate(predicate));
        Ok(self.flag(&a, bit))
    }

    pub(crate) fn max_or_min(&self, a: &Ciphertext, b: &Ciphertext, direction: MinMax) -> Result<Ciphertext> {
        let predicate: Predicate = match direction {
            MinMax::Max => Predicate::Ge,
            MinMax::Min => Predicate::Le,
        };
        let a: Ciphertext = self.refresh(a)?;
        let b: Ciphertext = self.refresh(b)?;
        let c: Ciphertext = self.compare(&a, &b, predicate)?;
        self.select(&c, &a, &b)
    }
}
