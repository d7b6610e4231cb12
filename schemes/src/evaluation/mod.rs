//! Operations that consume programmable bootstraps.
//!
//! Each public operation runs through [`CryptoContext::evaluate`], which
//! fails with [`Error::NotInitialized`] before the boot parameters are
//! loaded, checks that every operand was encrypted under the loaded key and
//! accounts for the bootstraps the operation consumed. Operands are never
//! mutated and outputs are canonical: bits with unit noise.

mod compare;
mod div;
mod logic;
mod luts;
mod mul;
mod normalize;
mod select;
mod shift;
mod unary;

use std::cell::Cell;

pub use compare::{MinMax, Predicate};
pub use div::Division;
pub(crate) use luts::LutId;
pub use logic::LogicOp;

use fhe16_core::{Error, ParameterSet, Result, lwe::LweCiphertext};
use tracing::debug;

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::{BootState, CryptoContext},
};

/// Scoped access to the prepared evaluation key for one operation.
pub(crate) struct Evaluator<'a> {
    ctx: &'a CryptoContext,
    boot: &'a BootState,
    pbs: Cell<u64>,
}

impl CryptoContext {
    pub(crate) fn evaluate<T, F>(&self, op: &'static str, operands: &[&Ciphertext], f: F) -> Result<T>
    where
        F: FnOnce(&Evaluator) -> Result<T>,
    {
        let boot: &BootState = self.boot()?;
        self.check_compatible(operands)?;
        if let Some(ct) = operands.iter().find(|ct| ct.key_id != boot.key_id) {
            return Err(Error::InvalidParameterSet(format!(
                "ciphertext key id {:#018x} != loaded key id {:#018x}",
                ct.key_id, boot.key_id
            )));
        }

        let eval: Evaluator = Evaluator {
            ctx: self,
            boot,
            pbs: Cell::new(0),
        };
        let res: Result<T> = f(&eval);
        self.count_bootstraps(eval.pbs.get());
        debug!(
            op = op,
            width = self.params().width,
            pbs = eval.pbs.get(),
            ok = res.is_ok(),
            "evaluated"
        );
        res
    }
}

impl Evaluator<'_> {
    pub(crate) fn params(&self) -> &ParameterSet {
        self.ctx.params()
    }

    pub(crate) fn width(&self) -> usize {
        self.ctx.params().width
    }

    fn delta(&self) -> u32 {
        self.ctx.params().delta()
    }

    pub(crate) fn bootstrap(&self, lwe: &LweCiphertext, id: LutId) -> LweCiphertext {
        self.pbs.set(self.pbs.get() + 1);
        self.boot.bootstrapper.bootstrap(lwe, self.ctx.lut(id))
    }

    /// Returns an encryption of `bit * delta` where `bit` is the most
    /// significant bit of the phase of `lwe`, offset by a quarter of the torus.
    pub(crate) fn extract_msb(&self, lwe: &LweCiphertext) -> LweCiphertext {
        let mut x: LweCiphertext = lwe.clone();
        x.add_plaintext_assign(1 << 30);
        let mut res: LweCiphertext = self.bootstrap(&x, LutId::Sign);
        res.neg_assign();
        res.add_plaintext_assign(self.delta() >> 1);
        res
    }

    pub(crate) fn zero(&self) -> LweCiphertext {
        LweCiphertext::alloc(self.params().lwe_dimension)
    }

    /// Trivial encryption of `m * delta`.
    pub(crate) fn constant(&self, m: u32) -> LweCiphertext {
        LweCiphertext::trivial(self.params().lwe_dimension, m.wrapping_mul(self.delta()))
    }

    /// `k - x`.
    pub(crate) fn complement(&self, x: &LweCiphertext, k: u32) -> LweCiphertext {
        let mut res: LweCiphertext = x.clone();
        res.neg_assign();
        res.add_plaintext_assign(k.wrapping_mul(self.delta()));
        res
    }

    /// `sum_i k_i * x_i`.
    pub(crate) fn linear(&self, terms: &[(&LweCiphertext, u32)]) -> LweCiphertext {
        let mut res: LweCiphertext = self.zero();
        terms.iter().for_each(|(x, k)| {
            let mut t: LweCiphertext = (*x).clone();
            t.mul_scalar_assign(*k);
            res.add_assign(&t);
        });
        res
    }

    /// Canonical ciphertext of `like`'s key with the given digits.
    pub(crate) fn output(&self, like: &Ciphertext, kind: CiphertextKind, digits: Vec<LweCiphertext>) -> Ciphertext {
        Ciphertext::canonical(like, kind, digits)
    }

    /// Flag holding `bit` in digit 0.
    pub(crate) fn flag(&self, like: &Ciphertext, bit: LweCiphertext) -> Ciphertext {
        let mut digits: Vec<LweCiphertext> = Vec::with_capacity(self.width());
        digits.push(bit);
        digits.extend((1..self.width()).map(|_| self.zero()));
        self.output(like, CiphertextKind::Flag, digits)
    }
}
