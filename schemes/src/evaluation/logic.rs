use fhe16_core::{Error, Result, lwe::LweCiphertext};
use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
    evaluation::{Evaluator, LutId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    And,
    Or,
    Xor,
}

impl LogicOp {
    fn lut(&self) -> LutId {
        match self {
            LogicOp::And => LutId::And,
            LogicOp::Or => LutId::Or,
            LogicOp::Xor => LutId::Xor,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LogicOp::And => "and",
            LogicOp::Or => "or",
            LogicOp::Xor => "xor",
        }
    }
}

impl CryptoContext {
    /// Boolean operation on two flags (one bootstrap) or bitwise operation on
    /// two integers (W bootstraps after refresh).
    pub fn logic(&self, a: &Ciphertext, b: &Ciphertext, op: LogicOp) -> Result<Ciphertext> {
        self.evaluate(op.name(), &[a, b], |eval| eval.logic(a, b, op))
    }

    pub fn and(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.logic(a, b, LogicOp::And)
    }

    pub fn or(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.logic(a, b, LogicOp::Or)
    }

    pub fn xor(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.logic(a, b, LogicOp::Xor)
    }

    pub fn logic_vec(&self, a: &[Ciphertext], b: &[Ciphertext], op: LogicOp) -> Result<Vec<Ciphertext>> {
        if a.len() != b.len() {
            return Err(Error::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        let operands: Vec<&Ciphertext> = a.iter().chain(b.iter()).collect();
        self.evaluate(op.name(), &operands, |eval| {
            izip!(a.iter(), b.iter())
                .map(|(a, b)| eval.logic(a, b, op))
                .collect()
        })
    }

    pub fn and_vec(&self, a: &[Ciphertext], b: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        self.logic_vec(a, b, LogicOp::And)
    }

    pub fn or_vec(&self, a: &[Ciphertext], b: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        self.logic_vec(a, b, LogicOp::Or)
    }

    pub fn xor_vec(&self, a: &[Ciphertext], b: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        self.logic_vec(a, b, LogicOp::Xor)
    }
}

impl Evaluator<'_> {
    pub(crate) fn logic(&self, a: &Ciphertext, b: &Ciphertext, op: LogicOp) -> Result<Ciphertext> {
        let a: Ciphertext = self.refresh(a)?;
        let b: Ciphertext = self.refresh(b)?;
        if a.is_flag() && b.is_flag() {
            let bit: LweCiphertext = self.logic_bit(&a.digits[0], &b.digits[0], op);
            return Ok(self.flag(&a, bit));
        }
        let digits: Vec<LweCiphertext> = izip!(a.digits.iter(), b.digits.iter())
            .map(|(x, y)| self.logic_bit(x, y, op))
            .collect();
        Ok(self.output(&a, CiphertextKind::Int, digits))
    }

    pub(crate) fn logic_bit(&self, a: &LweCiphertext, b: &LweCiphertext, op: LogicOp) -> LweCiphertext {
        let mut x: LweCiphertext = a.clone();
        x.add_assign(b);
        self.bootstrap(&x, op.lut())
    }
}
