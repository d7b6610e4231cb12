//! Straight-line programs over encrypted registers.
//!
//! Registers are numbered in SSA order: the inputs first, then one register
//! per op result, except [`Op::Sdiv`] which defines three (quotient,
//! remainder, is-zero flag). A program is identified by its
//! [`digest`](Program::digest).

use std::path::Path;

use fhe16_core::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{
    ciphertext::Ciphertext,
    context::CryptoContext,
    evaluation::{Division, MinMax, Predicate},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add(usize, usize),
    Sub(usize, usize),
    Neg(usize),
    AddConst(usize, i32),
    MulConst(usize, i32),
    Smull(usize, usize),
    Compare(Predicate, usize, usize),
    /// Condition, then value, else value.
    Select(usize, usize, usize),
    Max(usize, usize),
    Min(usize, usize),
    Relu(usize),
    Abs(usize),
    And(usize, usize),
    Or(usize, usize),
    Xor(usize, usize),
    Not(usize),
    Lshift(usize, usize),
    Sdiv(usize, usize),
}

impl Op {
    fn opcode(&self) -> u8 {
        match self {
            Op::Add(..) => 0,
            Op::Sub(..) => 1,
            Op::Neg(..) => 2,
            Op::AddConst(..) => 3,
            Op::MulConst(..) => 4,
            Op::Smull(..) => 5,
            Op::Compare(..) => 6,
            Op::Select(..) => 7,
            Op::Max(..) => 8,
            Op::Min(..) => 9,
            Op::Relu(..) => 10,
            Op::Abs(..) => 11,
            Op::And(..) => 12,
            Op::Or(..) => 13,
            Op::Xor(..) => 14,
            Op::Not(..) => 15,
            Op::Lshift(..) => 16,
            Op::Sdiv(..) => 17,
        }
    }

    fn registers(&self) -> Vec<usize> {
        match *self {
            Op::Neg(a) | Op::AddConst(a, _) | Op::MulConst(a, _) | Op::Relu(a) | Op::Abs(a) | Op::Not(a) => vec![a],
            Op::Add(a, b)
            | Op::Sub(a, b)
            | Op::Smull(a, b)
            | Op::Compare(_, a, b)
            | Op::Max(a, b)
            | Op::Min(a, b)
            | Op::And(a, b)
            | Op::Or(a, b)
            | Op::Xor(a, b)
            | Op::Lshift(a, b)
            | Op::Sdiv(a, b) => vec![a, b],
            Op::Select(c, a, b) => vec![c, a, b],
        }
    }

    fn immediate(&self) -> Option<i32> {
        match *self {
            Op::AddConst(_, k) | Op::MulConst(_, k) => Some(k),
            _ => None,
        }
    }

    /// Number of registers defined by the op.
    pub fn outputs(&self) -> usize {
        match self {
            Op::Sdiv(..) => 3,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub inputs: usize,
    pub ops: Vec<Op>,
    pub outputs: Vec<usize>,
}

impl Program {
    pub fn new(name: &str, inputs: usize, ops: Vec<Op>, outputs: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            inputs,
            ops,
            outputs,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let program: Program = serde_json::from_str(json).map_err(|e| Error::InvalidProgram(e.to_string()))?;
        program.validate()?;
        Ok(program)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidProgram(e.to_string()))
    }

    /// Total number of registers after evaluation.
    pub fn registers(&self) -> usize {
        self.inputs + self.ops.iter().map(|op| op.outputs()).sum::<usize>()
    }

    /// Checks that every op reads an already defined register and that every
    /// output names a register.
    pub fn validate(&self) -> Result<()> {
        let mut defined: usize = self.inputs;
        for (i, op) in self.ops.iter().enumerate() {
            if let Some(r) = op.registers().into_iter().find(|r| *r >= defined) {
                return Err(Error::InvalidProgram(format!(
                    "op {} ({:?}) reads undefined register {}",
                    i, op, r
                )));
            }
            defined += op.outputs();
        }
        if let Some(r) = self.outputs.iter().find(|r| **r >= defined) {
            return Err(Error::InvalidProgram(format!("output register {} is undefined", r)));
        }
        Ok(())
    }

    /// Canonical little-endian encoding hashed by [`digest`](Program::digest).
    pub fn encode(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        buf.extend_from_slice(b"fhe16-program");
        self.encode_into(&mut buf);
        buf
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        put_u32(buf, self.name.len());
        buf.extend_from_slice(self.name.as_bytes());
        put_u32(buf, self.inputs);
        put_u32(buf, self.ops.len());
        for op in self.ops.iter() {
            buf.push(op.opcode());
            if let Op::Compare(p, ..) = op {
                buf.push(p.code());
            }
            for r in op.registers() {
                put_u32(buf, r);
            }
            if let Some(k) = op.immediate() {
                buf.extend_from_slice(&k.to_le_bytes());
            }
        }
        put_u32(buf, self.outputs.len());
        for r in self.outputs.iter() {
            put_u32(buf, *r);
        }
    }

    /// SHA-256 of the canonical encoding.
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.encode()).into()
    }

    /// Evaluates the program and returns its output registers.
    pub fn run(&self, ctx: &CryptoContext, inputs: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        if inputs.len() != self.inputs {
            return Err(Error::InvalidProgram(format!(
                "{} expects {} inputs but got {}",
                self.name,
                self.inputs,
                inputs.len()
            )));
        }
        self.validate()?;

        let mut regs: Vec<Ciphertext> = Vec::with_capacity(self.registers());
        regs.extend_from_slice(inputs);

        for op in self.ops.iter() {
            let r = |i: usize| &regs[i];
            match *op {
                Op::Sdiv(a, b) => {
                    let Division {
                        quotient,
                        remainder,
                        is_zero,
                    } = ctx.sdiv(r(a), r(b))?;
                    regs.push(quotient);
                    regs.push(remainder);
                    regs.push(is_zero);
                }
                _ => {
                    let res: Ciphertext = match *op {
                        Op::Add(a, b) => ctx.add(r(a), r(b))?,
                        Op::Sub(a, b) => ctx.sub(r(a), r(b))?,
                        Op::Neg(a) => ctx.neg(r(a))?,
                        Op::AddConst(a, k) => ctx.add_constant(r(a), k)?,
                        Op::MulConst(a, k) => ctx.mul_constant(r(a), k)?,
                        Op::Smull(a, b) => ctx.smull(r(a), r(b))?,
                        Op::Compare(p, a, b) => ctx.compare(r(a), r(b), p)?,
                        Op::Select(c, a, b) => ctx.select(r(c), r(a), r(b))?,
                        Op::Max(a, b) => ctx.max_or_min(r(a), r(b), MinMax::Max)?,
                        Op::Min(a, b) => ctx.max_or_min(r(a), r(b), MinMax::Min)?,
                        Op::Relu(a) => ctx.relu(r(a))?,
                        Op::Abs(a) => ctx.abs(r(a))?,
                        Op::And(a, b) => ctx.and(r(a), r(b))?,
                        Op::Or(a, b) => ctx.or(r(a), r(b))?,
                        Op::Xor(a, b) => ctx.xor(r(a), r(b))?,
                        Op::Not(a) => ctx.not(r(a))?,
                        Op::Lshift(a, b) => ctx.lshift(r(a), r(b))?,
                        Op::Sdiv(..) => unreachable!(),
                    };
                    regs.push(res);
                }
            }
        }

        debug!(program = %self.name, ops = self.ops.len(), "ran program");
        Ok(self.outputs.iter().map(|i| regs[*i].clone()).collect())
    }
}

fn put_u32(buf: &mut Vec<u8>, x: usize) {
    buf.extend_from_slice(&(x as u32).to_le_bytes());
}

/// Built-in programs.
pub mod programs {
    use super::{Op, Program};
    use crate::evaluation::Predicate;

    /// `(balance, amount) -> (balance >= amount ? balance - amount : balance, balance >= amount)`.
    pub fn withdraw_with_check() -> Program {
        Program::new(
            "withdraw_with_check",
            2,
            vec![
                Op::Compare(Predicate::Ge, 0, 1),
                Op::Sub(0, 1),
                Op::Select(2, 3, 0),
            ],
            vec![4, 2],
        )
    }
}
