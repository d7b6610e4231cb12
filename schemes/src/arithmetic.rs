//! Linear operations. They never bootstrap and never need boot parameters;
//! they only widen the digit range and accumulate noise, see
//! [`Ciphertext::within_capacity`].

use fhe16_core::{Error, Result, lwe::LweCiphertext};
use itertools::izip;

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
};

impl Ciphertext {
    pub(crate) fn add(&self, other: &Ciphertext) -> Ciphertext {
        let digits: Vec<LweCiphertext> = izip!(self.digits.iter(), other.digits.iter())
            .map(|(a, b)| {
                let mut d: LweCiphertext = a.clone();
                d.add_assign(b);
                d
            })
            .collect();
        Ciphertext::from_digits(
            self,
            CiphertextKind::Int,
            self.lo.saturating_add(other.lo),
            self.hi.saturating_add(other.hi),
            self.noise.saturating_add(other.noise),
            digits,
        )
    }

    pub(crate) fn neg(&self) -> Ciphertext {
        let digits: Vec<LweCiphertext> = self
            .digits
            .iter()
            .map(|a| {
                let mut d: LweCiphertext = a.clone();
                d.neg_assign();
                d
            })
            .collect();
        Ciphertext::from_digits(
            self,
            CiphertextKind::Int,
            self.hi.saturating_neg(),
            self.lo.saturating_neg(),
            self.noise,
            digits,
        )
    }

    /// `a * 2^k` by moving digits up, `k < W`.
    pub(crate) fn shl_static(&self, k: usize) -> Ciphertext {
        let n: usize = self.digits[0].n();
        let digits: Vec<LweCiphertext> = (0..k)
            .map(|_| LweCiphertext::alloc(n))
            .chain(self.digits[..self.width() - k].iter().cloned())
            .collect();
        Ciphertext::from_digits(self, CiphertextKind::Int, self.lo, self.hi, self.noise, digits)
    }

    /// Trivial zero with the shape of `self`.
    pub(crate) fn zero_like(&self) -> Ciphertext {
        let n: usize = self.digits[0].n();
        let digits: Vec<LweCiphertext> = (0..self.width()).map(|_| LweCiphertext::alloc(n)).collect();
        Ciphertext::from_digits(self, CiphertextKind::Int, 0, 0, 0, digits)
    }
}

/// Non-adjacent form of `k`, least significant digit first, digits in {-1, 0, 1}.
pub(crate) fn naf(k: u64) -> Vec<i8> {
    let mut k: i128 = k as i128;
    let mut res: Vec<i8> = Vec::new();
    while k != 0 {
        if k & 1 == 1 {
            let z: i128 = 2 - (k & 3);
            res.push(z as i8);
            k -= z;
        } else {
            res.push(0);
        }
        k >>= 1;
    }
    res
}

impl CryptoContext {
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.check_compatible(&[a, b])?;
        Ok(a.add(b))
    }

    pub fn add3(&self, a: &Ciphertext, b: &Ciphertext, c: &Ciphertext) -> Result<Ciphertext> {
        self.check_compatible(&[a, b, c])?;
        let digits: Vec<LweCiphertext> = izip!(a.digits.iter(), b.digits.iter(), c.digits.iter())
            .map(|(x, y, z)| {
                let mut d: LweCiphertext = x.clone();
                d.add_assign(y);
                d.add_assign(z);
                d
            })
            .collect();
        Ok(Ciphertext::from_digits(
            a,
            CiphertextKind::Int,
            a.lo.saturating_add(b.lo).saturating_add(c.lo),
            a.hi.saturating_add(b.hi).saturating_add(c.hi),
            a.noise.saturating_add(b.noise).saturating_add(c.noise),
            digits,
        ))
    }

    pub fn neg(&self, a: &Ciphertext) -> Result<Ciphertext> {
        self.check_compatible(&[a])?;
        Ok(a.neg())
    }

    /// `add(a, neg(b))`.
    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.add(a, &self.neg(b)?)
    }

    /// `a + k mod 2^W`, adding the bits of `k` to the digits.
    pub fn add_constant(&self, a: &Ciphertext, k: i32) -> Result<Ciphertext> {
        self.check_compatible(&[a])?;
        let delta: u32 = self.params().delta();
        let bits: u64 = k as u32 as u64 & self.width_mask();
        let digits: Vec<LweCiphertext> = a
            .digits
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut d: LweCiphertext = d.clone();
                d.add_plaintext_assign(((bits >> i) & 1) as u32 * delta);
                d
            })
            .collect();
        let hi: i32 = if bits != 0 { a.hi.saturating_add(1) } else { a.hi };
        Ok(Ciphertext::from_digits(a, CiphertextKind::Int, a.lo, hi, a.noise, digits))
    }

    /// `a * k mod 2^W` by shift-and-add over the non-adjacent form of `k`.
    pub fn mul_constant(&self, a: &Ciphertext, k: i32) -> Result<Ciphertext> {
        self.check_compatible(&[a])?;
        let width: usize = a.width();
        let mut acc: Option<Ciphertext> = None;
        naf(k as u32 as u64 & self.width_mask())
            .iter()
            .enumerate()
            .filter(|(j, z)| **z != 0 && *j < width)
            .for_each(|(j, z)| {
                let mut term: Ciphertext = a.shl_static(j);
                if *z < 0 {
                    term = term.neg();
                }
                acc = Some(match acc.take() {
                    Some(sum) => sum.add(&term),
                    None => term,
                });
            });
        Ok(acc.unwrap_or_else(|| a.zero_like()))
    }

    /// `a + 2^p mod 2^W`. Powers at or above W leave `a` unchanged.
    pub fn add_pow2(&self, a: &Ciphertext, p: usize) -> Result<Ciphertext> {
        self.add_signed_pow2(a, p, 1)
    }

    /// `a - 2^p mod 2^W`.
    pub fn sub_pow2(&self, a: &Ciphertext, p: usize) -> Result<Ciphertext> {
        self.add_signed_pow2(a, p, -1)
    }

    fn add_signed_pow2(&self, a: &Ciphertext, p: usize, sign: i32) -> Result<Ciphertext> {
        self.check_compatible(&[a])?;
        let mut res: Ciphertext = Ciphertext::from_digits(a, CiphertextKind::Int, a.lo, a.hi, a.noise, a.digits.clone());
        if p >= a.width() {
            return Ok(res);
        }
        res.digits[p].add_plaintext_assign((sign as u32).wrapping_mul(self.params().delta()));
        if sign > 0 {
            res.hi = res.hi.saturating_add(1);
        } else {
            res.lo = res.lo.saturating_sub(1);
        }
        Ok(res)
    }

    /// Boolean complement of a flag, without bootstrapping.
    pub fn not(&self, a: &Ciphertext) -> Result<Ciphertext> {
        self.check_compatible(&[a])?;
        if !a.is_flag() {
            return Err(Error::KindMismatch {
                expected: CiphertextKind::Flag.name(),
                found: a.kind.name(),
            });
        }
        let mut digits: Vec<LweCiphertext> = a.digits.clone();
        digits[0].neg_assign();
        digits[0].add_plaintext_assign(self.params().delta());
        Ok(Ciphertext::from_digits(a, CiphertextKind::Flag, a.lo, a.hi, a.noise, digits))
    }

    pub fn add_vec(&self, a: &[Ciphertext], b: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        check_lengths(a, b)?;
        izip!(a.iter(), b.iter()).map(|(a, b)| self.add(a, b)).collect()
    }

    pub fn sub_vec(&self, a: &[Ciphertext], b: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        check_lengths(a, b)?;
        izip!(a.iter(), b.iter()).map(|(a, b)| self.sub(a, b)).collect()
    }

    pub fn neg_vec(&self, a: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        a.iter().map(|a| self.neg(a)).collect()
    }

    pub fn add_constant_vec(&self, a: &[Ciphertext], k: &[i32]) -> Result<Vec<Ciphertext>> {
        check_lengths(a, k)?;
        izip!(a.iter(), k.iter()).map(|(a, k)| self.add_constant(a, *k)).collect()
    }

    pub fn mul_constant_vec(&self, a: &[Ciphertext], k: &[i32]) -> Result<Vec<Ciphertext>> {
        check_lengths(a, k)?;
        izip!(a.iter(), k.iter()).map(|(a, k)| self.mul_constant(a, *k)).collect()
    }

    fn width_mask(&self) -> u64 {
        (1u64 << self.params().width) - 1
    }
}

fn check_lengths<A, B>(a: &[A], b: &[B]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}
