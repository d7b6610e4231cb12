use fhe16_sampling::{RoundedGaussian, Source};
use itertools::izip;
use rand_core::RngCore;

use crate::lwe::LweSecret;

/// LWE ciphertext modulo 2^32 stored as `[b, a_0, ..., a_{n-1}]`, with phase
/// `b + <a, s>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweCiphertext {
    pub(crate) data: Vec<u32>,
}

impl LweCiphertext {
    pub fn alloc(n: usize) -> Self {
        Self { data: vec![0u32; n + 1] }
    }

    /// Noiseless encryption of `body`, valid under every key.
    pub fn trivial(n: usize, body: u32) -> Self {
        let mut ct: LweCiphertext = Self::alloc(n);
        ct.data[0] = body;
        ct
    }

    pub fn from_data(data: Vec<u32>) -> Self {
        debug_assert!(!data.is_empty());
        Self { data }
    }

    pub fn n(&self) -> usize {
        self.data.len() - 1
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    pub fn body(&self) -> u32 {
        self.data[0]
    }

    pub fn mask(&self) -> &[u32] {
        &self.data[1..]
    }

    pub fn add_assign(&mut self, other: &LweCiphertext) {
        debug_assert_eq!(self.data.len(), other.data.len());
        izip!(self.data.iter_mut(), other.data.iter()).for_each(|(a, b)| *a = a.wrapping_add(*b));
    }

    pub fn sub_assign(&mut self, other: &LweCiphertext) {
        debug_assert_eq!(self.data.len(), other.data.len());
        izip!(self.data.iter_mut(), other.data.iter()).for_each(|(a, b)| *a = a.wrapping_sub(*b));
    }

    pub fn neg_assign(&mut self) {
        self.data.iter_mut().for_each(|a| *a = a.wrapping_neg());
    }

    pub fn mul_scalar_assign(&mut self, k: u32) {
        self.data.iter_mut().for_each(|a| *a = a.wrapping_mul(k));
    }

    /// Adds `m` to the plaintext.
    pub fn add_plaintext_assign(&mut self, m: u32) {
        self.data[0] = self.data[0].wrapping_add(m);
    }

    /// Encrypts `pt` under `sk`: `b = pt + e - <a, s>` with a uniform from
    /// `source_xa` and `e` from `noise` over `source_xe`.
    pub fn encrypt_sk(
        &mut self,
        pt: u32,
        sk: &LweSecret,
        source_xa: &mut Source,
        source_xe: &mut Source,
        noise: &RoundedGaussian,
    ) {
        debug_assert_eq!(self.n(), sk.n());
        let (body, mask) = self.data.split_at_mut(1);
        let mut dot: u32 = 0;
        izip!(mask.iter_mut(), sk.data.iter()).for_each(|(a, s)| {
            *a = source_xa.next_u32();
            dot = dot.wrapping_add(a.wrapping_mul(*s as u32));
        });
        body[0] = pt
            .wrapping_add(noise.sample_u32(source_xe))
            .wrapping_sub(dot);
    }

    /// `b + <a, s>` mod 2^32.
    pub fn phase(&self, sk: &LweSecret) -> u32 {
        debug_assert_eq!(self.n(), sk.n());
        izip!(self.mask().iter(), sk.data.iter()).fold(self.body(), |acc, (a, s)| {
            acc.wrapping_add(a.wrapping_mul(*s as u32))
        })
    }
}
