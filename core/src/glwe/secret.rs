use fhe16_backend::{Barrett, Table};
use fhe16_sampling::Source;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    dist::SecretDistribution,
    lwe::{fill_binary_hw, fill_binary_prob},
};

/// Binary rank-1 GLWE secret `z` of degree N. Its coefficients double as the
/// LWE key of sample-extracted ciphertexts.
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct GlweSecret {
    pub(crate) data: Vec<u8>,
    #[zeroize(skip)]
    pub(crate) dist: SecretDistribution,
}

impl GlweSecret {
    pub fn alloc(n: usize) -> Self {
        Self {
            data: vec![0u8; n],
            dist: SecretDistribution::NONE,
        }
    }

    pub fn n(&self) -> usize {
        self.data.len()
    }

    pub fn dist(&self) -> SecretDistribution {
        self.dist
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn fill_binary_prob(&mut self, prob: f64, source: &mut Source) {
        fill_binary_prob(&mut self.data, prob, source);
        self.dist = SecretDistribution::BinaryProb(prob);
    }

    pub fn fill_binary_hw(&mut self, hw: usize, source: &mut Source) {
        fill_binary_hw(&mut self.data, hw, source);
        self.dist = SecretDistribution::BinaryFixed(hw);
    }

    pub(crate) fn from_raw(data: Vec<u8>, dist: SecretDistribution) -> Option<Self> {
        if data.iter().any(|x| *x > 1) {
            return None;
        }
        Some(Self { data, dist })
    }
}

/// GLWE secret in the NTT domain with Shoup quotients, used for encryption
/// and phase computations.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct GlweSecretPrepared {
    value: Vec<u64>,
    quotient: Vec<u64>,
}

impl GlweSecretPrepared {
    pub fn prepare(table: &Table, sk: &GlweSecret) -> Self {
        assert_eq!(table.n(), sk.n(), "invalid sk.n()={} != table.n()={}", sk.n(), table.n());
        let barrett = table.prime().barrett;
        let mut value: Vec<u64> = sk.data.iter().map(|x| *x as u64).collect();
        table.forward_inplace::<false>(&mut value);
        let quotient: Vec<u64> = value.iter().map(|x| *barrett.prepare(*x).quotient()).collect();
        Self { value, quotient }
    }

    pub fn n(&self) -> usize {
        self.value.len()
    }

    #[inline(always)]
    pub(crate) fn at(&self, i: usize) -> Barrett<u64> {
        Barrett(self.value[i], self.quotient[i])
    }
}
