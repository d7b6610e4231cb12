use fhe16_sampling::Source;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::dist::SecretDistribution;

/// Binary LWE secret of dimension n, the key the ciphertexts at rest are encrypted under.
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct LweSecret {
    pub(crate) data: Vec<u8>,
    #[zeroize(skip)]
    pub(crate) dist: SecretDistribution,
}

impl LweSecret {
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

    /// Restores a key from raw coefficients, each of which must be 0 or 1.
    pub(crate) fn from_raw(data: Vec<u8>, dist: SecretDistribution) -> Option<Self> {
        if data.iter().any(|x| *x > 1) {
            return None;
        }
        Some(Self { data, dist })
    }
}

pub(crate) fn fill_binary_prob(data: &mut [u8], prob: f64, source: &mut Source) {
    data.iter_mut().for_each(|x| *x = (source.next_f64(0.0, 1.0) < prob) as u8);
}

/// Exactly `hw` ones at uniform positions (partial Fisher-Yates).
pub(crate) fn fill_binary_hw(data: &mut [u8], hw: usize, source: &mut Source) {
    let n: usize = data.len();
    assert!(hw <= n, "invalid hamming weight: hw={} > n={}", hw, n);
    let mut idx: Vec<usize> = (0..n).collect();
    let mask: u64 = (n as u64).next_power_of_two() - 1;
    (0..hw).for_each(|i| {
        let j: usize = i + source.next_u64n((n - i) as u64, mask) as usize;
        idx.swap(i, j);
    });
    data.fill(0);
    idx[..hw].iter().for_each(|i| data[*i] = 1);
}
