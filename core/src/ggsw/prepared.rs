use fhe16_backend::{Barrett, SignedDecomposer, Table};

use crate::ggsw::GgswCiphertext;

/// One GGSW row in the NTT domain, each coefficient paired with its Shoup quotient.
pub(crate) struct PreparedRow {
    pub(crate) body: Vec<Barrett<u64>>,
    pub(crate) mask: Vec<Barrett<u64>>,
}

/// GGSW ciphertext ready for external products.
pub struct GgswCiphertextPrepared {
    pub(crate) rows: Vec<PreparedRow>,
    pub(crate) decomposer: SignedDecomposer,
}

impl GgswCiphertextPrepared {
    pub fn prepare(table: &Table, ggsw: &GgswCiphertext) -> Self {
        let barrett = table.prime().barrett;
        let transform = |poly: &[u64]| -> Vec<Barrett<u64>> {
            let mut tmp: Vec<u64> = poly.to_vec();
            table.forward_inplace::<false>(&mut tmp);
            tmp.into_iter().map(|x| barrett.prepare(x)).collect()
        };
        Self {
            rows: ggsw
                .rows
                .iter()
                .map(|row| PreparedRow {
                    body: transform(row.body()),
                    mask: transform(row.mask()),
                })
                .collect(),
            decomposer: ggsw.decomposer,
        }
    }

    pub fn level(&self) -> usize {
        self.decomposer.level()
    }

    #[inline(always)]
    pub(crate) fn row(&self, c: usize, j: usize) -> &PreparedRow {
        &self.rows[c * self.level() + j]
    }
}
