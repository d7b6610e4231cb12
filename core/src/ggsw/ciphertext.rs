use fhe16_backend::{SignedDecomposer, Table};
use fhe16_sampling::{RoundedGaussian, Source};

use crate::{
    glwe::{GlweCiphertext, GlweSecretPrepared},
    serialization::{ReaderFrom, WriterTo},
};

/// GGSW ciphertext of a small integer `m` under a rank-1 GLWE key, made of
/// `2 * level` GLWE rows. Row `(c, j)` is an encryption of zero with
/// `m * g_j` added to its component `c`, where `g_j = round(Q / 2^(base_log * (j+1)))`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GgswCiphertext {
    pub(crate) rows: Vec<GlweCiphertext>,
    pub(crate) decomposer: SignedDecomposer,
}

impl GgswCiphertext {
    pub fn alloc(n: usize, decomposer: SignedDecomposer) -> Self {
        Self {
            rows: (0..2 * decomposer.level()).map(|_| GlweCiphertext::alloc(n)).collect(),
            decomposer,
        }
    }

    pub fn n(&self) -> usize {
        self.rows[0].n()
    }

    pub fn level(&self) -> usize {
        self.decomposer.level()
    }

    pub fn row(&self, c: usize, j: usize) -> &GlweCiphertext {
        &self.rows[c * self.level() + j]
    }

    pub fn encrypt_sk(
        &mut self,
        m: u64,
        table: &Table,
        sk: &GlweSecretPrepared,
        source_xa: &mut Source,
        source_xe: &mut Source,
        noise: &RoundedGaussian,
    ) {
        let barrett = table.prime().barrett;
        let q: u64 = barrett.q;
        let level: usize = self.level();
        let decomposer: SignedDecomposer = self.decomposer;
        self.rows.iter_mut().enumerate().for_each(|(r, row)| {
            let (c, j) = (r / level, r % level);
            row.encrypt_zero_sk(table, sk, source_xa, source_xe, noise);
            let g: u64 = decomposer.gadget(q as u128, j) as u64;
            let coeff: &mut u64 = &mut row.at_mut(c)[0];
            *coeff = barrett.add_mod(*coeff, barrett.mul_mod(m % q, g));
        });
    }
}

impl WriterTo for GgswCiphertext {
    fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.rows.iter().try_for_each(|row| row.write_to(writer))
    }
}

impl ReaderFrom for GgswCiphertext {
    fn read_from<R: std::io::Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        self.rows.iter_mut().try_for_each(|row| row.read_from(reader))
    }
}
