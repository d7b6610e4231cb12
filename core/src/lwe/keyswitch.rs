use fhe16_backend::SignedDecomposer;
use fhe16_sampling::{RoundedGaussian, Source};
use itertools::izip;

use crate::{
    lwe::{LweCiphertext, LweSecret},
    serialization::{ReaderFrom, WriterTo, read_u32_slice, write_u32_slice},
};

/// Key-switching key from an `n_in`-dimensional binary key to an LWE key of
/// dimension `n_out`, modulo 2^32.
///
/// Row `(j, k)` encrypts `s_in[j] * 2^(32 - base_log * (k+1))` under the output key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweKeySwitchKey {
    pub(crate) data: Vec<u32>,
    n_in: usize,
    n_out: usize,
    decomposer: SignedDecomposer,
}

impl LweKeySwitchKey {
    pub fn alloc(n_in: usize, n_out: usize, decomposer: SignedDecomposer) -> Self {
        Self {
            data: vec![0u32; n_in * decomposer.level() * (n_out + 1)],
            n_in,
            n_out,
            decomposer,
        }
    }

    pub fn n_in(&self) -> usize {
        self.n_in
    }

    pub fn n_out(&self) -> usize {
        self.n_out
    }

    pub fn level(&self) -> usize {
        self.decomposer.level()
    }

    fn row(&self, j: usize, k: usize) -> &[u32] {
        let size: usize = self.n_out + 1;
        let start: usize = (j * self.level() + k) * size;
        &self.data[start..start + size]
    }

    pub fn encrypt_sk(
        &mut self,
        sk_in: &[u8],
        sk_out: &LweSecret,
        source_xa: &mut Source,
        source_xe: &mut Source,
        noise: &RoundedGaussian,
    ) {
        assert_eq!(sk_in.len(), self.n_in, "invalid sk_in.len()={} != n_in={}", sk_in.len(), self.n_in);
        assert_eq!(sk_out.n(), self.n_out, "invalid sk_out.n()={} != n_out={}", sk_out.n(), self.n_out);

        let size: usize = self.n_out + 1;
        let level: usize = self.level();
        let gadgets: Vec<u32> = (0..level)
            .map(|k| self.decomposer.gadget(1u128 << 32, k) as u32)
            .collect();

        let mut row: LweCiphertext = LweCiphertext::alloc(self.n_out);
        self.data
            .chunks_exact_mut(size * level)
            .zip(sk_in.iter())
            .for_each(|(rows, s)| {
                izip!(rows.chunks_exact_mut(size), gadgets.iter()).for_each(|(dst, g)| {
                    row.encrypt_sk(
                        (*s as u32).wrapping_mul(*g),
                        sk_out,
                        source_xa,
                        source_xe,
                        noise,
                    );
                    dst.copy_from_slice(row.data());
                });
            });
    }

    /// Switches `input = [b, a_0, ..., a_{n_in-1}]` to the output key.
    pub fn keyswitch(&self, input: &[u32], res: &mut LweCiphertext) {
        debug_assert_eq!(input.len(), self.n_in + 1);
        debug_assert_eq!(res.n(), self.n_out);

        res.data.fill(0);
        res.data[0] = input[0];

        let mut digits: Vec<i64> = vec![0i64; self.level()];
        input[1..].iter().enumerate().for_each(|(j, a)| {
            self.decomposer.decompose(*a as u64, &mut digits);
            digits.iter().enumerate().for_each(|(k, d)| {
                if *d == 0 {
                    return;
                }
                let d: u32 = *d as u32;
                izip!(res.data.iter_mut(), self.row(j, k).iter())
                    .for_each(|(r, x)| *r = r.wrapping_add(d.wrapping_mul(*x)));
            });
        });
    }
}

impl WriterTo for LweKeySwitchKey {
    fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_u32_slice(writer, &self.data)
    }
}

impl ReaderFrom for LweKeySwitchKey {
    fn read_from<R: std::io::Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        read_u32_slice(reader, &mut self.data)
    }
}
