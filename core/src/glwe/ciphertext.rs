use fhe16_backend::{Table, modulus::ONCE, poly};
use fhe16_sampling::{RoundedGaussian, Source};
use itertools::izip;

use crate::{
    glwe::GlweSecretPrepared,
    serialization::{ReaderFrom, WriterTo, read_u64_slice, write_u64_slice},
};

/// Rank-1 GLWE ciphertext `(b, a)` over Z_Q[X]/(X^N + 1), with phase `b + a * z`.
/// Coefficients are kept in [0, Q).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlweCiphertext {
    pub(crate) body: Vec<u64>,
    pub(crate) mask: Vec<u64>,
}

impl GlweCiphertext {
    pub fn alloc(n: usize) -> Self {
        Self {
            body: vec![0u64; n],
            mask: vec![0u64; n],
        }
    }

    pub fn n(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &[u64] {
        &self.body
    }

    pub fn mask(&self) -> &[u64] {
        &self.mask
    }

    /// Component `i`, 0 for the body and 1 for the mask.
    pub(crate) fn at(&self, i: usize) -> &[u64] {
        match i {
            0 => &self.body,
            _ => &self.mask,
        }
    }

    pub(crate) fn at_mut(&mut self, i: usize) -> &mut [u64] {
        match i {
            0 => &mut self.body,
            _ => &mut self.mask,
        }
    }

    pub fn zero(&mut self) {
        self.body.fill(0);
        self.mask.fill(0);
    }

    /// Encrypts zero: `a` uniform, `b = e - a * z`.
    pub fn encrypt_zero_sk(
        &mut self,
        table: &Table,
        sk: &GlweSecretPrepared,
        source_xa: &mut Source,
        source_xe: &mut Source,
        noise: &RoundedGaussian,
    ) {
        let n: usize = self.n();
        debug_assert_eq!(table.n(), n);
        debug_assert_eq!(sk.n(), n);
        let barrett = table.prime().barrett;
        let q: u64 = barrett.q;
        let mask_bits: u64 = q.next_power_of_two() - 1;

        self.mask
            .iter_mut()
            .for_each(|a| *a = source_xa.next_u64n(q, mask_bits));

        let mut az: Vec<u64> = self.mask.clone();
        table.forward_inplace::<false>(&mut az);
        az.iter_mut()
            .enumerate()
            .for_each(|(i, x)| barrett.mul_external_assign::<ONCE>(sk.at(i), x));
        table.backward_inplace::<false>(&mut az);

        izip!(self.body.iter_mut(), az.iter()).for_each(|(b, az)| {
            *b = barrett.sub_mod(noise.sample_mod(source_xe, q), *az);
        });
    }

    /// `b + a * z` mod Q.
    pub fn phase(&self, table: &Table, sk: &GlweSecretPrepared) -> Vec<u64> {
        let barrett = table.prime().barrett;
        let mut res: Vec<u64> = self.mask.clone();
        table.forward_inplace::<false>(&mut res);
        res.iter_mut()
            .enumerate()
            .for_each(|(i, x)| barrett.mul_external_assign::<ONCE>(sk.at(i), x));
        table.backward_inplace::<false>(&mut res);
        poly::add_assign(barrett.q, &mut res, &self.body);
        res
    }

    /// Extracts the constant coefficient as an LWE ciphertext under the
    /// coefficients of `z`, switched from Q to 2^32: `res = [b_0, a_0, -a_{N-1}, ..., -a_1]`.
    pub fn sample_extract_torus32(&self, q: u64, res: &mut [u32]) {
        let n: usize = self.n();
        debug_assert_eq!(res.len(), n + 1);
        let switch = |x: u64| -> u32 { ((((x as u128) << 32) + (q as u128 >> 1)) / q as u128) as u32 };
        res[0] = switch(self.body[0]);
        res[1] = switch(self.mask[0]);
        (1..n).for_each(|i| {
            res[n + 1 - i] = switch(self.mask[i]).wrapping_neg();
        });
    }
}

impl WriterTo for GlweCiphertext {
    fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_u64_slice(writer, &self.body)?;
        write_u64_slice(writer, &self.mask)
    }
}

impl ReaderFrom for GlweCiphertext {
    fn read_from<R: std::io::Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        read_u64_slice(reader, &mut self.body)?;
        read_u64_slice(reader, &mut self.mask)
    }
}
