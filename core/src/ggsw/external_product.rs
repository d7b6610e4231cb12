use fhe16_backend::{
    Table,
    modulus::{NONE, ReduceOnce},
};
use itertools::izip;

use crate::{ggsw::GgswCiphertextPrepared, glwe::GlweCiphertext};

/// Buffers reused across external products of degree `n` and `level` digits.
pub struct ExternalProductScratch {
    digits: Vec<i64>,
    decomposed: Vec<Vec<u64>>,
}

impl ExternalProductScratch {
    pub fn alloc(n: usize, level: usize) -> Self {
        Self {
            digits: vec![0i64; level],
            decomposed: (0..level).map(|_| vec![0u64; n]).collect(),
        }
    }
}

impl GlweCiphertext {
    /// Sets `self = lhs ⊡ rhs`: each component of `lhs` is gadget-decomposed,
    /// every digit polynomial is multiplied in the NTT domain with the
    /// matching row of `rhs` and the products are summed.
    pub fn external_product(
        &mut self,
        table: &Table,
        lhs: &GlweCiphertext,
        rhs: &GgswCiphertextPrepared,
        scratch: &mut ExternalProductScratch,
    ) {
        let n: usize = lhs.n();
        debug_assert_eq!(self.n(), n);
        debug_assert_eq!(table.n(), n);
        debug_assert_eq!(scratch.decomposed.len(), rhs.level());

        let barrett = table.prime().barrett;
        let q: u64 = barrett.q;
        let two_q: u64 = barrett.two_q;
        let decomposer = rhs.decomposer;

        self.zero();

        for c in 0..2 {
            let digits: &mut [i64] = &mut scratch.digits;
            let decomposed: &mut [Vec<u64>] = &mut scratch.decomposed;

            lhs.at(c).iter().enumerate().for_each(|(i, x)| {
                decomposer.decompose(*x, digits);
                izip!(decomposed.iter_mut(), digits.iter())
                    .for_each(|(poly, d)| poly[i] = if *d < 0 { q - d.unsigned_abs() } else { *d as u64 });
            });

            for (j, poly) in decomposed.iter_mut().enumerate() {
                table.forward_inplace::<true>(poly);
                let row = rhs.row(c, j);
                izip!(self.body.iter_mut(), row.body.iter(), poly.iter())
                    .for_each(|(acc, k, x)| *acc = (*acc + barrett.mul_external::<NONE>(*k, *x)).reduce_once(two_q));
                izip!(self.mask.iter_mut(), row.mask.iter(), poly.iter())
                    .for_each(|(acc, k, x)| *acc = (*acc + barrett.mul_external::<NONE>(*k, *x)).reduce_once(two_q));
            }
        }

        table.backward_inplace::<false>(&mut self.body);
        table.backward_inplace::<false>(&mut self.mask);
    }
}
