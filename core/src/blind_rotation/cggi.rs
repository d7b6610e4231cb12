use fhe16_backend::{Table, poly};

use crate::{
    blind_rotation::{BlindRotationKeyCGGIPrepared, LookUpTable},
    ggsw::ExternalProductScratch,
    glwe::GlweCiphertext,
    lwe::LweCiphertext,
};

/// `round(x * 2n / 2^32) mod 2n` for `two_n` a power of two.
#[inline(always)]
pub fn mod_switch_2n(x: u32, two_n: usize) -> usize {
    let shift: u32 = 32 - two_n.trailing_zeros();
    (((x as u64) + (1u64 << (shift - 1))) >> shift) as usize & (two_n - 1)
}

pub struct BlindRotationScratch {
    tmp: GlweCiphertext,
    external_product: ExternalProductScratch,
}

impl BlindRotationScratch {
    pub fn alloc(n: usize, level: usize) -> Self {
        Self {
            tmp: GlweCiphertext::alloc(n),
            external_product: ExternalProductScratch::alloc(n, level),
        }
    }
}

/// Sets `res` to an encryption of `X^{-phase(lwe)} * lut`, where the phase is
/// mod-switched to 2N. Starts from the trivial `X^{-b} * lut` and, for each key
/// coefficient with a non-zero mask, applies the CMux
/// `res += (X^{-a_i} - 1) * (brk_i ⊡ res)`.
pub fn cggi_blind_rotate(
    table: &Table,
    res: &mut GlweCiphertext,
    lwe: &LweCiphertext,
    lut: &LookUpTable,
    brk: &BlindRotationKeyCGGIPrepared,
    scratch: &mut BlindRotationScratch,
) {
    let n: usize = res.n();
    debug_assert_eq!(lut.n(), n);
    debug_assert_eq!(brk.n_lwe(), lwe.n());

    let q: u64 = table.prime().q();
    let two_n: usize = n << 1;

    res.mask.fill(0);
    poly::negacyclic_rotate_inv(q, mod_switch_2n(lwe.body(), two_n), &lut.data, &mut res.body);

    lwe.mask().iter().zip(brk.keys.iter()).for_each(|(a, key)| {
        let a: usize = mod_switch_2n(*a, two_n);
        if a == 0 {
            return;
        }
        let BlindRotationScratch { tmp, external_product } = &mut *scratch;
        tmp.external_product(table, res, key, external_product);
        poly::add_monomial_minus_one_product(q, a, &tmp.body, &mut res.body);
        poly::add_monomial_minus_one_product(q, a, &tmp.mask, &mut res.mask);
    });
}
