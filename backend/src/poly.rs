use itertools::izip;

use crate::modulus::ReduceOnce;

/// Sets `res = X^k * a` in Z_q[X]/(X^n + 1), `k` taken modulo 2n.
pub fn negacyclic_rotate(q: u64, k: usize, a: &[u64], res: &mut [u64]) {
    let n: usize = a.len();
    debug_assert_eq!(res.len(), n);
    let two_n: usize = n << 1;
    let k: usize = k & (two_n - 1);
    a.iter().enumerate().for_each(|(i, x)| {
        let j: usize = (i + k) & (two_n - 1);
        if j < n {
            res[j] = *x;
        } else {
            res[j - n] = (q - *x).reduce_once(q);
        }
    });
}

/// Sets `res = X^{-k} * a` in Z_q[X]/(X^n + 1).
#[inline]
pub fn negacyclic_rotate_inv(q: u64, k: usize, a: &[u64], res: &mut [u64]) {
    let two_n: usize = a.len() << 1;
    negacyclic_rotate(q, (two_n - (k & (two_n - 1))) & (two_n - 1), a, res)
}

/// `a += X^{-k} * b - b` over residues in [0, q).
pub fn add_monomial_minus_one_product(q: u64, k: usize, b: &[u64], a: &mut [u64]) {
    let n: usize = b.len();
    let two_n: usize = n << 1;
    let shift: usize = (two_n - (k & (two_n - 1))) & (two_n - 1);
    if shift == 0 {
        return;
    }
    b.iter().enumerate().for_each(|(i, x)| {
        let j: usize = (i + shift) & (two_n - 1);
        let (idx, rotated) = if j < n { (j, *x) } else { (j - n, (q - *x).reduce_once(q)) };
        a[idx] = (a[idx] + rotated).reduce_once(q);
    });
    izip!(a.iter_mut(), b.iter()).for_each(|(a, b)| *a = (*a + q - *b).reduce_once(q));
}

pub fn add_assign(q: u64, a: &mut [u64], b: &[u64]) {
    izip!(a.iter_mut(), b.iter()).for_each(|(a, b)| *a = (*a + *b).reduce_once(q));
}

pub fn sub_assign(q: u64, a: &mut [u64], b: &[u64]) {
    izip!(a.iter_mut(), b.iter()).for_each(|(a, b)| *a = (*a + q - *b).reduce_once(q));
}

/// Schoolbook negacyclic product, reference for tests and key generation checks.
pub fn negacyclic_mul_naive(q: u64, a: &[u64], b: &[u64]) -> Vec<u64> {
    let n: usize = a.len();
    let mut res: Vec<u128> = vec![0; n];
    let q128: u128 = q as u128;
    (0..n).for_each(|i| {
        if a[i] == 0 {
            return;
        }
        (0..n).for_each(|j| {
            let prod: u128 = (a[i] as u128 * b[j] as u128) % q128;
            let k: usize = i + j;
            if k < n {
                res[k] = (res[k] + prod) % q128;
            } else {
                res[k - n] = (res[k - n] + q128 - prod) % q128;
            }
        });
    });
    res.into_iter().map(|x| x as u64).collect()
}
