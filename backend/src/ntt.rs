use itertools::izip;

use crate::modulus::{Barrett, FULL, NONE, ONCE, Prime, ReduceOnce, WordOps};

/// Negacyclic number-theoretic transform over Z_q[X]/(X^n + 1).
///
/// Twiddles are the powers of a primitive 2n-th root `psi` stored in
/// bit-reversed order. The forward pass is a Cooley-Tukey (DIT) sweep and the
/// backward pass a Gentleman-Sande (DIF) sweep, both on lazily reduced
/// residues (forward in [0, 4q), backward in [0, 2q)).
pub struct Table {
    prime: Prime,
    psi: u64,
    psi_forward_rev: Vec<Barrett<u64>>,
    psi_backward_rev: Vec<Barrett<u64>>,
    n_inv: Barrett<u64>,
    two_q: u64,
}

impl Table {
    pub fn new(prime: Prime, n: usize) -> Table {
        assert!(n.is_power_of_two(), "invalid argument: n = {} is not a power of two", n);

        let nth_root: u64 = (n as u64) << 1;
        let psi: u64 = prime.primitive_nth_root(nth_root);
        let psi_inv: u64 = prime.inv(psi);

        let mut psi_forward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];
        let mut psi_backward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];

        psi_forward_rev[0] = prime.barrett.prepare(1);
        psi_backward_rev[0] = prime.barrett.prepare(1);

        let log_n: u32 = n.log2();

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 1..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);
            powers_forward = prime.barrett.mul_mod(powers_forward, psi);
            powers_backward = prime.barrett.mul_mod(powers_backward, psi_inv);
            psi_forward_rev[i_rev] = prime.barrett.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.barrett.prepare(powers_backward);
        }

        let q: u64 = prime.q();
        let n_inv: Barrett<u64> = prime.barrett.prepare(prime.inv(n as u64));

        Self {
            prime,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            n_inv,
            two_q: q << 1,
        }
    }

    #[inline(always)]
    pub fn n(&self) -> usize {
        self.psi_forward_rev.len()
    }

    #[inline(always)]
    pub fn prime(&self) -> &Prime {
        &self.prime
    }

    pub fn psi(&self) -> u64 {
        self.psi
    }

    /// In-place forward transform of residues in [0, 4q).
    /// Output is in [0, 4q) if `LAZY` else in [0, q).
    pub fn forward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        debug_assert_eq!(n, self.n(), "invalid a.len()={} != n={}", n, self.n());
        let log_n: u32 = n.log2();

        for layer in 0..log_n {
            let (m, size) = (1usize << layer, 1usize << (log_n - layer - 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| self.dit_inplace(a, b, *psi));
            });
        }

        if !LAZY {
            a.iter_mut()
                .for_each(|x| self.prime.barrett.reduce_assign::<FULL>(x));
        }
    }

    /// In-place backward transform (including the 1/n scaling) of residues in [0, 2q).
    /// Output is in [0, 2q) if `LAZY` else in [0, q).
    pub fn backward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        debug_assert_eq!(n, self.n(), "invalid a.len()={} != n={}", n, self.n());
        let log_n: u32 = n.log2();

        for layer in (0..log_n).rev() {
            let (m, size) = (1usize << layer, 1usize << (log_n - layer - 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
            });
        }

        if LAZY {
            a.iter_mut()
                .for_each(|x| self.prime.barrett.mul_external_assign::<NONE>(self.n_inv, x));
        } else {
            a.iter_mut()
                .for_each(|x| self.prime.barrett.mul_external_assign::<ONCE>(self.n_inv, x));
        }
    }

    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, t: Barrett<u64>) {
        debug_assert!(*a < 2 * self.two_q, "a:{} 4q:{}", a, 2 * self.two_q);
        debug_assert!(*b < 2 * self.two_q, "b:{} 4q:{}", b, 2 * self.two_q);
        a.reduce_once_assign(self.two_q);
        let bt: u64 = self.prime.barrett.mul_external::<NONE>(t, *b);
        *b = *a + self.two_q - bt;
        *a += bt;
    }

    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, t: Barrett<u64>) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self.prime.barrett.mul_external::<NONE>(t, *a + self.two_q - *b);
        *a += *b;
        a.reduce_once_assign(self.two_q);
        *b = d;
    }
}
