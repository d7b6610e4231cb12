pub type REDUCEMOD = u8;

/// No reduction.
pub const NONE: REDUCEMOD = 0;
/// Conditional subtraction of q.
pub const ONCE: REDUCEMOD = 1;
/// Conditional subtraction of 2q.
pub const TWICE: REDUCEMOD = 2;
/// Conditional subtraction of 2q then q.
pub const FULL: REDUCEMOD = 3;

pub trait ReduceOnce {
    fn reduce_once_assign(&mut self, q: Self);
    fn reduce_once(&self, q: Self) -> Self;
}

impl ReduceOnce for u64 {
    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        if *self >= q {
            *self -= q
        }
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        if *self >= q { *self - q } else { *self }
    }
}

pub trait WordOps {
    fn log2(self) -> u32;
    fn reverse_bits_msb(self, n: u32) -> Self;
}

impl WordOps for usize {
    #[inline(always)]
    fn log2(self) -> u32 {
        usize::BITS - 1 - self.leading_zeros()
    }

    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (usize::BITS - n)
    }
}

impl WordOps for u64 {
    #[inline(always)]
    fn log2(self) -> u32 {
        u64::BITS - 1 - self.leading_zeros()
    }

    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (u64::BITS - n)
    }
}

/// Constant multiplicand with its Shoup quotient `floor(value * 2^64 / q)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Barrett<O>(pub O, pub O);

impl<O> Barrett<O> {
    #[inline(always)]
    pub fn value(&self) -> &O {
        &self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> &O {
        &self.1
    }
}

/// Precomputed multiples of a modulus `q < 2^62` for lazy reductions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp {
    pub q: u64,
    pub two_q: u64,
    pub four_q: u64,
}

impl BarrettPrecomp {
    pub fn new(q: u64) -> BarrettPrecomp {
        assert!(q > 1 && q < (1 << 62), "invalid modulus: q={} must be in (1, 2^62)", q);
        Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
        }
    }

    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => x.reduce_once_assign(self.two_q),
            FULL => {
                x.reduce_once_assign(self.two_q);
                x.reduce_once_assign(self.q);
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: u64) -> u64 {
        let mut r: u64 = x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Barrett(v, quotient)
    }

    /// Returns `lhs * rhs` in [0, 2q) for any `rhs < 2^64`, reduced further by `REDUCE`.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: &mut u64) {
        let t: u64 = ((*lhs.quotient() as u128 * *rhs as u128) >> 64) as _;
        *rhs = (rhs.wrapping_mul(*lhs.value())).wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(rhs);
    }

    /// Full modular product of two residues, used off the hot path.
    #[inline]
    pub fn mul_mod(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.q as u128) as u64
    }

    #[inline(always)]
    pub fn add_mod(&self, a: u64, b: u64) -> u64 {
        (a + b).reduce_once(self.q)
    }

    #[inline(always)]
    pub fn sub_mod(&self, a: u64, b: u64) -> u64 {
        (a + self.q - b).reduce_once(self.q)
    }

    #[inline(always)]
    pub fn neg_mod(&self, a: u64) -> u64 {
        (self.q - a).reduce_once(self.q)
    }

    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut base: u64 = x % self.q;
        let mut e: u64 = exponent;
        let mut r: u64 = 1;
        while e > 0 {
            if e & 1 == 1 {
                r = self.mul_mod(r, base);
            }
            base = self.mul_mod(base, base);
            e >>= 1;
        }
        r
    }
}

/// Prime modulus supporting negacyclic NTTs of power-of-two degree.
#[derive(Clone, Copy, Debug)]
pub struct Prime {
    pub barrett: BarrettPrecomp,
}

impl Prime {
    pub fn new(q: u64) -> Prime {
        Self {
            barrett: BarrettPrecomp::new(q),
        }
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.barrett.q
    }

    /// Inverse by Fermat's little theorem.
    pub fn inv(&self, x: u64) -> u64 {
        self.barrett.pow(x, self.q() - 2)
    }

    /// Largest power of two dividing q - 1.
    pub fn two_adicity(&self) -> u32 {
        (self.q() - 1).trailing_zeros()
    }

    pub fn supports_nth_root(&self, nth_root: u64) -> bool {
        nth_root.is_power_of_two() && nth_root.trailing_zeros() <= self.two_adicity()
    }

    /// Returns a primitive `nth_root`-th root of unity, `nth_root` a power of two dividing q - 1.
    pub fn primitive_nth_root(&self, nth_root: u64) -> u64 {
        assert!(
            self.supports_nth_root(nth_root),
            "invalid argument: nth_root = {} does not divide q-1 = {}",
            nth_root,
            self.q() - 1
        );
        let q: u64 = self.q();
        let half: u64 = (q - 1) >> 1;
        let mut g: u64 = 2;
        while self.barrett.pow(g, half) != q - 1 {
            g += 1;
        }
        self.barrett.pow(g, (q - 1) / nth_root)
    }
}
