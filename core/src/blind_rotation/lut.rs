use fhe16_backend::poly::negacyclic_rotate_inv;

/// Test polynomial of a programmable bootstrap, coefficients in [0, Q).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookUpTable {
    pub(crate) data: Vec<u64>,
}

impl LookUpTable {
    /// Table of `f` over the message domain `[0, 2^(message_bits - 1))`.
    /// `f(m)` is a signed number of steps of `2^(32 - message_bits)`.
    pub fn from_fn<F: Fn(u64) -> i64>(n: usize, message_bits: u32, q: u64, f: F) -> Self {
        let delta: u32 = 1u32 << (32 - message_bits);
        let values: Vec<u32> = (0..1u64 << (message_bits - 1))
            .map(|m| (f(m) as u32).wrapping_mul(delta))
            .collect();
        Self::from_torus32(n, q, &values)
    }

    /// Spreads each torus value evenly over the `n` coefficients, then rotates
    /// by half a step so that each value is centered on its message.
    pub fn from_torus32(n: usize, q: u64, values: &[u32]) -> Self {
        let f_len: usize = values.len();
        assert!(
            f_len > 0 && f_len <= n,
            "invalid lookup table: {} values for degree {}",
            f_len,
            n
        );

        let mut full: Vec<u64> = vec![0u64; n];
        values.iter().enumerate().for_each(|(i, v)| {
            let start: usize = (i * n).div_round(f_len);
            let end: usize = ((i + 1) * n).div_round(f_len);
            full[start..end].fill(torus32_to_modq(*v, q));
        });

        // Rotates half the step to the left
        let half_step: usize = n.div_round(f_len << 1);
        let mut data: Vec<u64> = vec![0u64; n];
        negacyclic_rotate_inv(q, half_step, &full, &mut data);
        Self { data }
    }

    /// Table returning the same torus value on every input. Inputs in the
    /// negacyclic half of the domain return its negation, which makes this
    /// the sign-extraction table.
    pub fn constant(n: usize, q: u64, value: u32) -> Self {
        Self {
            data: vec![torus32_to_modq(value, q); n],
        }
    }

    pub fn n(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u64] {
        &self.data
    }
}

/// `round(w * Q / 2^32)`.
#[inline(always)]
pub fn torus32_to_modq(w: u32, q: u64) -> u64 {
    ((w as u128 * q as u128 + (1u128 << 31)) >> 32) as u64
}

pub(crate) trait DivRound {
    fn div_round(self, rhs: Self) -> Self;
}

impl DivRound for usize {
    #[inline]
    fn div_round(self, rhs: Self) -> Self {
        (self + rhs / 2) / rhs
    }
}
