use crate::evaluation::Predicate;

/// Lookup tables registered by every context. Each table maps a digit
/// message in `[0, 2^(B-1))` to a signed number of `delta` steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum LutId {
    /// Constant `delta / 2`, used for bit extraction.
    Sign,
    /// `4c + 2a + b` to `c ? a : b`.
    Select,
    /// `3h + l + 4`, with `h, l` in {-1, 0, 1}, to `h` if `h != 0` else `l`.
    Combine,
    /// `s + 1`, with `s` in {-1, 0, 1}, to the predicate of `s`.
    Predicate(Predicate),
    And,
    Or,
    Xor,
}

impl LutId {
    pub(crate) fn eval(&self, m: u64) -> i64 {
        match self {
            LutId::Sign => 1,
            LutId::Select => {
                if m & 4 != 0 {
                    ((m >> 1) & 1) as i64
                } else {
                    (m & 1) as i64
                }
            }
            LutId::Combine => {
                let x: i64 = m as i64 - 4;
                let h: i64 = (x + 1).div_euclid(3);
                if h != 0 { h } else { x - 3 * h }
            }
            LutId::Predicate(p) => p.holds(m as i64 - 1) as i64,
            LutId::And => (m == 2) as i64,
            LutId::Or => (m >= 1) as i64,
            LutId::Xor => (m == 1) as i64,
        }
    }
}
