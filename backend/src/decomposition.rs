/// Approximate signed gadget decomposition in base 2^`base_log` over `level`
/// digits, for residues of a modulus of `modulus_bits` bits (2^32 for LWE
/// ciphertexts, the 62-bit NTT prime for GLWE ciphertexts).
///
/// The input is first rounded to its `base_log * level` most significant
/// bits, then split into balanced digits in [-B/2, B/2). Digit `j` is paired
/// with the gadget value `round(modulus / B^(j+1))`, so digit 0 is the most
/// significant one. The carry out of digit 0 is a multiple of the modulus and
/// is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedDecomposer {
    modulus_bits: u32,
    base_log: usize,
    level: usize,
}

impl SignedDecomposer {
    pub fn new(modulus_bits: u32, base_log: usize, level: usize) -> Self {
        assert!(
            base_log > 0 && level > 0 && base_log * level <= modulus_bits as usize && modulus_bits < 64,
            "invalid decomposition: base_log={} level={} modulus_bits={}",
            base_log,
            level,
            modulus_bits
        );
        Self {
            modulus_bits,
            base_log,
            level,
        }
    }

    #[inline(always)]
    pub fn base_log(&self) -> usize {
        self.base_log
    }

    #[inline(always)]
    pub fn level(&self) -> usize {
        self.level
    }

    /// `round(modulus / 2^(base_log * (j+1)))`.
    pub fn gadget(&self, modulus: u128, j: usize) -> u128 {
        let shift: usize = self.base_log * (j + 1);
        (modulus + (1u128 << (shift - 1))) >> shift
    }

    /// Rounds `x` to the closest multiple of 2^(modulus_bits - base_log * level)
    /// and returns the quotient, in [0, 2^(base_log * level)].
    #[inline(always)]
    pub fn closest_representable(&self, x: u64) -> u64 {
        let shift: u32 = self.modulus_bits - (self.base_log * self.level) as u32;
        if shift == 0 {
            x
        } else {
            (x + (1u64 << (shift - 1))) >> shift
        }
    }

    /// Writes the `level` balanced digits of `x` into `digits`.
    #[inline(always)]
    pub fn decompose(&self, x: u64, digits: &mut [i64]) {
        debug_assert_eq!(digits.len(), self.level);
        let base: i64 = 1 << self.base_log;
        let half: i64 = base >> 1;
        let mask: u64 = (base - 1) as u64;
        let mut rest: u64 = self.closest_representable(x);
        let mut carry: i64 = 0;
        digits.iter_mut().rev().for_each(|d| {
            let mut digit: i64 = (rest & mask) as i64 + carry;
            rest >>= self.base_log;
            carry = 0;
            if digit >= half {
                digit -= base;
                carry = 1;
            }
            *d = digit;
        });
    }
}
