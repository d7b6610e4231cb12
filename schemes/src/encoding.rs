use fhe16_core::{Error, ParameterSet, Result, SecretKey, lwe::LweCiphertext};
use fhe16_sampling::Source;

use crate::{
    ciphertext::{Ciphertext, CiphertextKind},
    context::CryptoContext,
};

impl CryptoContext {
    /// Encrypts the W-bit two's complement encoding of `value`, one bit per digit.
    pub fn encrypt_int(&self, sk: &SecretKey, value: i32, source: &mut Source) -> Result<Ciphertext> {
        self.check_secret_key(sk)?;
        let bits: u64 = self.encode(value)?;
        let delta: u32 = self.params().delta();
        let digits: Vec<LweCiphertext> = (0..self.params().width)
            .map(|i| sk.encrypt_lwe(((bits >> i) & 1) as u32 * delta, source))
            .collect();
        Ok(self.fresh(sk.key_id(), CiphertextKind::Int, 1, digits))
    }

    /// Decrypts to the unique value represented by the digits, sign-extended
    /// from W bits.
    pub fn decrypt_int(&self, sk: &SecretKey, ct: &Ciphertext) -> Result<i32> {
        self.check_secret_key(sk)?;
        self.check_compatible(&[ct])?;
        if ct.key_id != sk.key_id() {
            return Err(Error::InvalidParameterSet(format!(
                "ciphertext key id {:#018x} != secret key id {:#018x}",
                ct.key_id,
                sk.key_id()
            )));
        }
        let params: &ParameterSet = self.params();
        if !ct.within_capacity(params) {
            return Err(Error::DecryptionOutOfRange(format!(
                "digit range [{}, {}] with noise level {} exceeds capacity",
                ct.lo, ct.hi, ct.noise
            )));
        }

        let message_bits: u32 = params.message_bits;
        let modulus: i64 = 1 << message_bits;
        let half_delta: u32 = params.delta() >> 1;
        let sum: u64 = ct.digits.iter().enumerate().fold(0u64, |acc, (i, d)| {
            let m: i64 = (sk.phase(d).wrapping_add(half_delta) >> (32 - message_bits)) as i64;
            let r: i64 = ct.lo as i64 + (m - ct.lo as i64).rem_euclid(modulus);
            acc.wrapping_add((r as u64).wrapping_shl(i as u32))
        });

        let width: u32 = params.width as u32;
        let shift: u32 = 64 - width;
        Ok(((sum << shift) as i64 >> shift) as i32)
    }

    /// Encrypts a boolean as a flag: the bit in digit 0, trivial zeros above.
    pub fn encrypt_bit(&self, sk: &SecretKey, bit: bool, source: &mut Source) -> Result<Ciphertext> {
        self.check_secret_key(sk)?;
        let n: usize = self.params().lwe_dimension;
        let mut digits: Vec<LweCiphertext> = Vec::with_capacity(self.params().width);
        digits.push(sk.encrypt_lwe(bit as u32 * self.params().delta(), source));
        digits.extend((1..self.params().width).map(|_| LweCiphertext::alloc(n)));
        Ok(self.fresh(sk.key_id(), CiphertextKind::Flag, 1, digits))
    }

    pub fn decrypt_bit(&self, sk: &SecretKey, ct: &Ciphertext) -> Result<bool> {
        match self.decrypt_int(sk, ct)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::DecryptionOutOfRange(format!(
                "decrypted {} is not a bit",
                other
            ))),
        }
    }

    pub fn encrypt_int_vec(&self, sk: &SecretKey, values: &[i32], source: &mut Source) -> Result<Vec<Ciphertext>> {
        values.iter().map(|v| self.encrypt_int(sk, *v, source)).collect()
    }

    pub fn decrypt_int_vec(&self, sk: &SecretKey, cts: &[Ciphertext]) -> Result<Vec<i32>> {
        cts.iter().map(|ct| self.decrypt_int(sk, ct)).collect()
    }

    /// Noiseless public encoding of `value` for the key `key_id`, used for
    /// constants inside circuits.
    pub fn trivial_int(&self, key_id: u64, value: i32) -> Result<Ciphertext> {
        let bits: u64 = self.encode(value)?;
        let delta: u32 = self.params().delta();
        let n: usize = self.params().lwe_dimension;
        let digits: Vec<LweCiphertext> = (0..self.params().width)
            .map(|i| LweCiphertext::trivial(n, ((bits >> i) & 1) as u32 * delta))
            .collect();
        Ok(self.fresh(key_id, CiphertextKind::Int, 0, digits))
    }

    /// Low W bits of `value`, which must fit W-bit two's complement.
    fn encode(&self, value: i32) -> Result<u64> {
        let width: usize = self.params().width;
        if width < 32 {
            let half: i64 = 1 << (width - 1);
            if !(-half..half).contains(&(value as i64)) {
                return Err(Error::EncodingOutOfRange {
                    value: value as i64,
                    width,
                });
            }
        }
        Ok(value as u32 as u64 & ((1u64 << width) - 1))
    }

    fn fresh(&self, key_id: u64, kind: CiphertextKind, noise: u32, digits: Vec<LweCiphertext>) -> Ciphertext {
        Ciphertext {
            fingerprint: self.fingerprint(),
            key_id,
            kind,
            lo: 0,
            hi: 1,
            noise,
            tag: 0,
            digits,
        }
    }

    fn check_secret_key(&self, sk: &SecretKey) -> Result<()> {
        if sk.fingerprint() != self.fingerprint() {
            return Err(Error::InvalidParameterSet(format!(
                "secret key fingerprint {:#018x} != context fingerprint {:#018x}",
                sk.fingerprint(),
                self.fingerprint()
            )));
        }
        Ok(())
    }
}
