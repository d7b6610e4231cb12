use std::path::Path;

use fhe16_backend::SignedDecomposer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// NTT-friendly prime used as the bootstrapping modulus Q: 62 bits, with
/// 2-adicity 19 so that negacyclic transforms up to degree 2^18 exist.
pub const BOOTSTRAP_PRIME: u64 = 0x3fff_ffff_ffe8_0001;

/// Bit size of [`BOOTSTRAP_PRIME`], used by the gadget decomposer.
pub const BOOTSTRAP_MODULUS_BITS: u32 = 62;

/// Number of 32-bit header words in front of the digits of a ciphertext.
pub const HEADER_WORDS: usize = 16;

/// Upper bound on the serialized size of a single ciphertext.
pub const MAX_CIPHERTEXT_BYTES: usize = 200_000;

/// Public parameters shared by every key, ciphertext and evaluation key.
///
/// A parameter set is identified by its [`fingerprint`](ParameterSet::fingerprint),
/// which is stamped into every serialized object; objects produced under
/// different fingerprints never mix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// LWE dimension n of the ciphertexts at rest.
    pub lwe_dimension: usize,
    /// Ring degree N of the bootstrapping GLWE ciphertexts.
    pub glwe_degree: usize,
    /// log2 of the ciphertext modulus q, always 32.
    pub ciphertext_modulus_log: u32,
    /// Bootstrapping modulus Q, always [`BOOTSTRAP_PRIME`].
    pub bootstrap_modulus: u64,
    /// Standard deviation of LWE and key-switching noise, in units of 1/2^32.
    pub lwe_noise_std: f64,
    /// Standard deviation of GLWE and blind-rotation key noise, in units of 1/Q.
    pub glwe_noise_std: f64,
    pub pbs_base_log: usize,
    pub pbs_level: usize,
    pub ks_base_log: usize,
    pub ks_level: usize,
    /// Bits B of the digit plaintext space, a digit d is encrypted as d * 2^(32-B).
    pub message_bits: u32,
    /// Plaintext bit-width W.
    pub width: usize,
    /// Maximum accumulated noise, in units of the noise of a fresh digit.
    pub max_noise_level: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::default_128()
    }
}

impl ParameterSet {
    /// Production parameters targeting 128-bit security.
    pub const fn default_128() -> Self {
        Self {
            lwe_dimension: 1024,
            glwe_degree: 2048,
            ciphertext_modulus_log: 32,
            bootstrap_modulus: BOOTSTRAP_PRIME,
            lwe_noise_std: 128.0,
            glwe_noise_std: 16384.0,
            pbs_base_log: 23,
            pbs_level: 1,
            ks_base_log: 4,
            ks_level: 5,
            message_bits: 5,
            width: 32,
            max_noise_level: 32,
        }
    }

    /// Small parameters for tests and development. Offers no security.
    pub fn insecure_test() -> Self {
        tracing::warn!("using insecure test parameters");
        Self {
            lwe_dimension: 32,
            glwe_degree: 512,
            ciphertext_modulus_log: 32,
            bootstrap_modulus: BOOTSTRAP_PRIME,
            lwe_noise_std: 4.0,
            glwe_noise_std: 4.0,
            pbs_base_log: 20,
            pbs_level: 1,
            ks_base_log: 4,
            ks_level: 5,
            message_bits: 5,
            width: 32,
            max_noise_level: 32,
        }
    }

    pub fn with_width(self, width: usize) -> Self {
        Self { width, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidParameterSet(msg));

        if self.ciphertext_modulus_log != 32 {
            return invalid(format!(
                "ciphertext_modulus_log={} but only 32 is supported",
                self.ciphertext_modulus_log
            ));
        }
        if self.bootstrap_modulus != BOOTSTRAP_PRIME {
            return invalid(format!(
                "bootstrap_modulus={:#x} but only {:#x} is supported",
                self.bootstrap_modulus, BOOTSTRAP_PRIME
            ));
        }
        if self.lwe_dimension == 0 {
            return invalid("lwe_dimension must be positive".to_string());
        }
        if !(3..=7).contains(&self.message_bits) {
            return invalid(format!("message_bits={} not in 3..=7", self.message_bits));
        }
        let two_adicity: u32 = (BOOTSTRAP_PRIME - 1).trailing_zeros();
        if !self.glwe_degree.is_power_of_two()
            || self.glwe_degree < (1 << self.message_bits)
            || (self.glwe_degree.trailing_zeros() + 1) > two_adicity
        {
            return invalid(format!(
                "glwe_degree={} must be a power of two in [2^{}, 2^{}]",
                self.glwe_degree,
                self.message_bits,
                two_adicity - 1
            ));
        }
        if !self.width.is_power_of_two() || !(4..=32).contains(&self.width) {
            return invalid(format!("width={} must be a power of two in 4..=32", self.width));
        }
        if self.pbs_base_log == 0
            || self.pbs_level == 0
            || self.pbs_base_log * self.pbs_level > BOOTSTRAP_MODULUS_BITS as usize
        {
            return invalid(format!(
                "pbs_base_log={} pbs_level={} exceed {} bits",
                self.pbs_base_log, self.pbs_level, BOOTSTRAP_MODULUS_BITS
            ));
        }
        if self.ks_base_log == 0 || self.ks_level == 0 || self.ks_base_log * self.ks_level > 32 {
            return invalid(format!(
                "ks_base_log={} ks_level={} exceed 32 bits",
                self.ks_base_log, self.ks_level
            ));
        }
        if !(self.lwe_noise_std.is_finite() && self.lwe_noise_std >= 0.0)
            || !(self.glwe_noise_std.is_finite() && self.glwe_noise_std >= 0.0)
        {
            return invalid("noise standard deviations must be finite and non-negative".to_string());
        }
        if self.max_noise_level == 0 {
            return invalid("max_noise_level must be positive".to_string());
        }
        if self.ciphertext_bytes() > MAX_CIPHERTEXT_BYTES {
            return invalid(format!(
                "ciphertexts of {} bytes exceed the {} bytes limit",
                self.ciphertext_bytes(),
                MAX_CIPHERTEXT_BYTES
            ));
        }
        Ok(())
    }

    /// First 8 bytes (little-endian) of the SHA-256 of the canonical encoding.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher: Sha256 = Sha256::new();
        hasher.update(b"fhe16-params");
        hasher.update((self.lwe_dimension as u64).to_le_bytes());
        hasher.update((self.glwe_degree as u64).to_le_bytes());
        hasher.update(self.ciphertext_modulus_log.to_le_bytes());
        hasher.update(self.bootstrap_modulus.to_le_bytes());
        hasher.update(self.lwe_noise_std.to_bits().to_le_bytes());
        hasher.update(self.glwe_noise_std.to_bits().to_le_bytes());
        hasher.update((self.pbs_base_log as u64).to_le_bytes());
        hasher.update((self.pbs_level as u64).to_le_bytes());
        hasher.update((self.ks_base_log as u64).to_le_bytes());
        hasher.update((self.ks_level as u64).to_le_bytes());
        hasher.update(self.message_bits.to_le_bytes());
        hasher.update((self.width as u64).to_le_bytes());
        hasher.update(self.max_noise_level.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes: [u8; 8] = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Scaling factor of a digit, 2^(32-B).
    #[inline(always)]
    pub fn delta(&self) -> u32 {
        1u32 << (32 - self.message_bits)
    }

    /// Largest `hi - lo` a digit may span and still be refreshed, 2^B - B - 1.
    #[inline(always)]
    pub fn max_digit_span(&self) -> i64 {
        (1i64 << self.message_bits) - self.message_bits as i64 - 1
    }

    #[inline(always)]
    pub fn lwe_size(&self) -> usize {
        self.lwe_dimension + 1
    }

    #[inline(always)]
    pub fn ciphertext_words(&self) -> usize {
        HEADER_WORDS + self.width * self.lwe_size()
    }

    #[inline(always)]
    pub fn ciphertext_bytes(&self) -> usize {
        self.ciphertext_words() << 2
    }

    pub fn pbs_decomposer(&self) -> SignedDecomposer {
        SignedDecomposer::new(BOOTSTRAP_MODULUS_BITS, self.pbs_base_log, self.pbs_level)
    }

    pub fn ks_decomposer(&self) -> SignedDecomposer {
        SignedDecomposer::new(self.ciphertext_modulus_log, self.ks_base_log, self.ks_level)
    }

    /// Parses and validates a JSON parameter set.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: ParameterSet =
            serde_json::from_str(json).map_err(|e| Error::InvalidParameterSet(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidParameterSet(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json: String = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
