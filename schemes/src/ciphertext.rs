use byteorder::{ByteOrder, LittleEndian};
use fhe16_core::{
    Error, ParameterSet, Result,
    lwe::LweCiphertext,
    params::HEADER_WORDS,
};
use sha2::{Digest, Sha256};

/// "FH16" read as a little-endian word.
pub const CIPHERTEXT_MAGIC: u32 = 0x3631_4846;
pub const CIPHERTEXT_VERSION: u32 = 1;

const WORD_MAGIC: usize = 0;
const WORD_VERSION: usize = 1;
const WORD_FINGERPRINT: usize = 2;
const WORD_KEY_ID: usize = 4;
const WORD_KIND: usize = 6;
const WORD_WIDTH: usize = 7;
const WORD_LO: usize = 8;
const WORD_HI: usize = 9;
const WORD_NOISE: usize = 10;
const WORD_RESERVED: usize = 11;
const WORD_TAG: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CiphertextKind {
    /// W-bit two's complement integer.
    Int,
    /// Boolean held in digit 0, the other digits are zero.
    Flag,
}

impl CiphertextKind {
    pub fn name(&self) -> &'static str {
        match self {
            CiphertextKind::Int => "Int",
            CiphertextKind::Flag => "Flag",
        }
    }

    fn to_word(self) -> u32 {
        match self {
            CiphertextKind::Int => 0,
            CiphertextKind::Flag => 1,
        }
    }

    fn from_word(word: u32) -> Option<Self> {
        match word {
            0 => Some(CiphertextKind::Int),
            1 => Some(CiphertextKind::Flag),
            _ => None,
        }
    }
}

/// Encrypted W-bit integer in lazy radix-2 form: the value is
/// `sum_i d_i * 2^i mod 2^W` where every digit `d_i` is an LWE encryption of
/// an integer in `[lo, hi]`.
///
/// The header tracks the digit range and the accumulated noise level, in
/// units of the noise of a fresh digit. Ciphertexts are immutable values:
/// every operation returns a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub(crate) fingerprint: u64,
    pub(crate) key_id: u64,
    pub(crate) kind: CiphertextKind,
    pub(crate) lo: i32,
    pub(crate) hi: i32,
    pub(crate) noise: u32,
    pub(crate) tag: u32,
    pub(crate) digits: Vec<LweCiphertext>,
}

impl Ciphertext {
    pub(crate) fn from_digits(
        like: &Ciphertext,
        kind: CiphertextKind,
        lo: i32,
        hi: i32,
        noise: u32,
        digits: Vec<LweCiphertext>,
    ) -> Self {
        Self {
            fingerprint: like.fingerprint,
            key_id: like.key_id,
            kind,
            lo,
            hi,
            noise,
            tag: 0,
            digits,
        }
    }

    /// Digits in `{0, 1}` straight out of bootstraps.
    pub(crate) fn canonical(like: &Ciphertext, kind: CiphertextKind, digits: Vec<LweCiphertext>) -> Self {
        Self::from_digits(like, kind, 0, 1, 1, digits)
    }

    pub fn width(&self) -> usize {
        self.digits.len()
    }

    pub fn kind(&self) -> CiphertextKind {
        self.kind
    }

    pub fn is_flag(&self) -> bool {
        self.kind == CiphertextKind::Flag
    }

    /// Inclusive range `(lo, hi)` of every digit.
    pub fn digit_range(&self) -> (i32, i32) {
        (self.lo, self.hi)
    }

    pub fn digit_span(&self) -> i64 {
        self.hi as i64 - self.lo as i64
    }

    pub fn noise_level(&self) -> u32 {
        self.noise
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    pub fn digits(&self) -> &[LweCiphertext] {
        &self.digits
    }

    /// Opaque storage slot, carried through serialization and never interpreted.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn with_tag(mut self, tag: u32) -> Self {
        self.tag = tag;
        self
    }

    /// Fresh or bootstrapped: bits with unit noise.
    pub fn is_canonical(&self) -> bool {
        self.lo == 0 && self.hi == 1 && self.noise <= 1
    }

    /// Whether the digits can still be decoded and refreshed.
    pub fn within_capacity(&self, params: &ParameterSet) -> bool {
        self.digit_span() <= params.max_digit_span() && self.noise <= params.max_noise_level
    }

    pub fn to_words(&self) -> Vec<u32> {
        let n_words: usize = HEADER_WORDS + self.digits.iter().map(|d| d.data().len()).sum::<usize>();
        let mut words: Vec<u32> = vec![0u32; HEADER_WORDS];
        words.reserve(n_words - HEADER_WORDS);
        words[WORD_MAGIC] = CIPHERTEXT_MAGIC;
        words[WORD_VERSION] = CIPHERTEXT_VERSION;
        words[WORD_FINGERPRINT] = self.fingerprint as u32;
        words[WORD_FINGERPRINT + 1] = (self.fingerprint >> 32) as u32;
        words[WORD_KEY_ID] = self.key_id as u32;
        words[WORD_KEY_ID + 1] = (self.key_id >> 32) as u32;
        words[WORD_KIND] = self.kind.to_word();
        words[WORD_WIDTH] = self.width() as u32;
        words[WORD_LO] = self.lo as u32;
        words[WORD_HI] = self.hi as u32;
        words[WORD_NOISE] = self.noise;
        words[WORD_TAG] = self.tag;
        self.digits.iter().for_each(|d| words.extend_from_slice(d.data()));
        words
    }

    /// Strict inverse of [`to_words`](Ciphertext::to_words).
    pub fn from_words(params: &ParameterSet, words: &[u32]) -> Result<Self> {
        let malformed = |msg: String| Err(Error::MalformedCiphertext(msg));

        if words.len() != params.ciphertext_words() {
            return malformed(format!(
                "{} words but expected {}",
                words.len(),
                params.ciphertext_words()
            ));
        }
        if words[WORD_MAGIC] != CIPHERTEXT_MAGIC {
            return malformed(format!("invalid magic {:#010x}", words[WORD_MAGIC]));
        }
        if words[WORD_VERSION] != CIPHERTEXT_VERSION {
            return malformed(format!("unsupported version {}", words[WORD_VERSION]));
        }
        let fingerprint: u64 = words[WORD_FINGERPRINT] as u64 | (words[WORD_FINGERPRINT + 1] as u64) << 32;
        if fingerprint != params.fingerprint() {
            return Err(Error::InvalidParameterSet(format!(
                "ciphertext fingerprint {:#018x} != parameter fingerprint {:#018x}",
                fingerprint,
                params.fingerprint()
            )));
        }
        let key_id: u64 = words[WORD_KEY_ID] as u64 | (words[WORD_KEY_ID + 1] as u64) << 32;
        let Some(kind) = CiphertextKind::from_word(words[WORD_KIND]) else {
            return malformed(format!("invalid kind {}", words[WORD_KIND]));
        };
        if words[WORD_WIDTH] as usize != params.width {
            return malformed(format!("width {} != {}", words[WORD_WIDTH], params.width));
        }
        let (lo, hi) = (words[WORD_LO] as i32, words[WORD_HI] as i32);
        if lo > 0 || hi < 0 {
            return malformed(format!("invalid digit range [{}, {}]", lo, hi));
        }
        if words[WORD_RESERVED..WORD_TAG].iter().any(|w| *w != 0) {
            return malformed("non-zero reserved words".to_string());
        }

        let digits: Vec<LweCiphertext> = words[HEADER_WORDS..]
            .chunks_exact(params.lwe_size())
            .map(|chunk| LweCiphertext::from_data(chunk.to_vec()))
            .collect();

        Ok(Self {
            fingerprint,
            key_id,
            kind,
            lo,
            hi,
            noise: words[WORD_NOISE],
            tag: words[WORD_TAG],
            digits,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let words: Vec<u32> = self.to_words();
        let mut bytes: Vec<u8> = vec![0u8; words.len() << 2];
        LittleEndian::write_u32_into(&words, &mut bytes);
        bytes
    }

    pub fn from_bytes(params: &ParameterSet, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.ciphertext_bytes() {
            return Err(Error::MalformedCiphertext(format!(
                "{} bytes but expected {}",
                bytes.len(),
                params.ciphertext_bytes()
            )));
        }
        let mut words: Vec<u32> = vec![0u32; bytes.len() >> 2];
        LittleEndian::read_u32_into(bytes, &mut words);
        Self::from_words(params, &words)
    }

    /// Content identifier, the SHA-256 of [`to_bytes`](Ciphertext::to_bytes).
    /// Encryption is randomized, so equal plaintexts have different identifiers.
    pub fn cid(&self) -> [u8; 32] {
        Sha256::digest(self.to_bytes()).into()
    }
}
