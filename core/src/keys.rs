use std::{
    fmt,
    io::{Read, Write},
    path::Path,
};

use byteorder::{LittleEndian, ReadBytesExt};
use fhe16_backend::{Prime, Table};
use fhe16_sampling::{RoundedGaussian, Source};
use rand_core::RngCore;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    blind_rotation::BlindRotationKeyCGGI,
    bootstrap::EvaluationKey,
    dist::SecretDistribution,
    error::{Error, Result},
    glwe::{GlweSecret, GlweSecretPrepared},
    lwe::{LweCiphertext, LweKeySwitchKey, LweSecret},
    params::ParameterSet,
};

pub const SECRET_KEY_MAGIC: [u8; 4] = *b"F16S";
pub const SECRET_KEY_VERSION: u32 = 1;

const SECRET_KEY_HEADER_BYTES: usize = 4 + 4 + 8 + 8 + 8;

/// Probability of a one in freshly sampled binary keys.
const KEY_DENSITY: f64 = 0.5;

/// Secret key of a parameter set: the binary LWE key ciphertexts are
/// encrypted under and the binary GLWE key used inside the bootstrap.
/// Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    pub(crate) fingerprint: u64,
    pub(crate) key_id: u64,
    #[zeroize(skip)]
    pub(crate) noise: RoundedGaussian,
    pub(crate) lwe: LweSecret,
    pub(crate) glwe: GlweSecret,
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("fingerprint", &format_args!("{:#018x}", self.fingerprint))
            .field("key_id", &format_args!("{:#018x}", self.key_id))
            .finish_non_exhaustive()
    }
}

/// Samples a fresh secret key and the matching evaluation key.
pub fn generate_keys(params: &ParameterSet, source: &mut Source) -> Result<(SecretKey, EvaluationKey)> {
    params.validate()?;

    let lwe_noise: RoundedGaussian = noise(params.lwe_noise_std)?;
    let glwe_noise: RoundedGaussian = noise(params.glwe_noise_std)?;

    let mut source_xs: Source = source.branch();
    let mut source_xa: Source = source.branch();
    let mut source_xe: Source = source.branch();

    let key_id: u64 = source.next_u64();

    let mut lwe: LweSecret = LweSecret::alloc(params.lwe_dimension);
    lwe.fill_binary_prob(KEY_DENSITY, &mut source_xs);
    let mut glwe: GlweSecret = GlweSecret::alloc(params.glwe_degree);
    glwe.fill_binary_prob(KEY_DENSITY, &mut source_xs);

    let table: Table = Table::new(Prime::new(params.bootstrap_modulus), params.glwe_degree);
    let glwe_prepared: GlweSecretPrepared = GlweSecretPrepared::prepare(&table, &glwe);

    let mut brk: BlindRotationKeyCGGI =
        BlindRotationKeyCGGI::alloc(params.glwe_degree, params.lwe_dimension, params.pbs_decomposer());
    brk.encrypt_sk(
        &table,
        &glwe_prepared,
        &lwe,
        &mut source_xa,
        &mut source_xe,
        &glwe_noise,
    );

    let mut ksk: LweKeySwitchKey =
        LweKeySwitchKey::alloc(params.glwe_degree, params.lwe_dimension, params.ks_decomposer());
    ksk.encrypt_sk(glwe.data(), &lwe, &mut source_xa, &mut source_xe, &lwe_noise);

    let fingerprint: u64 = params.fingerprint();
    let evk: EvaluationKey = EvaluationKey {
        fingerprint,
        key_id,
        brk,
        ksk,
    };

    info!(
        key_id,
        fingerprint,
        n = params.lwe_dimension,
        glwe_degree = params.glwe_degree,
        evaluation_key_bytes = evk.serialized_len(),
        "generated keys"
    );

    let sk: SecretKey = SecretKey {
        fingerprint,
        key_id,
        noise: lwe_noise,
        lwe,
        glwe,
    };

    Ok((sk, evk))
}

fn noise(sigma: f64) -> Result<RoundedGaussian> {
    RoundedGaussian::new(sigma)
        .ok_or_else(|| Error::InvalidParameterSet(format!("invalid noise standard deviation {}", sigma)))
}

impl SecretKey {
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    pub fn lwe(&self) -> &LweSecret {
        &self.lwe
    }

    pub fn glwe(&self) -> &GlweSecret {
        &self.glwe
    }

    pub fn lwe_dimension(&self) -> usize {
        self.lwe.n()
    }

    /// Fresh LWE encryption of `pt` under the LWE key.
    pub fn encrypt_lwe(&self, pt: u32, source: &mut Source) -> LweCiphertext {
        let mut source_xe: Source = source.branch();
        let mut ct: LweCiphertext = LweCiphertext::alloc(self.lwe.n());
        ct.encrypt_sk(pt, &self.lwe, source, &mut source_xe, &self.noise);
        ct
    }

    /// Phase of `ct` under the LWE key.
    pub fn phase(&self, ct: &LweCiphertext) -> u32 {
        ct.phase(&self.lwe)
    }

    /// Serialized key, wiped on drop.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut bytes: Zeroizing<Vec<u8>> =
            Zeroizing::new(Vec::with_capacity(SECRET_KEY_HEADER_BYTES + self.lwe.n() + self.glwe.n()));
        bytes.extend_from_slice(&SECRET_KEY_MAGIC);
        bytes.extend_from_slice(&SECRET_KEY_VERSION.to_le_bytes());
        bytes.extend_from_slice(&self.fingerprint.to_le_bytes());
        bytes.extend_from_slice(&self.key_id.to_le_bytes());
        bytes.extend_from_slice(&self.lwe.dist().to_word().to_le_bytes());
        bytes.extend_from_slice(self.lwe.data());
        bytes.extend_from_slice(self.glwe.data());
        bytes
    }

    /// Strict inverse of [`to_bytes`](SecretKey::to_bytes).
    pub fn from_bytes(params: &ParameterSet, bytes: &[u8]) -> Result<Self> {
        let (n, big_n) = (params.lwe_dimension, params.glwe_degree);
        let want: usize = SECRET_KEY_HEADER_BYTES + n + big_n;
        if bytes.len() != want {
            return Err(Error::MalformedKey(format!(
                "secret key of {} bytes but expected {}",
                bytes.len(),
                want
            )));
        }

        let mut reader: &[u8] = bytes;
        let mut magic: [u8; 4] = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != SECRET_KEY_MAGIC {
            return Err(Error::MalformedKey(format!("invalid magic {:02x?}", magic)));
        }
        let version: u32 = reader.read_u32::<LittleEndian>()?;
        if version != SECRET_KEY_VERSION {
            return Err(Error::MalformedKey(format!("unsupported version {}", version)));
        }
        let fingerprint: u64 = reader.read_u64::<LittleEndian>()?;
        if fingerprint != params.fingerprint() {
            return Err(Error::InvalidParameterSet(format!(
                "secret key fingerprint {:#018x} != parameter fingerprint {:#018x}",
                fingerprint,
                params.fingerprint()
            )));
        }
        let key_id: u64 = reader.read_u64::<LittleEndian>()?;
        let dist: SecretDistribution = SecretDistribution::from_word(reader.read_u64::<LittleEndian>()?)
            .map_err(|e| Error::MalformedKey(e.to_string()))?;

        let (lwe_bytes, glwe_bytes) = reader.split_at(n);
        let lwe: LweSecret = LweSecret::from_raw(lwe_bytes.to_vec(), dist)
            .ok_or_else(|| Error::MalformedKey("non-binary LWE key coefficient".to_string()))?;
        let glwe: GlweSecret = GlweSecret::from_raw(glwe_bytes.to_vec(), dist)
            .ok_or_else(|| Error::MalformedKey("non-binary GLWE key coefficient".to_string()))?;

        Ok(Self {
            fingerprint,
            key_id,
            noise: noise(params.lwe_noise_std)?,
            lwe,
            glwe,
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes: Zeroizing<Vec<u8>> = self.to_bytes();
        let mut file: std::fs::File = std::fs::File::create(path)?;
        file.write_all(&bytes)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(params: &ParameterSet, path: P) -> Result<Self> {
        let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(std::fs::read(path)?);
        Self::from_bytes(params, &bytes)
    }
}
