use std::{io::Write, path::Path};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use fhe16_backend::{Prime, Table};
use sha2::{Digest, Sha256};

use crate::{
    blind_rotation::{
        BlindRotationKeyCGGI, BlindRotationKeyCGGIPrepared, BlindRotationScratch, LookUpTable, cggi_blind_rotate,
    },
    error::{Error, Result},
    glwe::GlweCiphertext,
    lwe::{LweCiphertext, LweKeySwitchKey},
    params::ParameterSet,
    serialization::{ReaderFrom, WriterTo},
};

pub const BOOT_PARAM_MAGIC: [u8; 4] = *b"F16B";
pub const BOOT_PARAM_VERSION: u32 = 1;

const BOOT_PARAM_HEADER_BYTES: usize = 4 + 4 + 8 + 8 + 8 + 32;

/// Public evaluation material of a secret key (the "boot parameters"): the
/// blind-rotation key and the key-switching key back to the LWE key.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationKey {
    pub(crate) fingerprint: u64,
    pub(crate) key_id: u64,
    pub(crate) brk: BlindRotationKeyCGGI,
    pub(crate) ksk: LweKeySwitchKey,
}

impl EvaluationKey {
    pub fn alloc(params: &ParameterSet) -> Self {
        Self {
            fingerprint: params.fingerprint(),
            key_id: 0,
            brk: BlindRotationKeyCGGI::alloc(params.glwe_degree, params.lwe_dimension, params.pbs_decomposer()),
            ksk: LweKeySwitchKey::alloc(params.glwe_degree, params.lwe_dimension, params.ks_decomposer()),
        }
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.brk.write_to(writer)?;
        self.ksk.write_to(writer)
    }

    fn payload_len(&self) -> usize {
        let ggsw_bytes: usize = self
            .brk
            .keys
            .first()
            .map_or(0, |ggsw| ggsw.rows.len() * 2 * (8 + 8 * ggsw.n()));
        8 + self.brk.keys.len() * ggsw_bytes + 8 + 4 * self.ksk.data.len()
    }

    pub fn serialized_len(&self) -> usize {
        BOOT_PARAM_HEADER_BYTES + self.payload_len()
    }

    /// SHA-256 of the serialized payload.
    pub fn digest(&self) -> Result<[u8; 32]> {
        let mut hasher: Sha256 = Sha256::new();
        self.write_payload(&mut hasher)?;
        Ok(hasher.finalize().into())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut payload: Vec<u8> = Vec::with_capacity(self.payload_len());
        self.write_payload(&mut payload)?;
        let checksum: [u8; 32] = Sha256::digest(&payload).into();

        let mut bytes: Vec<u8> = Vec::with_capacity(BOOT_PARAM_HEADER_BYTES + payload.len());
        bytes.write_all(&BOOT_PARAM_MAGIC)?;
        bytes.write_u32::<LittleEndian>(BOOT_PARAM_VERSION)?;
        bytes.write_u64::<LittleEndian>(self.fingerprint)?;
        bytes.write_u64::<LittleEndian>(self.key_id)?;
        bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
        bytes.write_all(&checksum)?;
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Strict inverse of [`to_bytes`](EvaluationKey::to_bytes). Every
    /// structural problem is reported as [`Error::BootParamMismatch`].
    pub fn from_bytes(params: &ParameterSet, bytes: &[u8]) -> Result<Self> {
        let mismatch = |msg: String| Error::BootParamMismatch(msg);

        if bytes.len() < BOOT_PARAM_HEADER_BYTES {
            return Err(mismatch(format!("blob of {} bytes is shorter than its header", bytes.len())));
        }
        let (header, payload) = bytes.split_at(BOOT_PARAM_HEADER_BYTES);
        let mut reader: &[u8] = header;

        let mut magic: [u8; 4] = [0u8; 4];
        std::io::Read::read_exact(&mut reader, &mut magic)?;
        if magic != BOOT_PARAM_MAGIC {
            return Err(mismatch(format!("invalid magic {:02x?}", magic)));
        }
        let version: u32 = reader.read_u32::<LittleEndian>()?;
        if version != BOOT_PARAM_VERSION {
            return Err(mismatch(format!("unsupported version {}", version)));
        }
        let fingerprint: u64 = reader.read_u64::<LittleEndian>()?;
        if fingerprint != params.fingerprint() {
            return Err(mismatch(format!(
                "fingerprint {:#018x} != parameter fingerprint {:#018x}",
                fingerprint,
                params.fingerprint()
            )));
        }
        let key_id: u64 = reader.read_u64::<LittleEndian>()?;
        let payload_len: u64 = reader.read_u64::<LittleEndian>()?;
        let mut checksum: [u8; 32] = [0u8; 32];
        std::io::Read::read_exact(&mut reader, &mut checksum)?;

        if payload_len != payload.len() as u64 {
            return Err(mismatch(format!(
                "payload of {} bytes but header announces {}",
                payload.len(),
                payload_len
            )));
        }
        let have: [u8; 32] = Sha256::digest(payload).into();
        if have != checksum {
            return Err(mismatch("payload checksum mismatch".to_string()));
        }

        let mut evk: EvaluationKey = EvaluationKey::alloc(params);
        if payload.len() != evk.payload_len() {
            return Err(mismatch(format!(
                "payload of {} bytes but parameters require {}",
                payload.len(),
                evk.payload_len()
            )));
        }
        evk.key_id = key_id;
        let mut reader: &[u8] = payload;
        evk.brk
            .read_from(&mut reader)
            .and_then(|_| evk.ksk.read_from(&mut reader))
            .map_err(|e| mismatch(e.to_string()))?;
        Ok(evk)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(params: &ParameterSet, path: P) -> Result<Self> {
        Self::from_bytes(params, &std::fs::read(path)?)
    }

    /// Moves the blind-rotation key to the NTT domain.
    pub fn prepare(&self, params: &ParameterSet) -> Result<Bootstrapper> {
        if self.fingerprint != params.fingerprint() {
            return Err(Error::BootParamMismatch(format!(
                "evaluation key fingerprint {:#018x} != parameter fingerprint {:#018x}",
                self.fingerprint,
                params.fingerprint()
            )));
        }
        let table: Table = Table::new(Prime::new(params.bootstrap_modulus), params.glwe_degree);
        let brk: BlindRotationKeyCGGIPrepared = BlindRotationKeyCGGIPrepared::prepare(&table, &self.brk);
        Ok(Bootstrapper {
            params: *params,
            key_id: self.key_id,
            table,
            brk,
            ksk: self.ksk.clone(),
        })
    }
}

/// Prepared evaluation key, evaluates programmable bootstraps.
pub struct Bootstrapper {
    params: ParameterSet,
    key_id: u64,
    table: Table,
    brk: BlindRotationKeyCGGIPrepared,
    ksk: LweKeySwitchKey,
}

impl Bootstrapper {
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    /// Lookup table of `f` over `[0, 2^(B-1))`, `f(m)` in steps of `delta`.
    pub fn lut<F: Fn(u64) -> i64>(&self, f: F) -> LookUpTable {
        LookUpTable::from_fn(
            self.params.glwe_degree,
            self.params.message_bits,
            self.params.bootstrap_modulus,
            f,
        )
    }

    /// Lookup table returning `value` on the positive half of the torus and
    /// `-value` on the negative half.
    pub fn sign_lut(&self, value: u32) -> LookUpTable {
        LookUpTable::constant(self.params.glwe_degree, self.params.bootstrap_modulus, value)
    }

    /// Mod switch, blind rotation, sample extraction and key switch.
    pub fn bootstrap(&self, lwe: &LweCiphertext, lut: &LookUpTable) -> LweCiphertext {
        let n: usize = self.params.glwe_degree;
        let mut scratch: BlindRotationScratch = BlindRotationScratch::alloc(n, self.brk.level());
        let mut acc: GlweCiphertext = GlweCiphertext::alloc(n);
        cggi_blind_rotate(&self.table, &mut acc, lwe, lut, &self.brk, &mut scratch);

        let mut extracted: Vec<u32> = vec![0u32; n + 1];
        acc.sample_extract_torus32(self.params.bootstrap_modulus, &mut extracted);

        let mut res: LweCiphertext = LweCiphertext::alloc(self.params.lwe_dimension);
        self.ksk.keyswitch(&extracted, &mut res);
        res
    }
}
