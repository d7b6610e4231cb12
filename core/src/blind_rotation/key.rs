use fhe16_backend::{SignedDecomposer, Table};
use fhe16_sampling::{RoundedGaussian, Source};

use crate::{
    dist::SecretDistribution,
    ggsw::{GgswCiphertext, GgswCiphertextPrepared},
    glwe::GlweSecretPrepared,
    lwe::LweSecret,
    serialization::{ReaderFrom, WriterTo, invalid_data},
};

/// Blind-rotation key: one GGSW encryption under the GLWE key of each
/// coefficient of the binary LWE key.
#[derive(Clone, Debug, PartialEq)]
pub struct BlindRotationKeyCGGI {
    pub(crate) keys: Vec<GgswCiphertext>,
    pub(crate) dist: SecretDistribution,
}

impl BlindRotationKeyCGGI {
    pub fn alloc(n_glwe: usize, n_lwe: usize, decomposer: SignedDecomposer) -> Self {
        Self {
            keys: (0..n_lwe).map(|_| GgswCiphertext::alloc(n_glwe, decomposer)).collect(),
            dist: SecretDistribution::NONE,
        }
    }

    pub fn n_lwe(&self) -> usize {
        self.keys.len()
    }

    pub fn encrypt_sk(
        &mut self,
        table: &Table,
        sk_glwe: &GlweSecretPrepared,
        sk_lwe: &LweSecret,
        source_xa: &mut Source,
        source_xe: &mut Source,
        noise: &RoundedGaussian,
    ) {
        assert_eq!(
            self.n_lwe(),
            sk_lwe.n(),
            "invalid sk_lwe.n()={} != brk.n_lwe()={}",
            sk_lwe.n(),
            self.n_lwe()
        );
        self.dist = sk_lwe.dist();
        self.keys
            .iter_mut()
            .zip(sk_lwe.data.iter())
            .for_each(|(ggsw, s)| ggsw.encrypt_sk(*s as u64, table, sk_glwe, source_xa, source_xe, noise));
    }
}

impl WriterTo for BlindRotationKeyCGGI {
    fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.dist.write_to(writer)?;
        self.keys.iter().try_for_each(|ggsw| ggsw.write_to(writer))
    }
}

impl ReaderFrom for BlindRotationKeyCGGI {
    fn read_from<R: std::io::Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        self.dist = SecretDistribution::read_from(reader)?;
        if !matches!(
            self.dist,
            SecretDistribution::BinaryFixed(_) | SecretDistribution::BinaryProb(_)
        ) {
            return Err(invalid_data(format!(
                "blind rotation requires a binary key but got {:?}",
                self.dist
            )));
        }
        self.keys.iter_mut().try_for_each(|ggsw| ggsw.read_from(reader))
    }
}

/// Blind-rotation key in the NTT domain.
pub struct BlindRotationKeyCGGIPrepared {
    pub(crate) keys: Vec<GgswCiphertextPrepared>,
}

impl BlindRotationKeyCGGIPrepared {
    pub fn prepare(table: &Table, brk: &BlindRotationKeyCGGI) -> Self {
        Self {
            keys: brk
                .keys
                .iter()
                .map(|ggsw| GgswCiphertextPrepared::prepare(table, ggsw))
                .collect(),
        }
    }

    pub fn n_lwe(&self) -> usize {
        self.keys.len()
    }

    pub fn level(&self) -> usize {
        self.keys.first().map_or(0, |k| k.level())
    }
}
