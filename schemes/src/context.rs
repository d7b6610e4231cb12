use std::{
    path::Path,
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
};

use fhe16_core::{
    Bootstrapper, Error, EvaluationKey, ParameterSet, Result, SecretKey, blind_rotation::LookUpTable,
    generate_keys,
};
use fhe16_sampling::Source;
use fhe16_utils::Map;
use tracing::{info, warn};

use crate::{
    ciphertext::Ciphertext,
    evaluation::{LutId, Predicate},
};

/// Prepared evaluation key of an initialized context.
pub(crate) struct BootState {
    pub(crate) bootstrapper: Bootstrapper,
    pub(crate) digest: [u8; 32],
    pub(crate) key_id: u64,
}

/// Engine handle: a parameter set, its lookup tables and, once loaded, the
/// prepared bootstrapping key.
///
/// The context is `Send + Sync`. Boot parameters are loaded at most once;
/// bootstrapped operations read them without locking.
pub struct CryptoContext {
    params: ParameterSet,
    fingerprint: u64,
    luts: Map<LutId, LookUpTable>,
    boot: OnceLock<BootState>,
    init_guard: Mutex<()>,
    bootstrap_count: AtomicU64,
}

impl CryptoContext {
    pub fn new(params: ParameterSet) -> Result<Self> {
        params.validate()?;
        let fingerprint: u64 = params.fingerprint();
        let luts: Map<LutId, LookUpTable> = LutId::all()
            .into_iter()
            .map(|id| (id, id.table(&params)))
            .collect();
        info!(
            fingerprint = fingerprint,
            width = params.width,
            lwe_dimension = params.lwe_dimension,
            glwe_degree = params.glwe_degree,
            "created context"
        );
        Ok(Self {
            params,
            fingerprint,
            luts,
            boot: OnceLock::new(),
            init_guard: Mutex::new(()),
            bootstrap_count: AtomicU64::new(0),
        })
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Samples a secret key and its evaluation key. The evaluation key still
    /// has to be loaded with [`load_boot_param`](CryptoContext::load_boot_param).
    pub fn generate_keys(&self, source: &mut Source) -> Result<(SecretKey, EvaluationKey)> {
        generate_keys(&self.params, source)
    }

    /// Prepares and installs the evaluation key.
    ///
    /// Loading the same key again is a no-op. Loading a different key into an
    /// initialized context fails with [`Error::BootParamMismatch`].
    pub fn load_boot_param(&self, evk: &EvaluationKey) -> Result<()> {
        let digest: [u8; 32] = evk.digest()?;
        let _guard = self.init_guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(boot) = self.boot.get() {
            if boot.digest == digest {
                info!(key_id = boot.key_id, "boot parameters already loaded");
                return Ok(());
            }
            warn!(
                loaded = boot.key_id,
                rejected = evk.key_id(),
                "rejected different boot parameters"
            );
            return Err(Error::BootParamMismatch(
                "context is already initialized with different boot parameters".to_string(),
            ));
        }

        let bootstrapper: Bootstrapper = evk.prepare(&self.params)?;
        let key_id: u64 = evk.key_id();
        if self
            .boot
            .set(BootState {
                bootstrapper,
                digest,
                key_id,
            })
            .is_err()
        {
            return Err(Error::BootParamMismatch("concurrent initialization".to_string()));
        }
        info!(key_id = key_id, "loaded boot parameters");
        Ok(())
    }

    pub fn load_boot_param_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.load_boot_param(&EvaluationKey::from_bytes(&self.params, bytes)?)
    }

    pub fn load_boot_param_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.load_boot_param(&EvaluationKey::load_from_file(&self.params, path)?)
    }

    pub fn is_initialized(&self) -> bool {
        self.boot.get().is_some()
    }

    /// Key id of the loaded evaluation key.
    pub fn boot_key_id(&self) -> Option<u64> {
        self.boot.get().map(|boot| boot.key_id)
    }

    /// Number of programmable bootstraps evaluated so far.
    pub fn bootstrap_count(&self) -> u64 {
        self.bootstrap_count.load(Ordering::Relaxed)
    }

    /// Releases the prepared key material.
    pub fn shutdown(self) {
        info!(
            fingerprint = self.fingerprint,
            bootstraps = self.bootstrap_count(),
            "shutting down context"
        );
    }

    pub(crate) fn boot(&self) -> Result<&BootState> {
        self.boot.get().ok_or(Error::NotInitialized)
    }

    pub(crate) fn lut(&self, id: LutId) -> &LookUpTable {
        match self.luts.get(&id) {
            Some(lut) => lut,
            None => unreachable!("lookup table {:?} is registered at creation", id),
        }
    }

    pub(crate) fn count_bootstraps(&self, n: u64) {
        self.bootstrap_count.fetch_add(n, Ordering::Relaxed);
    }

    /// Ciphertexts must share this context's fingerprint and width, and a
    /// single key id.
    pub(crate) fn check_compatible(&self, cts: &[&Ciphertext]) -> Result<()> {
        for ct in cts {
            if ct.fingerprint != self.fingerprint {
                return Err(Error::InvalidParameterSet(format!(
                    "ciphertext fingerprint {:#018x} != context fingerprint {:#018x}",
                    ct.fingerprint, self.fingerprint
                )));
            }
            if ct.width() != self.params.width {
                return Err(Error::MalformedCiphertext(format!(
                    "width {} != {}",
                    ct.width(),
                    self.params.width
                )));
            }
        }
        match cts.split_first() {
            Some((first, rest)) => match rest.iter().find(|ct| ct.key_id != first.key_id) {
                Some(other) => Err(Error::InvalidParameterSet(format!(
                    "key id {:#018x} != key id {:#018x}",
                    other.key_id, first.key_id
                ))),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }
}

impl LutId {
    pub(crate) fn all() -> Vec<LutId> {
        let mut ids: Vec<LutId> = vec![
            LutId::Sign,
            LutId::Select,
            LutId::Combine,
            LutId::And,
            LutId::Or,
            LutId::Xor,
        ];
        ids.extend(Predicate::ALL.iter().map(|p| LutId::Predicate(*p)));
        ids
    }

    fn table(&self, params: &ParameterSet) -> LookUpTable {
        let n: usize = params.glwe_degree;
        let q: u64 = params.bootstrap_modulus;
        match self {
            LutId::Sign => LookUpTable::constant(n, q, params.delta() >> 1),
            _ => LookUpTable::from_fn(n, params.message_bits, q, |m| self.eval(m)),
        }
    }
}
