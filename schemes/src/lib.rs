//! Homomorphic evaluation over encrypted W-bit two's complement integers
//! (W = 32 by default).
//!
//! A [`Ciphertext`] holds W LWE digits, one per bit position, in a lazy
//! radix-2 form: linear operations ([`CryptoContext::add`],
//! [`CryptoContext::mul_constant`], ...) combine digits without
//! bootstrapping and let them grow, while the bootstrapped operations
//! ([`CryptoContext::smull`], [`CryptoContext::compare`],
//! [`CryptoContext::sdiv`], ...) refresh their operands through programmable
//! bootstraps and return canonical ciphertexts.
//!
//! ```ignore
//! let ctx = CryptoContext::new(ParameterSet::default())?;
//! let (sk, evk) = ctx.generate_keys(&mut source)?;
//! ctx.load_boot_param(&evk)?;
//!
//! let a = ctx.encrypt_int(&sk, 123, &mut source)?;
//! let b = ctx.encrypt_int(&sk, -77, &mut source)?;
//! assert_eq!(ctx.decrypt_int(&sk, &ctx.smull(&a, &b)?)?, -9471);
//! ```

pub mod arithmetic;
pub mod ciphertext;
pub mod context;
pub mod encoding;
pub mod evaluation;
pub mod program;

#[cfg(test)]
mod tests;

pub use ciphertext::{Ciphertext, CiphertextKind};
pub use context::CryptoContext;
pub use evaluation::{Division, LogicOp, MinMax, Predicate};
pub use fhe16_core::{Error, EvaluationKey, ParameterSet, Result, SecretKey};
pub use fhe16_sampling::Source;
pub use program::{Op, Program, programs};

/// Parameters of the deployment, [`ParameterSet::default_128`].
pub fn load_parameters() -> ParameterSet {
    ParameterSet::default()
}
