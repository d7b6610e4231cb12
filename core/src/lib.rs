pub mod blind_rotation;
pub mod bootstrap;
pub mod dist;
pub mod error;
pub mod ggsw;
pub mod glwe;
pub mod keys;
pub mod lwe;
pub mod params;
pub mod serialization;

pub use bootstrap::{Bootstrapper, EvaluationKey};
pub use error::{Error, Result};
pub use keys::{SecretKey, generate_keys};
pub use params::ParameterSet;
