mod ciphertext;
mod secret;

pub use ciphertext::*;
pub use secret::*;
