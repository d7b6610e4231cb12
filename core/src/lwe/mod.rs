mod ciphertext;
mod keyswitch;
mod secret;

pub use ciphertext::*;
pub use keyswitch::*;
pub use secret::*;
