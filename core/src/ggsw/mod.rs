mod ciphertext;
mod external_product;
mod prepared;

pub use ciphertext::*;
pub use external_product::*;
pub use prepared::*;
