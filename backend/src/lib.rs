pub mod decomposition;
pub mod modulus;
pub mod ntt;
pub mod poly;

pub use decomposition::SignedDecomposer;
pub use modulus::{Barrett, BarrettPrecomp, Prime};
pub use ntt::Table;
