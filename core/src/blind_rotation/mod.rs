pub mod cggi;
pub mod key;
pub mod lut;

pub use cggi::{BlindRotationScratch, cggi_blind_rotate, mod_switch_2n};
pub use key::{BlindRotationKeyCGGI, BlindRotationKeyCGGIPrepared};
pub use lut::{LookUpTable, torus32_to_modq};
