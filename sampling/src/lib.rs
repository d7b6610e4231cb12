pub mod distributions;
pub mod source;

pub use distributions::RoundedGaussian;
pub use source::Source;
