use thiserror::Error;

/// Every failure the engine reports. All of them are local and synchronous;
/// nothing is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter set: {0}")]
    InvalidParameterSet(String),

    #[error("bootstrapping parameters are not loaded")]
    NotInitialized,

    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("decryption out of range: {0}")]
    DecryptionOutOfRange(String),

    #[error("capacity exceeded: digit span {span}, noise level {noise}")]
    CapacityExceeded { span: i64, noise: u32 },

    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("value {value} does not fit in {width} bits")]
    EncodingOutOfRange { value: i64, width: usize },

    #[error("boot parameter mismatch: {0}")]
    BootParamMismatch(String),

    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("invalid program: {0}")]
    InvalidProgram(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
