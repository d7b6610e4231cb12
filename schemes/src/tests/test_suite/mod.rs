mod codec;
mod compare;
mod div;
mod encoding;
mod init;
mod logic;
mod mul;
mod program;
mod select;
mod shift;
mod unary;

pub use arithmetic::*;
pub use codec::*;
pub use compare::*;
pub use div::*;
pub use encoding::*;
pub use init::*;
pub use logic::*;
pub use mul::*;
pub use program::*;
pub use select::*;
pub use shift::*;
pub use unary::*;

use fhe16_core::{EvaluationKey, ParameterSet, SecretKey};
use fhe16_sampling::Source;

use crate::{Ciphertext, CryptoContext};

/// Initialized context with its keys, on the insecure test parameters.
pub struct TestContext {
    pub ctx: CryptoContext,
    pub sk: SecretKey,
    pub evk: EvaluationKey,
}

impl TestContext {
    pub fn new(width: usize) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let params: ParameterSet = ParameterSet::insecure_test().with_width(width);
        let ctx: CryptoContext = CryptoContext::new(params).unwrap();
        let mut source: Source = Source::new([1u8; 32]);
        let (sk, evk) = ctx.generate_keys(&mut source).unwrap();
        ctx.load_boot_param(&evk).unwrap();
        Self { ctx, sk, evk }
    }

    pub fn width(&self) -> usize {
        self.ctx.params().width
    }

    pub fn encrypt(&self, value: i32, source: &mut Source) -> Ciphertext {
        self.ctx.encrypt_int(&self.sk, value, source).unwrap()
    }

    pub fn encrypt_bit(&self, bit: bool, source: &mut Source) -> Ciphertext {
        self.ctx.encrypt_bit(&self.sk, bit, source).unwrap()
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> i32 {
        self.ctx.decrypt_int(&self.sk, ct).unwrap()
    }

    pub fn decrypt_bit(&self, ct: &Ciphertext) -> bool {
        self.ctx.decrypt_bit(&self.sk, ct).unwrap()
    }

    /// Smallest and largest values of the width.
    pub fn bounds(&self) -> (i32, i32) {
        let width: usize = self.width();
        if width == 32 {
            (i32::MIN, i32::MAX)
        } else {
            (-(1 << (width - 1)), (1 << (width - 1)) - 1)
        }
    }

    pub fn random(&self, source: &mut Source) -> i32 {
        self.wrap(source.next_u64n(1 << 32, u32::MAX as u64) as i64)
    }

    /// `v` reduced to the width, sign-extended.
    pub fn wrap(&self, v: i64) -> i32 {
        let shift: u32 = 64 - self.width() as u32;
        ((v << shift) >> shift) as i32
    }
}
