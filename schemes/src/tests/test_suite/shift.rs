use fhe16_sampling::Source;

use crate::{Ciphertext, tests::test_suite::TestContext};

pub fn test_lshift(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([11u8; 32]);
    let width: i32 = test_context.width() as i32;

    let a: i32 = test_context.random(&mut source);
    let a_enc: Ciphertext = test_context.encrypt(a, &mut source);
    [0, 1, 3, width - 1, width, width + 2, -1].iter().for_each(|amount| {
        let amount_enc: Ciphertext = test_context.encrypt(test_context.wrap(*amount as i64), &mut source);
        let res: Ciphertext = ctx.lshift(&a_enc, &amount_enc).unwrap();
        let shift: i64 = (*amount as i64).rem_euclid(width as i64);
        assert_eq!(
            test_context.decrypt(&res),
            test_context.wrap((a as i64) << shift),
            "a={} amount={}",
            a,
            amount
        );
    });
}

/// Each barrel-shifter stage is one select per digit.
pub fn test_lshift_cost(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([11u8; 32]);
    let width: u64 = test_context.width() as u64;
    let a: Ciphertext = test_context.encrypt(3, &mut source);
    let amount: Ciphertext = test_context.encrypt(2, &mut source);
    let before: u64 = ctx.bootstrap_count();
    let res: Ciphertext = ctx.lshift(&a, &amount).unwrap();
    assert_eq!(ctx.bootstrap_count() - before, width * width.trailing_zeros() as u64);
    assert_eq!(test_context.decrypt(&res), 12);
}
