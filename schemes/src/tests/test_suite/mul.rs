use fhe16_sampling::Source;

use crate::{Ciphertext, tests::test_suite::TestContext};

pub fn test_smull(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([9u8; 32]);
    let (min, max) = test_context.bounds();

    let mut pairs: Vec<(i32, i32)> = vec![(123, -77), (max, 2), (min, -1), (-1, -1), (0, max)];
    pairs.push((test_context.random(&mut source), test_context.random(&mut source)));

    pairs.iter().for_each(|(a, b)| {
        let a_enc: Ciphertext = test_context.encrypt(test_context.wrap(*a as i64), &mut source);
        let b_enc: Ciphertext = test_context.encrypt(*b, &mut source);
        let res: Ciphertext = ctx.smull(&a_enc, &b_enc).unwrap();
        assert!(res.is_canonical());
        let want: i32 = test_context.wrap(test_context.wrap(*a as i64) as i64 * *b as i64);
        assert_eq!(test_context.decrypt(&res), want, "a={} b={}", a, b);
    });
}

pub fn test_smull_lazy_operands(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([9u8; 32]);
    let a: i32 = test_context.random(&mut source);
    let b: i32 = test_context.random(&mut source);
    let c: i32 = test_context.random(&mut source);
    let sum: Ciphertext = ctx
        .add(&test_context.encrypt(a, &mut source), &test_context.encrypt(b, &mut source))
        .unwrap();
    let c_enc: Ciphertext = ctx.mul_constant(&test_context.encrypt(c, &mut source), 3).unwrap();
    let res: Ciphertext = ctx.smull(&sum, &c_enc).unwrap();
    let want: i32 = test_context.wrap(test_context.wrap(a as i64 + b as i64) as i64 * test_context.wrap(c as i64 * 3) as i64);
    assert_eq!(test_context.decrypt(&res), want);
}
