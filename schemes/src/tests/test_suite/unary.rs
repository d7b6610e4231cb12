use fhe16_sampling::Source;

use crate::{Ciphertext, Predicate, tests::test_suite::TestContext};

pub fn test_relu(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([12u8; 32]);
    let (min, max) = test_context.bounds();
    let zero: Ciphertext = ctx.trivial_int(test_context.sk.key_id(), 0).unwrap();

    [0, 1, -1, 42, -42, min, max].iter().for_each(|a| {
        let a_enc: Ciphertext = test_context.encrypt(*a, &mut source);
        let res: Ciphertext = ctx.relu(&a_enc).unwrap();
        assert!(res.is_canonical());
        assert_eq!(test_context.decrypt(&res), (*a).max(0), "a={}", a);

        let flag: Ciphertext = ctx.compare(&a_enc, &zero, Predicate::Ge).unwrap();
        let unfused: Ciphertext = ctx.select(&flag, &a_enc, &zero).unwrap();
        assert_eq!(test_context.decrypt(&unfused), test_context.decrypt(&res));
    });
}

pub fn test_abs(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([12u8; 32]);
    let (min, max) = test_context.bounds();
    let zero: Ciphertext = ctx.trivial_int(test_context.sk.key_id(), 0).unwrap();

    [0, 1, -1, 42, -42, max, min].iter().for_each(|a| {
        let a_enc: Ciphertext = test_context.encrypt(*a, &mut source);
        let res: Ciphertext = ctx.abs(&a_enc).unwrap();
        assert!(res.is_canonical());
        assert_eq!(test_context.decrypt(&res), test_context.wrap((*a as i64).abs()), "a={}", a);

        let flag: Ciphertext = ctx.compare(&a_enc, &zero, Predicate::Ge).unwrap();
        let unfused: Ciphertext = ctx.select(&flag, &a_enc, &ctx.neg(&a_enc).unwrap()).unwrap();
        assert_eq!(test_context.decrypt(&unfused), test_context.decrypt(&res));
    });
}
