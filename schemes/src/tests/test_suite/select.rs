use fhe16_core::{Error, ParameterSet};
use fhe16_sampling::Source;

use crate::{Ciphertext, CiphertextKind, tests::test_suite::TestContext};

pub fn test_select(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([7u8; 32]);
    let (min, max) = test_context.bounds();

    [(5, -9), (min, max), (0, -1)].iter().for_each(|(a, b)| {
        let a_enc: Ciphertext = test_context.encrypt(*a, &mut source);
        let b_enc: Ciphertext = test_context.encrypt(*b, &mut source);
        [true, false].iter().for_each(|c| {
            let c_enc: Ciphertext = test_context.encrypt_bit(*c, &mut source);
            let res: Ciphertext = ctx.select(&c_enc, &a_enc, &b_enc).unwrap();
            assert_eq!(res.kind(), CiphertextKind::Int);
            assert!(res.is_canonical());
            assert_eq!(test_context.decrypt(&res), if *c { *a } else { *b });
        });
    });

    // Non-canonical operands and a negated condition.
    let a_enc: Ciphertext = ctx
        .add(&test_context.encrypt(40, &mut source), &test_context.encrypt(2, &mut source))
        .unwrap();
    let b_enc: Ciphertext = ctx.neg(&test_context.encrypt(3, &mut source)).unwrap();
    let c_enc: Ciphertext = ctx.not(&test_context.encrypt_bit(true, &mut source)).unwrap();
    assert_eq!(test_context.decrypt(&ctx.select(&c_enc, &a_enc, &b_enc).unwrap()), -3);

    let x: Ciphertext = test_context.encrypt_bit(true, &mut source);
    let y: Ciphertext = test_context.encrypt_bit(false, &mut source);
    let res: Ciphertext = ctx.select(&c_enc, &x, &y).unwrap();
    assert!(res.is_flag());
    assert!(!test_context.decrypt_bit(&res));
}

pub fn test_select_lazy_condition(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let params: &ParameterSet = ctx.params();
    let mut source: Source = Source::new([8u8; 32]);

    let as_flag = |ct: &Ciphertext| -> Ciphertext {
        let mut words: Vec<u32> = ct.to_words();
        words[6] = 1;
        Ciphertext::from_words(params, &words).unwrap()
    };

    // 2 - 1: digit 0 holds -1 and the value 1 needs a carry.
    let one: Ciphertext = as_flag(
        &ctx.sub(&test_context.encrypt(2, &mut source), &test_context.encrypt(1, &mut source))
            .unwrap(),
    );
    // -1 + 1: digit 0 holds 2 and the value wraps to 0.
    let zero: Ciphertext = as_flag(
        &ctx.add(&test_context.encrypt(-1, &mut source), &test_context.encrypt(1, &mut source))
            .unwrap(),
    );
    assert!(one.is_flag() && !one.is_canonical());
    assert!(zero.is_flag() && !zero.is_canonical());

    let a: Ciphertext = test_context.encrypt(5, &mut source);
    let b: Ciphertext = test_context.encrypt(-9, &mut source);
    assert_eq!(test_context.decrypt(&ctx.select(&one, &a, &b).unwrap()), 5);
    assert_eq!(test_context.decrypt(&ctx.select(&zero, &a, &b).unwrap()), -9);
}

pub fn test_select_requires_flag(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([7u8; 32]);
    let c: Ciphertext = test_context.encrypt(1, &mut source);
    let a: Ciphertext = test_context.encrypt(2, &mut source);
    assert!(matches!(
        ctx.select(&c, &a, &a),
        Err(Error::KindMismatch {
            expected: "Flag",
            found: "Int"
        })
    ));
}
