use fhe16_core::Error;
use fhe16_sampling::Source;

use crate::{Ciphertext, CiphertextKind, LogicOp, tests::test_suite::TestContext};

pub fn test_logic_flags(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([8u8; 32]);
    [(false, false), (false, true), (true, false), (true, true)]
        .iter()
        .for_each(|(a, b)| {
            let a_enc: Ciphertext = test_context.encrypt_bit(*a, &mut source);
            let b_enc: Ciphertext = test_context.encrypt_bit(*b, &mut source);

            let before: u64 = ctx.bootstrap_count();
            let res: Ciphertext = ctx.and(&a_enc, &b_enc).unwrap();
            assert!(ctx.bootstrap_count() - before >= 1);
            assert!(res.is_flag());
            assert_eq!(test_context.decrypt_bit(&res), *a && *b);
            assert_eq!(test_context.decrypt_bit(&ctx.or(&a_enc, &b_enc).unwrap()), *a || *b);
            assert_eq!(test_context.decrypt_bit(&ctx.xor(&a_enc, &b_enc).unwrap()), *a ^ *b);
        });
}

pub fn test_logic_bitwise(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([8u8; 32]);
    (0..3).for_each(|_| {
        let a: i32 = test_context.random(&mut source);
        let b: i32 = test_context.random(&mut source);
        let a_enc: Ciphertext = test_context.encrypt(a, &mut source);
        let b_enc: Ciphertext = test_context.encrypt(b, &mut source);

        let res: Ciphertext = ctx.logic(&a_enc, &b_enc, LogicOp::And).unwrap();
        assert_eq!(res.kind(), CiphertextKind::Int);
        assert_eq!(test_context.decrypt(&res), a & b);
        assert_eq!(test_context.decrypt(&ctx.or(&a_enc, &b_enc).unwrap()), a | b);
        assert_eq!(test_context.decrypt(&ctx.xor(&a_enc, &b_enc).unwrap()), a ^ b);
    });
}

pub fn test_logic_vec(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([8u8; 32]);
    let bits_a: [bool; 3] = [true, false, true];
    let bits_b: [bool; 3] = [true, true, false];
    let a: Vec<Ciphertext> = bits_a.iter().map(|x| test_context.encrypt_bit(*x, &mut source)).collect();
    let b: Vec<Ciphertext> = bits_b.iter().map(|x| test_context.encrypt_bit(*x, &mut source)).collect();

    let decrypt = |cts: Vec<Ciphertext>| -> Vec<bool> { cts.iter().map(|ct| test_context.decrypt_bit(ct)).collect() };

    assert_eq!(decrypt(ctx.and_vec(&a, &b).unwrap()), vec![true, false, false]);
    assert_eq!(decrypt(ctx.or_vec(&a, &b).unwrap()), vec![true, true, true]);
    assert_eq!(decrypt(ctx.xor_vec(&a, &b).unwrap()), vec![false, true, true]);
    assert!(matches!(
        ctx.and_vec(&a, &b[..2]),
        Err(Error::LengthMismatch { left: 3, right: 2 })
    ));
}
