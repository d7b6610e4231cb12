use fhe16_core::Error;
use fhe16_sampling::Source;

use crate::{Ciphertext, CiphertextKind, tests::test_suite::TestContext};

pub fn test_encrypt_decrypt_int(test_context: &TestContext) {
    let mut source: Source = Source::new([2u8; 32]);
    let (min, max) = test_context.bounds();

    let mut values: Vec<i32> = vec![min, max, 0, -1, 1, min + 1, max - 1];
    values.extend((0..16).map(|_| test_context.random(&mut source)));

    values.iter().for_each(|v| {
        let ct: Ciphertext = test_context.encrypt(*v, &mut source);
        assert_eq!(ct.kind(), CiphertextKind::Int);
        assert!(ct.is_canonical());
        assert_eq!(ct.width(), test_context.width());
        assert_eq!(test_context.decrypt(&ct), *v);
    });
}

pub fn test_encrypt_decrypt_bit(test_context: &TestContext) {
    let mut source: Source = Source::new([2u8; 32]);
    [false, true].iter().for_each(|bit| {
        let ct: Ciphertext = test_context.encrypt_bit(*bit, &mut source);
        assert!(ct.is_flag());
        assert_eq!(test_context.decrypt_bit(&ct), *bit);
        assert_eq!(test_context.decrypt(&ct), *bit as i32);
    });

    let ct: Ciphertext = test_context.encrypt(2, &mut source);
    assert!(matches!(
        test_context.ctx.decrypt_bit(&test_context.sk, &ct),
        Err(Error::DecryptionOutOfRange(_))
    ));
}

pub fn test_encrypt_int_vec(test_context: &TestContext) {
    let mut source: Source = Source::new([2u8; 32]);
    let values: Vec<i32> = (0..8).map(|_| test_context.random(&mut source)).collect();
    let cts: Vec<Ciphertext> = test_context
        .ctx
        .encrypt_int_vec(&test_context.sk, &values, &mut source)
        .unwrap();
    assert_eq!(cts.len(), values.len());
    assert_eq!(
        test_context.ctx.decrypt_int_vec(&test_context.sk, &cts).unwrap(),
        values
    );
}

pub fn test_encoding_out_of_range(test_context: &TestContext) {
    let mut source: Source = Source::new([2u8; 32]);
    let (min, max) = test_context.bounds();
    if test_context.width() == 32 {
        return;
    }
    [max as i64 + 1, min as i64 - 1, i32::MAX as i64].iter().for_each(|v| {
        let res = test_context.ctx.encrypt_int(&test_context.sk, *v as i32, &mut source);
        assert!(
            matches!(res, Err(Error::EncodingOutOfRange { value, width }) if value == *v && width == test_context.width()),
            "v={}",
            v
        );
    });
}

pub fn test_trivial_int(test_context: &TestContext) {
    let mut source: Source = Source::new([2u8; 32]);
    let key_id: u64 = test_context.sk.key_id();
    let (min, max) = test_context.bounds();
    [min, max, 0, -1, 5].iter().for_each(|v| {
        let ct: Ciphertext = test_context.ctx.trivial_int(key_id, *v).unwrap();
        assert_eq!(ct.noise_level(), 0);
        assert!(ct.digits().iter().all(|d| d.mask().iter().all(|a| *a == 0)));
        assert_eq!(test_context.decrypt(&ct), *v);

        let x: Ciphertext = test_context.encrypt(3, &mut source);
        let sum: Ciphertext = test_context.ctx.add(&x, &ct).unwrap();
        assert_eq!(test_context.decrypt(&sum), test_context.wrap(*v as i64 + 3));
    });
}
