use fhe16_core::{Error, ParameterSet};
use fhe16_sampling::Source;

use crate::{Ciphertext, tests::test_suite::TestContext};

pub fn test_ciphertext_codec(test_context: &TestContext) {
    let params: &ParameterSet = test_context.ctx.params();
    let mut source: Source = Source::new([4u8; 32]);

    let ct: Ciphertext = test_context.encrypt(-123, &mut source).with_tag(0xdead_beef);
    let bytes: Vec<u8> = ct.to_bytes();
    assert_eq!(bytes.len(), params.ciphertext_bytes());
    assert!(bytes.len() <= fhe16_core::params::MAX_CIPHERTEXT_BYTES);

    let decoded: Ciphertext = Ciphertext::from_bytes(params, &bytes).unwrap();
    assert_eq!(decoded, ct);
    assert_eq!(decoded.to_bytes(), bytes);
    assert_eq!(decoded.tag(), 0xdead_beef);
    assert_eq!(test_context.decrypt(&decoded), -123);

    let words: Vec<u32> = ct.to_words();
    assert_eq!(words.len(), params.ciphertext_words());
    assert_eq!(Ciphertext::from_words(params, &words).unwrap(), ct);

    // Lazy ciphertexts keep their range and noise level.
    let sum: Ciphertext = test_context.ctx.sub(&ct, &ct).unwrap();
    let decoded: Ciphertext = Ciphertext::from_bytes(params, &sum.to_bytes()).unwrap();
    assert_eq!(decoded.digit_range(), (-1, 1));
    assert_eq!(decoded.noise_level(), 2);
    assert_eq!(test_context.decrypt(&decoded), 0);
}

pub fn test_ciphertext_cid(test_context: &TestContext) {
    let mut source: Source = Source::new([4u8; 32]);
    let a: Ciphertext = test_context.encrypt(7, &mut source);
    let b: Ciphertext = test_context.encrypt(7, &mut source);
    assert_eq!(a.cid(), a.clone().cid());
    assert_eq!(
        a.cid(),
        Ciphertext::from_bytes(test_context.ctx.params(), &a.to_bytes())
            .unwrap()
            .cid()
    );
    assert_ne!(a.cid(), b.cid());
    assert_ne!(a.cid(), a.clone().with_tag(1).cid());
}

pub fn test_ciphertext_codec_rejects(test_context: &TestContext) {
    let params: &ParameterSet = test_context.ctx.params();
    let mut source: Source = Source::new([4u8; 32]);
    let bytes: Vec<u8> = test_context.encrypt(1, &mut source).to_bytes();

    assert!(matches!(
        Ciphertext::from_bytes(params, &bytes[..bytes.len() - 4]),
        Err(Error::MalformedCiphertext(_))
    ));
    let mut longer: Vec<u8> = bytes.clone();
    longer.extend_from_slice(&[0u8; 4]);
    assert!(matches!(
        Ciphertext::from_bytes(params, &longer),
        Err(Error::MalformedCiphertext(_))
    ));

    let corrupt = |word: usize, value: u32| -> Vec<u8> {
        let mut b: Vec<u8> = bytes.clone();
        b[word * 4..word * 4 + 4].copy_from_slice(&value.to_le_bytes());
        b
    };

    // magic, version, kind, width, range, reserved
    [(0, 0u32), (1, 2), (6, 7), (7, 16), (8, 1), (9, (-1i32) as u32), (12, 1)]
        .iter()
        .for_each(|(word, value)| {
            assert!(
                matches!(
                    Ciphertext::from_bytes(params, &corrupt(*word, *value)),
                    Err(Error::MalformedCiphertext(_))
                ),
                "word={}",
                word
            );
        });

    assert!(matches!(
        Ciphertext::from_bytes(params, &corrupt(2, 0x1234_5678)),
        Err(Error::InvalidParameterSet(_))
    ));

    let other: ParameterSet = params.with_width(if params.width == 8 { 16 } else { 8 });
    assert!(matches!(
        Ciphertext::from_bytes(&other, &bytes),
        Err(Error::MalformedCiphertext(_))
    ));
}
