use std::path::Path;

use fhe16_core::{Error, EvaluationKey, ParameterSet, SecretKey};
use fhe16_sampling::Source;
use tempfile::tempdir;

use crate::{Ciphertext, CryptoContext, tests::test_suite::TestContext};

pub fn test_reload_boot_param(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([13u8; 32]);
    let a: Ciphertext = test_context.encrypt(6, &mut source);
    let b: Ciphertext = test_context.encrypt(-7, &mut source);

    assert!(ctx.is_initialized());
    assert_eq!(ctx.boot_key_id(), Some(test_context.sk.key_id()));
    assert!(ctx.load_boot_param(&test_context.evk).is_ok());
    assert!(ctx.load_boot_param_bytes(&test_context.evk.to_bytes().unwrap()).is_ok());
    assert_eq!(test_context.decrypt(&ctx.smull(&a, &b).unwrap()), -42);

    let (_, other): (SecretKey, EvaluationKey) = ctx.generate_keys(&mut source).unwrap();
    assert!(matches!(ctx.load_boot_param(&other), Err(Error::BootParamMismatch(_))));
    assert_eq!(ctx.boot_key_id(), Some(test_context.sk.key_id()));
    assert_eq!(test_context.decrypt(&ctx.smull(&a, &b).unwrap()), -42);
}

pub fn test_not_initialized(test_context: &TestContext) {
    let ctx: CryptoContext = CryptoContext::new(*test_context.ctx.params()).unwrap();
    let mut source: Source = Source::new([13u8; 32]);
    let a: Ciphertext = ctx.encrypt_int(&test_context.sk, 3, &mut source).unwrap();
    let b: Ciphertext = ctx.encrypt_int(&test_context.sk, 4, &mut source).unwrap();

    assert!(!ctx.is_initialized());
    assert!(matches!(ctx.smull(&a, &b), Err(Error::NotInitialized)));
    assert!(matches!(ctx.refresh(&a), Err(Error::NotInitialized)));
    assert!(matches!(ctx.sdiv(&a, &b), Err(Error::NotInitialized)));
    assert_eq!(ctx.bootstrap_count(), 0);

    // The linear layer needs no boot parameters.
    let sum: Ciphertext = ctx.add(&a, &b).unwrap();
    assert_eq!(ctx.decrypt_int(&test_context.sk, &sum).unwrap(), 7);

    ctx.load_boot_param_bytes(&test_context.evk.to_bytes().unwrap()).unwrap();
    assert_eq!(ctx.decrypt_int(&test_context.sk, &ctx.smull(&a, &b).unwrap()).unwrap(), 12);
    ctx.shutdown();
}

pub fn test_cross_key(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([13u8; 32]);
    let (sk, _): (SecretKey, EvaluationKey) = ctx.generate_keys(&mut source).unwrap();

    let a: Ciphertext = test_context.encrypt(1, &mut source);
    let b: Ciphertext = ctx.encrypt_int(&sk, 2, &mut source).unwrap();

    assert!(matches!(ctx.add(&a, &b), Err(Error::InvalidParameterSet(_))));
    assert!(matches!(ctx.smull(&b, &b), Err(Error::InvalidParameterSet(_))));
    assert!(matches!(
        ctx.decrypt_int(&test_context.sk, &b),
        Err(Error::InvalidParameterSet(_))
    ));
    assert_eq!(ctx.decrypt_int(&sk, &b).unwrap(), 2);
}

pub fn test_cross_parameters(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([13u8; 32]);
    let params = ctx.params().with_width(16);
    let other: CryptoContext = CryptoContext::new(params).unwrap();
    let (sk, evk): (SecretKey, EvaluationKey) = other.generate_keys(&mut source).unwrap();

    let a: Ciphertext = test_context.encrypt(1, &mut source);
    let b: Ciphertext = other.encrypt_int(&sk, 1, &mut source).unwrap();
    assert!(matches!(ctx.add(&a, &b), Err(Error::InvalidParameterSet(_))));
    assert!(matches!(
        ctx.encrypt_int(&sk, 1, &mut source),
        Err(Error::InvalidParameterSet(_))
    ));
    assert!(matches!(
        ctx.load_boot_param_bytes(&evk.to_bytes().unwrap()),
        Err(Error::BootParamMismatch(_))
    ));
}

pub fn test_key_files(test_context: &TestContext) {
    let params: ParameterSet = *test_context.ctx.params();
    let mut source: Source = Source::new([14u8; 32]);
    let dir = tempdir().unwrap();
    let sk_path = dir.path().join("secret.bin");
    let boot_path = dir.path().join("bootparam.bin");

    test_context.sk.save_to_file(&sk_path).unwrap();
    test_context.evk.save_to_file(&boot_path).unwrap();

    let sk: SecretKey = SecretKey::load_from_file(&params, &sk_path).unwrap();
    assert_eq!(sk.key_id(), test_context.sk.key_id());
    assert_eq!(sk.to_bytes().as_slice(), test_context.sk.to_bytes().as_slice());

    let ctx: CryptoContext = CryptoContext::new(params).unwrap();
    ctx.load_boot_param_file(&boot_path).unwrap();
    assert_eq!(ctx.boot_key_id(), Some(sk.key_id()));
    let a: Ciphertext = ctx.encrypt_int(&sk, 6, &mut source).unwrap();
    let b: Ciphertext = ctx.encrypt_int(&sk, -7, &mut source).unwrap();
    assert_eq!(ctx.decrypt_int(&sk, &ctx.smull(&a, &b).unwrap()).unwrap(), -42);
    assert_eq!(test_context.decrypt(&a), 6);

    fn truncate(path: &Path) {
        let bytes: Vec<u8> = std::fs::read(path).unwrap();
        std::fs::write(path, &bytes[..bytes.len() - 1]).unwrap();
    }

    truncate(&boot_path);
    let fresh: CryptoContext = CryptoContext::new(params).unwrap();
    assert!(matches!(
        fresh.load_boot_param_file(&boot_path),
        Err(Error::BootParamMismatch(_))
    ));
    assert!(!fresh.is_initialized());

    truncate(&sk_path);
    assert!(matches!(
        SecretKey::load_from_file(&params, &sk_path),
        Err(Error::MalformedKey(_))
    ));
    assert!(matches!(
        SecretKey::load_from_file(&params, dir.path().join("missing.bin")),
        Err(Error::Io(_))
    ));
}
