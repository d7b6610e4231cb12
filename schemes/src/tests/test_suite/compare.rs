use fhe16_sampling::Source;

use crate::{Ciphertext, MinMax, Predicate, tests::test_suite::TestContext};

pub fn test_compare(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([6u8; 32]);
    let (min, max) = test_context.bounds();

    let ge = |a: i32, b: i32, source: &mut Source| -> bool {
        let res: Ciphertext = ctx
            .compare(
                &test_context.encrypt(a, source),
                &test_context.encrypt(b, source),
                Predicate::Ge,
            )
            .unwrap();
        assert!(res.is_flag());
        assert!(res.is_canonical());
        test_context.decrypt_bit(&res)
    };
    assert!(ge(5, 5, &mut source));
    assert!(!ge(3, 5, &mut source));
    assert!(ge(-1, -2, &mut source));
    assert!(ge(max, min, &mut source));
    assert!(!ge(min, max, &mut source));
    assert!(!ge(-1, 0, &mut source));

    let mut pairs: Vec<(i32, i32)> = vec![(0, 0), (min, min), (1, -1), (-1, 1), (min, -1)];
    pairs.extend((0..3).map(|_| {
        let a: i32 = test_context.random(&mut source);
        (a, test_context.random(&mut source))
    }));
    pairs.push((pairs[6].0, pairs[6].0));

    pairs.iter().for_each(|(a, b)| {
        let a_enc: Ciphertext = test_context.encrypt(*a, &mut source);
        let b_enc: Ciphertext = test_context.encrypt(*b, &mut source);
        Predicate::ALL.iter().for_each(|p| {
            let res: Ciphertext = ctx.compare(&a_enc, &b_enc, *p).unwrap();
            assert_eq!(test_context.decrypt_bit(&res), p.eval(*a, *b), "{} {:?} {}", a, p, b);
        });
        assert_eq!(test_context.decrypt_bit(&ctx.eq(&a_enc, &b_enc).unwrap()), a == b);
        assert_eq!(test_context.decrypt_bit(&ctx.neq(&a_enc, &b_enc).unwrap()), a != b);
    });
}

pub fn test_compare_lazy_operands(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([6u8; 32]);
    (0..3).for_each(|_| {
        let a: i32 = test_context.random(&mut source);
        let b: i32 = test_context.random(&mut source);
        let a_enc: Ciphertext = test_context.encrypt(a, &mut source);
        let b_enc: Ciphertext = test_context.encrypt(b, &mut source);
        let sum: Ciphertext = ctx.add(&a_enc, &b_enc).unwrap();
        let diff: Ciphertext = ctx.sub(&a_enc, &b_enc).unwrap();
        let res: Ciphertext = ctx.compare(&sum, &diff, Predicate::Lt).unwrap();
        let want: bool = test_context.wrap(a as i64 + b as i64) < test_context.wrap(a as i64 - b as i64);
        assert_eq!(test_context.decrypt_bit(&res), want, "a={} b={}", a, b);
    });
}

pub fn test_max_or_min(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([6u8; 32]);
    let (min, max) = test_context.bounds();
    [(3, 9), (-4, -9), (min, max), (7, 7)].iter().for_each(|(a, b)| {
        let a_enc: Ciphertext = test_context.encrypt(*a, &mut source);
        let b_enc: Ciphertext = test_context.encrypt(*b, &mut source);
        let hi: Ciphertext = ctx.max_or_min(&a_enc, &b_enc, MinMax::Max).unwrap();
        let lo: Ciphertext = ctx.min(&a_enc, &b_enc).unwrap();
        assert_eq!(test_context.decrypt(&hi), *a.max(b));
        assert_eq!(test_context.decrypt(&lo), *a.min(b));
        assert_eq!(test_context.decrypt(&ctx.max(&b_enc, &a_enc).unwrap()), *a.max(b));
    });
}

/// Bootstrapped outputs are canonical: they take 25 more additions.
pub fn test_bootstrapped_outputs_capacity(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([6u8; 32]);
    let a: Ciphertext = test_context.encrypt(11, &mut source);
    let b: Ciphertext = test_context.encrypt(-3, &mut source);
    let flag: Ciphertext = ctx.compare(&a, &b, Predicate::Gt).unwrap();

    let outputs: Vec<(Ciphertext, i64)> = vec![
        (ctx.smull(&a, &b).unwrap(), -33),
        (flag.clone(), 1),
        (ctx.select(&flag, &a, &b).unwrap(), 11),
    ];

    outputs.into_iter().for_each(|(ct, value)| {
        assert!(ct.is_canonical());
        let mut acc: Ciphertext = ct;
        let mut want: i64 = value;
        (0..25).for_each(|_| {
            acc = ctx.add(&acc, &test_context.encrypt(1, &mut source)).unwrap();
            want += 1;
        });
        assert_eq!(test_context.decrypt(&acc), test_context.wrap(want));
    });
}

/// Compare costs one bootstrap per digit on canonical operands.
pub fn test_compare_cost(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([6u8; 32]);
    let a: Ciphertext = test_context.encrypt(1, &mut source);
    let b: Ciphertext = test_context.encrypt(2, &mut source);
    let before: u64 = ctx.bootstrap_count();
    ctx.compare(&a, &b, Predicate::Le).unwrap();
    assert_eq!(ctx.bootstrap_count() - before, test_context.width() as u64);
}
