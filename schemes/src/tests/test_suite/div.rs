use fhe16_sampling::Source;

use crate::{Ciphertext, Division, tests::test_suite::TestContext};

fn sdiv(test_context: &TestContext, a: i32, b: i32, source: &mut Source) -> (i32, i32, bool) {
    let a_enc: Ciphertext = test_context.encrypt(a, source);
    let b_enc: Ciphertext = test_context.encrypt(b, source);
    let Division {
        quotient,
        remainder,
        is_zero,
    } = test_context.ctx.sdiv(&a_enc, &b_enc).unwrap();
    assert!(quotient.is_canonical());
    assert!(remainder.is_canonical());
    assert!(is_zero.is_flag());
    (
        test_context.decrypt(&quotient),
        test_context.decrypt(&remainder),
        test_context.decrypt_bit(&is_zero),
    )
}

pub fn test_sdiv(test_context: &TestContext) {
    let mut source: Source = Source::new([10u8; 32]);
    assert_eq!(sdiv(test_context, 7, 2, &mut source), (3, 1, false));
}

pub fn test_sdiv_signs(test_context: &TestContext) {
    let mut source: Source = Source::new([10u8; 32]);
    let (min, max) = test_context.bounds();
    [(-7, 2), (7, -2), (-7, -2), (max, 3), (min, 3), (5, 9), (0, -4), (-100, 7)]
        .iter()
        .for_each(|(a, b)| {
            let want: (i32, i32, bool) = (
                test_context.wrap(a.wrapping_div(*b) as i64),
                a.wrapping_rem(*b),
                false,
            );
            assert_eq!(sdiv(test_context, *a, *b, &mut source), want, "a={} b={}", a, b);
        });
}

pub fn test_sdiv_edge_cases(test_context: &TestContext) {
    let mut source: Source = Source::new([10u8; 32]);
    let (min, _) = test_context.bounds();

    assert_eq!(sdiv(test_context, 5, 0, &mut source), (-1, 5, true));
    assert_eq!(sdiv(test_context, 0, 0, &mut source), (-1, 0, true));
    assert_eq!(sdiv(test_context, -5, 0, &mut source), (1, -5, true));
    assert_eq!(sdiv(test_context, min, 0, &mut source), (1, min, true));
    assert_eq!(sdiv(test_context, min, -1, &mut source), (min, 0, false));
}
