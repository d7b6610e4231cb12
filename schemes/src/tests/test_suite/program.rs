use fhe16_core::Error;
use fhe16_sampling::Source;

use crate::{Ciphertext, Op, Program, programs, tests::test_suite::TestContext};

pub fn test_withdraw_with_check(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([14u8; 32]);
    let program: Program = programs::withdraw_with_check();

    [(100, 30, 70, true), (20, 30, 20, false), (30, 30, 0, true)]
        .iter()
        .for_each(|(balance, amount, want, ok)| {
            let inputs: Vec<Ciphertext> = vec![
                test_context.encrypt(*balance, &mut source),
                test_context.encrypt(*amount, &mut source),
            ];
            let outputs: Vec<Ciphertext> = program.run(ctx, &inputs).unwrap();
            assert_eq!(outputs.len(), 2);
            assert_eq!(test_context.decrypt(&outputs[0]), *want);
            assert_eq!(test_context.decrypt_bit(&outputs[1]), *ok);
        });
}

pub fn test_program_run(test_context: &TestContext) {
    let ctx = &test_context.ctx;
    let mut source: Source = Source::new([14u8; 32]);

    // (a - b * 3, (a / b).remainder, !(a < b))
    let program: Program = Program::new(
        "mixed",
        2,
        vec![
            Op::MulConst(1, 3),
            Op::Sub(0, 2),
            Op::Sdiv(0, 1),
            Op::Compare(crate::Predicate::Lt, 0, 1),
            Op::Not(7),
        ],
        vec![3, 5, 8],
    );
    let inputs: Vec<Ciphertext> = vec![
        test_context.encrypt(23, &mut source),
        test_context.encrypt(5, &mut source),
    ];
    let outputs: Vec<Ciphertext> = program.run(ctx, &inputs).unwrap();
    assert_eq!(test_context.decrypt(&outputs[0]), 8);
    assert_eq!(test_context.decrypt(&outputs[1]), 3);
    assert!(test_context.decrypt_bit(&outputs[2]));

    assert!(matches!(
        program.run(ctx, &inputs[..1]),
        Err(Error::InvalidProgram(_))
    ));
}
