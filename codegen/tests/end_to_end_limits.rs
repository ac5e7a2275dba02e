//! End-to-end tests for resource-limit failures. Each limit must fail the
//! whole compilation before any bytecode is returned.

mod common;

use std::fmt::Write;

use edubot_codegen::compile;

#[test]
fn compile_when_513_declarations_then_register_count_error() {
    let mut source = String::new();
    for n in 0..513 {
        writeln!(source, "float var{n} = {n};").unwrap();
    }
    let err = compile(&source).unwrap_err();
    assert_eq!(err.code, "E0301");
    assert!(err.description().contains("exceeds maximum register count"));
}

#[test]
fn compile_when_512_declarations_then_every_register_used() {
    let mut source = String::new();
    for n in 0..512 {
        writeln!(source, "float var{n} = {n};").unwrap();
    }
    let program = compile(&source).unwrap();
    assert_eq!(program.len(), 513); // declarations plus End
}

#[test]
fn compile_when_branch_body_too_long_then_jump_distance_error() {
    // 3280 instructions * 20 bytes is past the 16-bit distance limit.
    let body = "wait(1); ".repeat(3280);
    let err = compile(&format!("if (1 > 2) {{ {body} }}")).unwrap_err();
    assert_eq!(err.code, "E0303");
    assert!(err.description().contains("Jump distance too large"));
}

#[test]
fn compile_when_branch_body_at_limit_then_ok() {
    // 3274 body instructions: the guard skips body + chain = within range.
    let body = "wait(1); ".repeat(3274);
    assert!(compile(&format!("if (1 > 2) {{ {body} }}")).is_ok());
}

#[test]
fn compile_when_too_many_instructions_then_program_size_error() {
    let source = "wait(1); ".repeat(8200);
    let err = compile(&source).unwrap_err();
    assert_eq!(err.code, "E0302");
    assert!(err.description().contains("exceeds maximum instruction count"));
}
