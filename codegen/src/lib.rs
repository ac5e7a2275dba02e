#![allow(clippy::result_large_err)]
//! Compiler for the edubot robot language.
//!
//! This crate turns a restricted C++-like source text into the fixed-width
//! bytecode the on-device VM executes: five 32-bit float slots per
//! instruction, one opcode and four operands.
//!
//! Compilation is a single forward pass over a flat statement list:
//!
//! 1. sanitize: strip comments, isolate braces and `else` boundaries,
//!    normalize whitespace
//! 2. validate: bracket balance over the sanitized text
//! 3. match: classify each statement against an ordered grammar table
//! 4. lower: the block-stack state machine emits instructions, resolving
//!    operands and backpatching forward jumps at block boundaries
//! 5. serialize: flatten the instruction arena to the wire buffer
//!
//! # Example
//!
//! ```
//! use edubot_codegen::compile_to_bytes;
//!
//! let source = "
//! for (int i = 0; i < 3; i++) {
//!     all_leds.set_color(GREEN);
//!     wait(0.5);
//!     all_leds.set_color(OFF);
//! }
//! ";
//! let bytes = compile_to_bytes(source).unwrap();
//! assert_eq!(bytes.len() % 20, 0);
//! ```

mod command;
mod compile;
mod diagnostic;
mod emit;
mod operand;
mod sanitize;
mod validate;

pub use compile::{compile, compile_to_bytes};
pub use diagnostic::Diagnostic;
