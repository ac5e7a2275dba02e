#![no_std]

#[cfg(feature = "std")]
extern crate std;

// Always available (no_std)
mod device;
mod error;
mod instruction;
pub mod opcode;

// Only available with std
#[cfg(feature = "std")]
mod program;

// Always-available re-exports
pub use device::{
    tone_frequency, Color, CompareOp, Direction, Sensor, LED_BRIGHTNESS,
};
pub use error::BytecodeError;
pub use instruction::{
    Instruction, Operand, INSTRUCTION_SIZE, MAX_JUMP_DISTANCE, MAX_PROGRAM_SIZE, MAX_REGISTERS,
    REGISTER_TAG, SLOTS_PER_INSTRUCTION,
};
pub use opcode::Opcode;

// std-only re-exports
#[cfg(feature = "std")]
pub use program::Program;
