use core::fmt;

/// Errors that can occur when building or decoding an instruction stream.
#[derive(Debug)]
pub enum BytecodeError {
    /// An opcode byte has no corresponding instruction.
    InvalidOpcode(u8),
    /// The program grew past the instruction count limit.
    ProgramTooLarge,
    /// A patch targeted an instruction index that does not exist.
    PatchOutOfBounds(usize),
    /// A patch targeted an instruction that is not a forward jump.
    PatchNotAJump(u8),
}

impl fmt::Display for BytecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BytecodeError::InvalidOpcode(value) => write!(f, "invalid opcode: {value}"),
            BytecodeError::ProgramTooLarge => write!(f, "program exceeds maximum size"),
            BytecodeError::PatchOutOfBounds(index) => {
                write!(f, "patch index out of bounds: {index}")
            }
            BytecodeError::PatchNotAJump(value) => {
                write!(f, "patch target is not a jump instruction: opcode {value}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BytecodeError {}
