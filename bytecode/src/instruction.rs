//! The fixed-width instruction record and its operand encoding.

use crate::opcode::Opcode;

/// Size of one serialized instruction in bytes: five f32 slots.
pub const INSTRUCTION_SIZE: usize = 20;

/// Number of 32-bit float slots per instruction (opcode plus four operands).
pub const SLOTS_PER_INSTRUCTION: usize = 5;

/// Maximum number of instructions in one program.
pub const MAX_PROGRAM_SIZE: usize = 8192;

/// Number of registers in the VM register file.
pub const MAX_REGISTERS: usize = 512;

/// Largest encodable jump distance in bytes (16-bit, split low/high).
pub const MAX_JUMP_DISTANCE: usize = 65535;

/// High bit that marks an operand as a register reference rather than an
/// immediate value.
pub const REGISTER_TAG: u16 = 0x8000;

/// One instruction operand.
///
/// The wire format is a single f32 per operand with the register/immediate
/// distinction encoded in-band: a register reference serializes as
/// `REGISTER_TAG | index`. The distinction is kept explicit here and only
/// flattened at serialization time.
///
/// Note the in-band encoding means an immediate of 32768.0 or above would
/// alias a register reference at runtime. Register indices are bounded by
/// [`MAX_REGISTERS`] and the language's numeric parameters stay far below
/// that range, but nothing checks for a collision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    /// A literal numeric value, stored as-is.
    Immediate(f32),
    /// A reference to a VM register by index.
    Register(u16),
}

impl Operand {
    /// Flattens the operand to its wire representation.
    pub fn encode(&self) -> f32 {
        match self {
            Operand::Immediate(value) => *value,
            Operand::Register(index) => (REGISTER_TAG | index) as f32,
        }
    }

    /// An unused operand slot.
    pub fn unused() -> Self {
        Operand::Immediate(0.0)
    }
}

impl From<f32> for Operand {
    fn from(value: f32) -> Self {
        Operand::Immediate(value)
    }
}

/// One compiled instruction: an opcode and four operands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: [Operand; 4],
}

impl Instruction {
    /// Creates an instruction with all four operand slots unused.
    pub fn nullary(opcode: Opcode) -> Self {
        Instruction {
            opcode,
            operands: [Operand::unused(); 4],
        }
    }

    /// Creates an instruction with one meaningful operand.
    pub fn unary(opcode: Opcode, a: Operand) -> Self {
        Instruction {
            opcode,
            operands: [a, Operand::unused(), Operand::unused(), Operand::unused()],
        }
    }

    /// Creates an instruction with two meaningful operands.
    pub fn binary(opcode: Opcode, a: Operand, b: Operand) -> Self {
        Instruction {
            opcode,
            operands: [a, b, Operand::unused(), Operand::unused()],
        }
    }

    /// Creates an instruction with three meaningful operands.
    pub fn ternary(opcode: Opcode, a: Operand, b: Operand, c: Operand) -> Self {
        Instruction {
            opcode,
            operands: [a, b, c, Operand::unused()],
        }
    }

    /// Serializes the instruction to its five wire slots.
    pub fn to_slots(&self) -> [f32; SLOTS_PER_INSTRUCTION] {
        [
            self.opcode as u8 as f32,
            self.operands[0].encode(),
            self.operands[1].encode(),
            self.operands[2].encode(),
            self.operands[3].encode(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_when_immediate_then_encodes_value() {
        assert_eq!(Operand::Immediate(75.0).encode(), 75.0);
        assert_eq!(Operand::Immediate(-1.5).encode(), -1.5);
    }

    #[test]
    fn operand_when_register_then_encodes_tagged_index() {
        assert_eq!(Operand::Register(0).encode(), 32768.0);
        assert_eq!(Operand::Register(3).encode(), 32771.0);
        assert_eq!(Operand::Register(511).encode(), 33279.0);
    }

    #[test]
    fn instruction_when_serialized_then_five_slots() {
        let inst = Instruction::binary(
            Opcode::MotorDrive,
            Operand::Immediate(0.0),
            Operand::Immediate(50.0),
        );
        assert_eq!(inst.to_slots(), [60.0, 0.0, 50.0, 0.0, 0.0]);
    }

    #[test]
    fn instruction_when_nullary_then_operands_zero() {
        let inst = Instruction::nullary(Opcode::End);
        assert_eq!(inst.to_slots(), [1.0, 0.0, 0.0, 0.0, 0.0]);
    }
}
