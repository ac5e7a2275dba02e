//! Instruction opcodes shared between the compiler and the on-device VM.
//!
//! Every instruction occupies five 32-bit float slots: the opcode followed
//! by four operands whose meaning depends on the opcode.

/// Operation selector for a single instruction.
///
/// The discriminant values are part of the wire format and must not change
/// between releases without a corresponding firmware update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Does nothing for one instruction cycle.
    Nop = 0,
    /// Terminates the program. Always the final instruction.
    End = 1,
    /// Pauses execution. Operand 1: seconds.
    Wait = 2,
    /// Blocks until the left button is pressed.
    WaitForButton = 3,
    /// Samples the right button. Operand 1: destination register.
    CheckRightButtonPress = 4,

    /// Sets every LED to one color. Operands 1-3: red, green, blue channels.
    SetAllLeds = 10,

    /// Reads a sensor into a register. Operand 1: sensor id,
    /// operand 2: destination register, operand 3: sensor-specific argument.
    ReadSensor = 20,

    /// Compares two values. Operand 1: comparison operator code,
    /// operands 2-3: left and right values. Sets the VM condition flag.
    Compare = 30,
    /// Unconditional forward jump. Operands 1-2: byte distance, low/high.
    Jump = 31,
    /// Forward jump taken when the condition flag is set.
    JumpIfTrue = 32,
    /// Forward jump taken when the condition flag is clear.
    JumpIfFalse = 33,
    /// Unconditional backward jump. Operands 1-2: byte distance, low/high.
    JumpBackward = 34,
    /// Marks the top of a `while (true)` loop.
    WhileStart = 35,
    /// Jumps backward to the matching WhileStart. Operands 1-2: byte
    /// distance, low/high.
    WhileEnd = 36,
    /// Initializes a loop counter. Operand 1: counter register,
    /// operand 2: initial value.
    ForInit = 37,
    /// Tests a loop counter. Operand 1: counter register,
    /// operand 2: limit value. Sets the VM condition flag.
    ForCondition = 38,
    /// Adds one to a loop counter. Operand 1: counter register.
    ForIncrement = 39,

    /// Declares a variable. Operand 1: register, operand 2: initial value,
    /// operand 3: type code (0 float, 1 int, 2 bool).
    DeclareVar = 50,
    /// Assigns to a variable. Operand 1: register, operand 2: value.
    SetVar = 51,

    /// Drives both motors. Operand 1: direction code, operand 2: throttle.
    MotorDrive = 60,
    /// Stops both motors.
    MotorStop = 61,
    /// Turns in place by an angle. Operand 1: direction code,
    /// operand 2: degrees.
    MotorTurn = 62,
    /// Drives for a duration. Operands 1-3: direction, throttle, seconds.
    MotorDriveTime = 63,
    /// Drives a distance. Operands 1-3: direction, throttle, centimeters.
    MotorDriveDistance = 64,
    /// Spins in place continuously. Operand 1: direction code,
    /// operand 2: throttle.
    MotorSpin = 65,

    /// Plays a built-in sound. Operand 1: sound id.
    PlaySound = 70,
    /// Plays a tone. Operand 1: frequency in Hz.
    PlayTone = 71,
}

impl Opcode {
    /// Whether this opcode carries a forward jump distance that the compiler
    /// patches after emission (operands 1 and 2, low/high byte).
    pub fn is_patchable_jump(&self) -> bool {
        matches!(self, Opcode::Jump | Opcode::JumpIfTrue | Opcode::JumpIfFalse)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = crate::BytecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let opcode = match value {
            0 => Opcode::Nop,
            1 => Opcode::End,
            2 => Opcode::Wait,
            3 => Opcode::WaitForButton,
            4 => Opcode::CheckRightButtonPress,
            10 => Opcode::SetAllLeds,
            20 => Opcode::ReadSensor,
            30 => Opcode::Compare,
            31 => Opcode::Jump,
            32 => Opcode::JumpIfTrue,
            33 => Opcode::JumpIfFalse,
            34 => Opcode::JumpBackward,
            35 => Opcode::WhileStart,
            36 => Opcode::WhileEnd,
            37 => Opcode::ForInit,
            38 => Opcode::ForCondition,
            39 => Opcode::ForIncrement,
            50 => Opcode::DeclareVar,
            51 => Opcode::SetVar,
            60 => Opcode::MotorDrive,
            61 => Opcode::MotorStop,
            62 => Opcode::MotorTurn,
            63 => Opcode::MotorDriveTime,
            64 => Opcode::MotorDriveDistance,
            65 => Opcode::MotorSpin,
            70 => Opcode::PlaySound,
            71 => Opcode::PlayTone,
            _ => return Err(crate::BytecodeError::InvalidOpcode(value)),
        };
        Ok(opcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_when_round_trip_then_same_value() {
        for value in 0u8..=80 {
            if let Ok(opcode) = Opcode::try_from(value) {
                assert_eq!(opcode as u8, value);
            }
        }
    }

    #[test]
    fn opcode_when_unknown_value_then_error() {
        assert!(Opcode::try_from(255).is_err());
    }

    #[test]
    fn opcode_when_forward_jump_then_patchable() {
        assert!(Opcode::Jump.is_patchable_jump());
        assert!(Opcode::JumpIfTrue.is_patchable_jump());
        assert!(Opcode::JumpIfFalse.is_patchable_jump());
        assert!(!Opcode::JumpBackward.is_patchable_jump());
        assert!(!Opcode::WhileEnd.is_patchable_jump());
        assert!(!Opcode::Compare.is_patchable_jump());
    }
}
