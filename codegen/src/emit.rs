//! Typed instruction emission over the growing [`Program`] arena.
//!
//! Forward jumps are emitted with a zero distance and patched through
//! [`Emitter::patch_forward_jump`] once the target index is known. Backward
//! jumps know their distance at emission time and are never patched.

use edubot_bytecode::{
    BytecodeError, Color, CompareOp, Direction, Instruction, Opcode, Operand, Program, Sensor,
    INSTRUCTION_SIZE, MAX_JUMP_DISTANCE,
};
use edubot_problems::Problem;

use crate::command::VarType;
use crate::diagnostic::Diagnostic;

pub struct Emitter {
    program: Program,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            program: Program::new(),
        }
    }

    /// Index the next emitted instruction will receive.
    pub fn len(&self) -> usize {
        self.program.len()
    }

    fn push(&mut self, instruction: Instruction) -> Result<usize, Diagnostic> {
        self.program.push(instruction).map_err(|_| {
            Diagnostic::problem(Problem::ProgramSizeExceeded)
        })
    }

    pub fn emit_set_all_leds(&mut self, color: Color) -> Result<usize, Diagnostic> {
        let (r, g, b) = color.rgb();
        self.push(Instruction::ternary(
            Opcode::SetAllLeds,
            Operand::Immediate(r as f32),
            Operand::Immediate(g as f32),
            Operand::Immediate(b as f32),
        ))
    }

    pub fn emit_motor_drive(
        &mut self,
        direction: Direction,
        throttle: f32,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::binary(
            Opcode::MotorDrive,
            Operand::Immediate(direction.code() as f32),
            Operand::Immediate(throttle),
        ))
    }

    pub fn emit_motor_stop(&mut self) -> Result<usize, Diagnostic> {
        self.push(Instruction::nullary(Opcode::MotorStop))
    }

    pub fn emit_motor_turn(
        &mut self,
        direction: Direction,
        degrees: f32,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::binary(
            Opcode::MotorTurn,
            Operand::Immediate(direction.code() as f32),
            Operand::Immediate(degrees),
        ))
    }

    pub fn emit_motor_spin(
        &mut self,
        direction: Direction,
        throttle: f32,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::binary(
            Opcode::MotorSpin,
            Operand::Immediate(direction.code() as f32),
            Operand::Immediate(throttle),
        ))
    }

    pub fn emit_motor_drive_time(
        &mut self,
        direction: Direction,
        throttle: f32,
        seconds: f32,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::ternary(
            Opcode::MotorDriveTime,
            Operand::Immediate(direction.code() as f32),
            Operand::Immediate(throttle),
            Operand::Immediate(seconds),
        ))
    }

    pub fn emit_motor_drive_distance(
        &mut self,
        direction: Direction,
        throttle: f32,
        centimeters: f32,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::ternary(
            Opcode::MotorDriveDistance,
            Operand::Immediate(direction.code() as f32),
            Operand::Immediate(throttle),
            Operand::Immediate(centimeters),
        ))
    }

    pub fn emit_wait(&mut self, seconds: f32) -> Result<usize, Diagnostic> {
        self.push(Instruction::unary(
            Opcode::Wait,
            Operand::Immediate(seconds),
        ))
    }

    pub fn emit_play_tone(&mut self, frequency: f32) -> Result<usize, Diagnostic> {
        self.push(Instruction::unary(
            Opcode::PlayTone,
            Operand::Immediate(frequency),
        ))
    }

    pub fn emit_play_sound(&mut self, id: f32) -> Result<usize, Diagnostic> {
        self.push(Instruction::unary(Opcode::PlaySound, Operand::Immediate(id)))
    }

    pub fn emit_wait_for_button(&mut self) -> Result<usize, Diagnostic> {
        self.push(Instruction::nullary(Opcode::WaitForButton))
    }

    pub fn emit_check_right_button(&mut self, dest: u16) -> Result<usize, Diagnostic> {
        self.push(Instruction::unary(
            Opcode::CheckRightButtonPress,
            Operand::Register(dest),
        ))
    }

    /// Emits a sensor read into `dest`. The optional argument is
    /// sensor-specific (the color code for the color-match sensor).
    pub fn emit_read_sensor(
        &mut self,
        sensor: Sensor,
        dest: u16,
        argument: Option<f32>,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::ternary(
            Opcode::ReadSensor,
            Operand::Immediate(sensor.id() as f32),
            Operand::Register(dest),
            Operand::Immediate(argument.unwrap_or(0.0)),
        ))
    }

    pub fn emit_declare_var(
        &mut self,
        register: u16,
        value: Operand,
        var_type: VarType,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::ternary(
            Opcode::DeclareVar,
            Operand::Register(register),
            value,
            Operand::Immediate(var_type.code() as f32),
        ))
    }

    pub fn emit_set_var(&mut self, register: u16, value: Operand) -> Result<usize, Diagnostic> {
        self.push(Instruction::binary(
            Opcode::SetVar,
            Operand::Register(register),
            value,
        ))
    }

    pub fn emit_compare(
        &mut self,
        op: CompareOp,
        left: Operand,
        right: Operand,
    ) -> Result<usize, Diagnostic> {
        self.push(Instruction::ternary(
            Opcode::Compare,
            Operand::Immediate(op.code() as f32),
            left,
            right,
        ))
    }

    /// Emits a forward jump with a placeholder distance and returns its
    /// index for later patching.
    pub fn emit_forward_jump(&mut self, opcode: Opcode) -> Result<usize, Diagnostic> {
        debug_assert!(opcode.is_patchable_jump());
        self.push(Instruction::nullary(opcode))
    }

    /// Patches a previously emitted forward jump to land on `target`.
    pub fn patch_forward_jump(&mut self, jump: usize, target: usize) -> Result<(), Diagnostic> {
        let distance = self.byte_distance(jump, target)?;
        self.program.patch_jump(jump, distance).map_err(|e| match e {
            BytecodeError::PatchNotAJump(opcode) => {
                Diagnostic::problem(Problem::InternalPatchError)
                    .with_context("opcode", &opcode.to_string())
            }
            _ => Diagnostic::problem(Problem::InternalPatchError)
                .with_context("index", &jump.to_string()),
        })
    }

    pub fn emit_while_start(&mut self) -> Result<usize, Diagnostic> {
        self.push(Instruction::nullary(Opcode::WhileStart))
    }

    /// Emits the loop-closing instruction for a `while (true)` block,
    /// embedding the backward distance to `start`.
    pub fn emit_while_end(&mut self, start: usize) -> Result<usize, Diagnostic> {
        let distance = self.byte_distance(self.len(), start)?;
        let (low, high) = split_distance(distance);
        self.push(Instruction::binary(Opcode::WhileEnd, low, high))
    }

    pub fn emit_for_init(&mut self, register: u16, from: Operand) -> Result<usize, Diagnostic> {
        self.push(Instruction::binary(
            Opcode::ForInit,
            Operand::Register(register),
            from,
        ))
    }

    pub fn emit_for_condition(&mut self, register: u16, to: Operand) -> Result<usize, Diagnostic> {
        self.push(Instruction::binary(
            Opcode::ForCondition,
            Operand::Register(register),
            to,
        ))
    }

    pub fn emit_for_increment(&mut self, register: u16) -> Result<usize, Diagnostic> {
        self.push(Instruction::unary(
            Opcode::ForIncrement,
            Operand::Register(register),
        ))
    }

    /// Emits a backward jump from `source` to `target`, both instruction
    /// indices, embedding the distance at emission time.
    pub fn emit_jump_backward(&mut self, source: usize, target: usize) -> Result<usize, Diagnostic> {
        let distance = self.byte_distance(source, target)?;
        let (low, high) = split_distance(distance);
        self.push(Instruction::binary(Opcode::JumpBackward, low, high))
    }

    /// Computes the byte distance between two instruction indices, failing
    /// once it exceeds the 16-bit encodable maximum.
    fn byte_distance(&self, from: usize, to: usize) -> Result<u16, Diagnostic> {
        let distance = from.abs_diff(to) * INSTRUCTION_SIZE;
        if distance > MAX_JUMP_DISTANCE {
            return Err(Diagnostic::problem(Problem::JumpDistanceExceeded)
                .with_context("distance", &distance.to_string()));
        }
        Ok(distance as u16)
    }

    /// Appends the terminating End instruction and yields the program.
    pub fn finish(mut self) -> Result<Program, Diagnostic> {
        self.push(Instruction::nullary(Opcode::End))?;
        Ok(self.program)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

fn split_distance(distance: u16) -> (Operand, Operand) {
    let [low, high] = distance.to_le_bytes();
    (
        Operand::Immediate(low as f32),
        Operand::Immediate(high as f32),
    )
}
