//! Sub-expression resolution.
//!
//! An operand expression is a boolean literal, a sensor or predicate call,
//! a declared variable name, or a numeric literal. Sensor and predicate
//! calls allocate a fresh register and emit the read instruction as a side
//! effect; everything else resolves without touching the program.

use std::collections::HashMap;

use edubot_bytecode::{Color, Operand, Sensor, MAX_REGISTERS};
use edubot_problems::Problem;
use lazy_static::lazy_static;
use regex::Regex;

use crate::command::VarType;
use crate::diagnostic::Diagnostic;
use crate::emit::Emitter;

lazy_static! {
    static ref COLOR_MATCH: Regex =
        Regex::new(r"^color_sensor\.is_object\(([A-Z]+)\)$").unwrap();
}

/// A declared variable: its type and the register holding its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub var_type: VarType,
    pub register: u16,
}

/// The flat, program-wide variable namespace.
///
/// There is no lexical scoping: once declared, a name resolves from that
/// point forward regardless of enclosing braces, and a variable declared
/// inside a loop body occupies one fixed register for the whole program.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, symbol: Symbol) {
        self.entries.insert(name.to_string(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }
}

/// Monotonic register allocation: indices start at 0, are never freed or
/// reused within one compilation, and fail once [`MAX_REGISTERS`] is hit.
#[derive(Debug, Default)]
pub struct RegisterAllocator {
    next: u16,
}

impl RegisterAllocator {
    pub fn new() -> Self {
        RegisterAllocator { next: 0 }
    }

    pub fn allocate(&mut self) -> Result<u16, Diagnostic> {
        if self.next as usize >= MAX_REGISTERS {
            return Err(Diagnostic::problem(Problem::RegisterCountExceeded));
        }
        let register = self.next;
        self.next += 1;
        Ok(register)
    }
}

/// Resolves one sub-expression to an operand.
///
/// Sensor and predicate calls emit their read instruction into `emitter`
/// and return a reference to the freshly allocated destination register.
pub fn resolve(
    expr: &str,
    symbols: &SymbolTable,
    registers: &mut RegisterAllocator,
    emitter: &mut Emitter,
) -> Result<Operand, Diagnostic> {
    let expr = expr.trim();
    match expr {
        "true" => return Ok(Operand::Immediate(1.0)),
        "false" => return Ok(Operand::Immediate(0.0)),
        _ => {}
    }

    // Calls are matched with interior whitespace removed.
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(sensor) = sensor_for_call(&compact) {
        let dest = registers.allocate()?;
        emitter.emit_read_sensor(sensor, dest, None)?;
        return Ok(Operand::Register(dest));
    }
    if let Some(caps) = COLOR_MATCH.captures(&compact) {
        let color = Color::try_from(&caps[1]).map_err(|_| {
            Diagnostic::problem(Problem::UnsupportedColor).with_context("color", &caps[1])
        })?;
        let dest = registers.allocate()?;
        emitter.emit_read_sensor(Sensor::ColorMatch, dest, Some(color.code() as f32))?;
        return Ok(Operand::Register(dest));
    }
    if compact == "right_button.is_pressed()" {
        let dest = registers.allocate()?;
        emitter.emit_check_right_button(dest)?;
        return Ok(Operand::Register(dest));
    }

    if let Some(symbol) = symbols.get(expr) {
        return Ok(Operand::Register(symbol.register));
    }

    expr.parse::<f32>().map(Operand::Immediate).map_err(|_| {
        Diagnostic::problem(Problem::UndefinedOperand).with_context("expression", expr)
    })
}

/// Sensor reads that take no argument, keyed by the whitespace-free call
/// text.
fn sensor_for_call(call: &str) -> Option<Sensor> {
    match call {
        "imu.getPitch()" => Some(Sensor::ImuPitch),
        "imu.getRoll()" => Some(Sensor::ImuRoll),
        "imu.getYaw()" => Some(Sensor::ImuYaw),
        "imu.getAccelX()" => Some(Sensor::AccelX),
        "imu.getAccelY()" => Some(Sensor::AccelY),
        "imu.getAccelZ()" => Some(Sensor::AccelZ),
        "imu.getGyroX()" => Some(Sensor::GyroX),
        "imu.getGyroY()" => Some(Sensor::GyroY),
        "imu.getGyroZ()" => Some(Sensor::GyroZ),
        "imu.getMagX()" => Some(Sensor::MagX),
        "imu.getMagY()" => Some(Sensor::MagY),
        "imu.getMagZ()" => Some(Sensor::MagZ),
        "front_distance_sensor.get_distance()" => Some(Sensor::FrontDistance),
        "front_distance_sensor.is_object_in_front()" => Some(Sensor::FrontObject),
        "left_distance_sensor.is_object_near()" => Some(Sensor::LeftObjectNear),
        "right_distance_sensor.is_object_near()" => Some(Sensor::RightObjectNear),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edubot_bytecode::Opcode;

    fn setup() -> (SymbolTable, RegisterAllocator, Emitter) {
        (SymbolTable::new(), RegisterAllocator::new(), Emitter::new())
    }

    #[test]
    fn resolve_when_boolean_literal_then_immediate() {
        let (symbols, mut registers, mut emitter) = setup();
        assert_eq!(
            resolve("true", &symbols, &mut registers, &mut emitter).unwrap(),
            Operand::Immediate(1.0)
        );
        assert_eq!(
            resolve("false", &symbols, &mut registers, &mut emitter).unwrap(),
            Operand::Immediate(0.0)
        );
        assert_eq!(emitter.len(), 0);
    }

    #[test]
    fn resolve_when_numeric_literal_then_immediate() {
        let (symbols, mut registers, mut emitter) = setup();
        assert_eq!(
            resolve("12.5", &symbols, &mut registers, &mut emitter).unwrap(),
            Operand::Immediate(12.5)
        );
        assert_eq!(
            resolve("-3", &symbols, &mut registers, &mut emitter).unwrap(),
            Operand::Immediate(-3.0)
        );
    }

    #[test]
    fn resolve_when_sensor_call_then_register_and_read_emitted() {
        let (symbols, mut registers, mut emitter) = setup();
        let operand = resolve("imu.getPitch()", &symbols, &mut registers, &mut emitter).unwrap();
        assert_eq!(operand, Operand::Register(0));

        let program = emitter.finish().unwrap();
        let slots = program.get(0).unwrap().to_slots();
        assert_eq!(slots[0], Opcode::ReadSensor as u8 as f32);
        assert_eq!(slots[1], Sensor::ImuPitch.id() as f32);
        assert_eq!(slots[2], 32768.0); // register 0, tagged
    }

    #[test]
    fn resolve_when_color_match_then_color_code_argument() {
        let (symbols, mut registers, mut emitter) = setup();
        let operand = resolve(
            "color_sensor.is_object(GREEN)",
            &symbols,
            &mut registers,
            &mut emitter,
        )
        .unwrap();
        assert_eq!(operand, Operand::Register(0));

        let program = emitter.finish().unwrap();
        let slots = program.get(0).unwrap().to_slots();
        assert_eq!(slots[1], Sensor::ColorMatch.id() as f32);
        assert_eq!(slots[3], Color::Green.code() as f32);
    }

    #[test]
    fn resolve_when_color_match_unknown_color_then_error() {
        let (symbols, mut registers, mut emitter) = setup();
        let err = resolve(
            "color_sensor.is_object(PINK)",
            &symbols,
            &mut registers,
            &mut emitter,
        )
        .unwrap_err();
        assert_eq!(err.code, "E0203");
    }

    #[test]
    fn resolve_when_button_predicate_then_dedicated_instruction() {
        let (symbols, mut registers, mut emitter) = setup();
        let operand = resolve(
            "right_button.is_pressed()",
            &symbols,
            &mut registers,
            &mut emitter,
        )
        .unwrap();
        assert_eq!(operand, Operand::Register(0));

        let program = emitter.finish().unwrap();
        assert_eq!(
            program.get(0).unwrap().opcode,
            Opcode::CheckRightButtonPress
        );
    }

    #[test]
    fn resolve_when_known_variable_then_existing_register() {
        let (mut symbols, mut registers, mut emitter) = setup();
        let register = registers.allocate().unwrap();
        symbols.insert(
            "speed",
            Symbol {
                var_type: VarType::Float,
                register,
            },
        );

        let operand = resolve("speed", &symbols, &mut registers, &mut emitter).unwrap();
        assert_eq!(operand, Operand::Register(0));
        assert_eq!(emitter.len(), 0);
        // No new allocation happened.
        assert_eq!(registers.allocate().unwrap(), 1);
    }

    #[test]
    fn resolve_when_unknown_name_then_undefined_operand() {
        let (symbols, mut registers, mut emitter) = setup();
        let err = resolve("mystery", &symbols, &mut registers, &mut emitter).unwrap_err();
        assert_eq!(err.code, "E0201");
        assert!(err.description().contains("mystery"));
    }

    #[test]
    fn allocator_when_exhausted_then_register_count_error() {
        let mut registers = RegisterAllocator::new();
        for expected in 0..512 {
            assert_eq!(registers.allocate().unwrap(), expected);
        }
        assert_eq!(registers.allocate().unwrap_err().code, "E0301");
    }
}
