//! End-to-end tests for flat (non-control-flow) commands.

mod common;

use common::compile_ok;
use edubot_bytecode::{Opcode, REGISTER_TAG};
use edubot_codegen::compile;

#[test]
fn compile_when_set_color_red_then_exact_buffer() {
    let program = compile_ok("all_leds.set_color(RED);");
    assert_eq!(
        program.to_words(),
        vec![
            Opcode::SetAllLeds as u8 as f32,
            75.0,
            0.0,
            0.0,
            0.0,
            Opcode::End as u8 as f32,
            0.0,
            0.0,
            0.0,
            0.0,
        ]
    );
}

#[test]
fn compile_when_wait_then_seconds_in_first_operand() {
    let program = compile_ok("wait(0.5);");
    assert_eq!(
        program.get(0).unwrap().to_slots(),
        [Opcode::Wait as u8 as f32, 0.5, 0.0, 0.0, 0.0]
    );
}

#[test]
fn compile_when_motor_commands_then_direction_codes() {
    let program = compile_ok(
        "motors.drive(FORWARD, 50);
         motors.turn(CLOCKWISE, 90);
         motors.spin(COUNTERCLOCKWISE, 30);
         motors.drive_time(BACKWARD, 40, 2);
         motors.drive_distance(FORWARD, 60, 100);
         motors.stop();",
    );
    assert_eq!(program.get(0).unwrap().to_slots(), [60.0, 0.0, 50.0, 0.0, 0.0]);
    assert_eq!(program.get(1).unwrap().to_slots(), [62.0, 2.0, 90.0, 0.0, 0.0]);
    assert_eq!(program.get(2).unwrap().to_slots(), [65.0, 3.0, 30.0, 0.0, 0.0]);
    assert_eq!(program.get(3).unwrap().to_slots(), [63.0, 1.0, 40.0, 2.0, 0.0]);
    assert_eq!(program.get(4).unwrap().to_slots(), [64.0, 0.0, 60.0, 100.0, 0.0]);
    assert_eq!(program.get(5).unwrap().opcode, Opcode::MotorStop);
}

#[test]
fn compile_when_speaker_commands_then_frequency_and_id() {
    let program = compile_ok("speaker.play_tone(\"C\"); speaker.play_sound(3);");
    assert_eq!(
        program.get(0).unwrap().to_slots(),
        [Opcode::PlayTone as u8 as f32, 261.63, 0.0, 0.0, 0.0]
    );
    assert_eq!(
        program.get(1).unwrap().to_slots(),
        [Opcode::PlaySound as u8 as f32, 3.0, 0.0, 0.0, 0.0]
    );
}

#[test]
fn compile_when_wait_for_press_then_button_opcode() {
    let program = compile_ok("left_button.wait_for_press();");
    assert_eq!(program.get(0).unwrap().opcode, Opcode::WaitForButton);
}

#[test]
fn compile_when_declarations_then_registers_increase_from_zero() {
    let program = compile_ok(
        "float a = 1.5;
         int b = 2;
         bool c = true;",
    );
    for (index, (register, value, type_code)) in
        [(0.0, 1.5, 0.0), (1.0, 2.0, 1.0), (2.0, 1.0, 2.0)].iter().enumerate()
    {
        let slots = program.get(index).unwrap().to_slots();
        assert_eq!(slots[0], Opcode::DeclareVar as u8 as f32);
        assert_eq!(slots[1], (REGISTER_TAG as f32) + register);
        assert_eq!(slots[2], *value);
        assert_eq!(slots[3], *type_code);
    }
}

#[test]
fn compile_when_assignment_then_set_var_to_same_register() {
    let program = compile_ok("int speed = 10; speed = 20;");
    let declare = program.get(0).unwrap().to_slots();
    let assign = program.get(1).unwrap().to_slots();
    assert_eq!(assign[0], Opcode::SetVar as u8 as f32);
    assert_eq!(assign[1], declare[1]);
    assert_eq!(assign[2], 20.0);
}

#[test]
fn compile_when_declaration_from_sensor_then_read_precedes_declare() {
    let program = compile_ok("float pitch = imu.getPitch();");
    let read = program.get(0).unwrap().to_slots();
    let declare = program.get(1).unwrap().to_slots();
    assert_eq!(read[0], Opcode::ReadSensor as u8 as f32);
    // The sensor result register feeds the declaration's value operand.
    assert_eq!(read[2], REGISTER_TAG as f32);
    assert_eq!(declare[2], REGISTER_TAG as f32);
    // The variable itself got the next register.
    assert_eq!(declare[1], (REGISTER_TAG as f32) + 1.0);
}

#[test]
fn compile_when_variable_copied_then_no_new_register() {
    let program = compile_ok("float a = 1; float b = a;");
    let second = program.get(1).unwrap().to_slots();
    // b's value operand references a's register 0; b itself is register 1.
    assert_eq!(second[1], (REGISTER_TAG as f32) + 1.0);
    assert_eq!(second[2], REGISTER_TAG as f32);
}

#[test]
fn compile_when_unknown_statement_then_invalid_command_names_text() {
    let err = compile("all_leds.blink(RED);").unwrap_err();
    assert_eq!(err.code, "E0101");
    assert!(err.description().contains("all_leds.blink(RED)"));
}

#[test]
fn compile_when_comments_then_output_unchanged() {
    let plain = compile_ok("wait(1); motors.stop();");
    let commented = compile_ok(
        "// spin up
         wait(1); /* pause between
                     the two steps */
         motors.stop(); // done",
    );
    assert_eq!(plain.to_words(), commented.to_words());
}
