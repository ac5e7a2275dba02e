//! Statement recognition.
//!
//! Each statement is matched, in a fixed order, against an exhaustive table
//! of anchored grammars. The first match wins and yields a tagged
//! [`Command`] carrying the captured literal fields. A statement that
//! matches nothing is an invalid command.

use edubot_bytecode::{tone_frequency, Color, Direction};
use edubot_problems::Problem;
use lazy_static::lazy_static;
use regex::Regex;

use crate::diagnostic::Diagnostic;

const NUMBER: &str = r"(-?\d+(?:\.\d+)?)";

lazy_static! {
    static ref SET_ALL_LEDS: Regex =
        Regex::new(r"^all_leds\.set_color\(\s*([A-Z]+)\s*\)$").unwrap();
    static ref MOTOR_DRIVE: Regex =
        Regex::new(&format!(r"^motors\.drive\(\s*([A-Z]+)\s*,\s*{NUMBER}\s*\)$")).unwrap();
    static ref MOTOR_TURN: Regex =
        Regex::new(&format!(r"^motors\.turn\(\s*([A-Z]+)\s*,\s*{NUMBER}\s*\)$")).unwrap();
    static ref MOTOR_SPIN: Regex =
        Regex::new(&format!(r"^motors\.spin\(\s*([A-Z]+)\s*,\s*{NUMBER}\s*\)$")).unwrap();
    static ref MOTOR_DRIVE_TIME: Regex = Regex::new(&format!(
        r"^motors\.drive_time\(\s*([A-Z]+)\s*,\s*{NUMBER}\s*,\s*{NUMBER}\s*\)$"
    ))
    .unwrap();
    static ref MOTOR_DRIVE_DISTANCE: Regex = Regex::new(&format!(
        r"^motors\.drive_distance\(\s*([A-Z]+)\s*,\s*{NUMBER}\s*,\s*{NUMBER}\s*\)$"
    ))
    .unwrap();
    static ref MOTOR_STOP: Regex = Regex::new(r"^motors\.stop\(\s*\)$").unwrap();
    static ref WAIT: Regex = Regex::new(&format!(r"^wait\(\s*{NUMBER}\s*\)$")).unwrap();
    static ref PLAY_TONE: Regex =
        Regex::new(r#"^speaker\.play_tone\(\s*"([A-Za-z]+)"\s*\)$"#).unwrap();
    static ref PLAY_SOUND: Regex =
        Regex::new(r"^speaker\.play_sound\(\s*(\d+)\s*\)$").unwrap();
    static ref WAIT_FOR_PRESS: Regex =
        Regex::new(r"^left_button\.wait_for_press\(\s*\)$").unwrap();
    static ref WHILE_TRUE: Regex = Regex::new(r"^while\s*\(\s*true\s*\)$").unwrap();
    static ref FOR_LOOP: Regex = Regex::new(
        r"^for\s*\(\s*int\s+([A-Za-z_]\w*)\s*=\s*([^;]+?)\s*;\s*([A-Za-z_]\w*)\s*<\s*([^;]+?)\s*;\s*([A-Za-z_]\w*)\+\+\s*\)$"
    )
    .unwrap();
    static ref IF: Regex = Regex::new(r"^if\s*\((.+)\)$").unwrap();
    static ref ELSE_IF: Regex = Regex::new(r"^else if\s*\((.+)\)$").unwrap();
    static ref DECLARE: Regex =
        Regex::new(r"^(float|int|bool)\s+([A-Za-z_]\w*)\s*=\s*([^=].*)$").unwrap();
    static ref ASSIGN: Regex = Regex::new(r"^([A-Za-z_]\w*)\s*=\s*([^=].*)$").unwrap();
}

/// Declared type of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarType {
    Float,
    Int,
    Bool,
}

impl VarType {
    /// Wire encoding of the type, for the DeclareVar instruction.
    pub fn code(&self) -> u8 {
        match self {
            VarType::Float => 0,
            VarType::Int => 1,
            VarType::Bool => 2,
        }
    }
}

/// One recognized statement with its captured fields.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetAllLeds(Color),
    MotorDrive { direction: Direction, throttle: f32 },
    MotorTurn { direction: Direction, degrees: f32 },
    MotorSpin { direction: Direction, throttle: f32 },
    MotorDriveTime { direction: Direction, throttle: f32, seconds: f32 },
    MotorDriveDistance { direction: Direction, throttle: f32, centimeters: f32 },
    MotorStop,
    Wait(f32),
    PlayTone(f32),
    PlaySound(f32),
    WaitForButtonPress,
    Declare { var_type: VarType, name: String, expr: String },
    Assign { name: String, expr: String },
    If { condition: String },
    ElseIf { condition: String },
    Else,
    WhileTrue,
    For { name: String, from: String, to: String },
    BlockOpen,
    BlockClose,
}

/// Classifies one trimmed statement. Fails with an invalid-command error
/// naming the statement text when nothing in the table matches.
pub fn match_statement(statement: &str) -> Result<Command, Diagnostic> {
    let statement = statement.trim();

    match statement {
        "{" => return Ok(Command::BlockOpen),
        "}" => return Ok(Command::BlockClose),
        "else" => return Ok(Command::Else),
        _ => {}
    }

    // A branch condition may contain at most one logical operator.
    if (statement.starts_with("if ") || statement.starts_with("if(") || statement.starts_with("else if"))
        && logical_operator_count(statement) >= 2
    {
        return Err(
            Diagnostic::problem(Problem::ComplexCondition).with_context("statement", statement)
        );
    }

    if let Some(caps) = SET_ALL_LEDS.captures(statement) {
        let color = parse_color(&caps[1])?;
        return Ok(Command::SetAllLeds(color));
    }
    if let Some(caps) = MOTOR_DRIVE.captures(statement) {
        let direction = parse_linear_direction(&caps[1])?;
        let throttle = parse_throttle(&caps[2])?;
        return Ok(Command::MotorDrive { direction, throttle });
    }
    if let Some(caps) = MOTOR_TURN.captures(statement) {
        let direction = parse_rotational_direction(&caps[1])?;
        let degrees = parse_number(&caps[2])?;
        if !(1.0..=1080.0).contains(&degrees) {
            return Err(Diagnostic::problem(Problem::DegreesOutOfRange)
                .with_context("degrees", &caps[2]));
        }
        return Ok(Command::MotorTurn { direction, degrees });
    }
    if let Some(caps) = MOTOR_SPIN.captures(statement) {
        let direction = parse_rotational_direction(&caps[1])?;
        let throttle = parse_throttle(&caps[2])?;
        return Ok(Command::MotorSpin { direction, throttle });
    }
    if let Some(caps) = MOTOR_DRIVE_TIME.captures(statement) {
        let direction = parse_linear_direction(&caps[1])?;
        let throttle = parse_throttle(&caps[2])?;
        let seconds = parse_seconds(&caps[3])?;
        return Ok(Command::MotorDriveTime { direction, throttle, seconds });
    }
    if let Some(caps) = MOTOR_DRIVE_DISTANCE.captures(statement) {
        let direction = parse_linear_direction(&caps[1])?;
        let throttle = parse_throttle(&caps[2])?;
        let centimeters = parse_number(&caps[3])?;
        if !(1.0..=1000.0).contains(&centimeters) {
            return Err(Diagnostic::problem(Problem::DistanceOutOfRange)
                .with_context("centimeters", &caps[3]));
        }
        return Ok(Command::MotorDriveDistance { direction, throttle, centimeters });
    }
    if MOTOR_STOP.is_match(statement) {
        return Ok(Command::MotorStop);
    }
    if let Some(caps) = WAIT.captures(statement) {
        let seconds = parse_seconds(&caps[1])?;
        return Ok(Command::Wait(seconds));
    }
    if let Some(caps) = PLAY_TONE.captures(statement) {
        let frequency = tone_frequency(&caps[1]).ok_or_else(|| {
            Diagnostic::problem(Problem::UnsupportedTone).with_context("tone", &caps[1])
        })?;
        return Ok(Command::PlayTone(frequency));
    }
    if let Some(caps) = PLAY_SOUND.captures(statement) {
        let id = parse_number(&caps[1])?;
        if !(1.0..=10.0).contains(&id) {
            return Err(
                Diagnostic::problem(Problem::SoundOutOfRange).with_context("sound", &caps[1])
            );
        }
        return Ok(Command::PlaySound(id));
    }
    if WAIT_FOR_PRESS.is_match(statement) {
        return Ok(Command::WaitForButtonPress);
    }
    if WHILE_TRUE.is_match(statement) {
        return Ok(Command::WhileTrue);
    }
    if let Some(caps) = FOR_LOOP.captures(statement) {
        if caps[1] != caps[3] || caps[1] != caps[5] {
            return Err(Diagnostic::problem(Problem::ForLoopVariableMismatch)
                .with_context("statement", statement));
        }
        return Ok(Command::For {
            name: caps[1].to_string(),
            from: caps[2].to_string(),
            to: caps[4].to_string(),
        });
    }
    if let Some(caps) = ELSE_IF.captures(statement) {
        return Ok(Command::ElseIf { condition: caps[1].to_string() });
    }
    if let Some(caps) = IF.captures(statement) {
        return Ok(Command::If { condition: caps[1].to_string() });
    }
    if let Some(caps) = DECLARE.captures(statement) {
        let var_type = match &caps[1] {
            "float" => VarType::Float,
            "int" => VarType::Int,
            _ => VarType::Bool,
        };
        return Ok(Command::Declare {
            var_type,
            name: caps[2].to_string(),
            expr: caps[3].trim().to_string(),
        });
    }
    if let Some(caps) = ASSIGN.captures(statement) {
        return Ok(Command::Assign {
            name: caps[1].to_string(),
            expr: caps[2].trim().to_string(),
        });
    }

    Err(Diagnostic::problem(Problem::InvalidCommand).with_context("command", statement))
}

fn logical_operator_count(statement: &str) -> usize {
    statement.matches("&&").count() + statement.matches("||").count()
}

fn parse_color(token: &str) -> Result<Color, Diagnostic> {
    Color::try_from(token)
        .map_err(|_| Diagnostic::problem(Problem::UnsupportedColor).with_context("color", token))
}

fn parse_linear_direction(token: &str) -> Result<Direction, Diagnostic> {
    let direction = Direction::try_from(token).map_err(|_| {
        Diagnostic::problem(Problem::UnsupportedDirection).with_context("direction", token)
    })?;
    if !direction.is_linear() {
        return Err(
            Diagnostic::problem(Problem::UnsupportedDirection).with_context("direction", token)
        );
    }
    Ok(direction)
}

fn parse_rotational_direction(token: &str) -> Result<Direction, Diagnostic> {
    let direction = Direction::try_from(token).map_err(|_| {
        Diagnostic::problem(Problem::UnsupportedDirection).with_context("direction", token)
    })?;
    if !direction.is_rotational() {
        return Err(
            Diagnostic::problem(Problem::UnsupportedDirection).with_context("direction", token)
        );
    }
    Ok(direction)
}

fn parse_number(text: &str) -> Result<f32, Diagnostic> {
    text.parse::<f32>()
        .map_err(|_| Diagnostic::problem(Problem::InvalidNumber).with_context("number", text))
}

fn parse_throttle(text: &str) -> Result<f32, Diagnostic> {
    let throttle = parse_number(text)?;
    if !(0.0..=100.0).contains(&throttle) {
        return Err(
            Diagnostic::problem(Problem::ThrottleOutOfRange).with_context("throttle", text)
        );
    }
    Ok(throttle)
}

fn parse_seconds(text: &str) -> Result<f32, Diagnostic> {
    let seconds = parse_number(text)?;
    if seconds <= 0.0 || seconds > 600.0 {
        return Err(Diagnostic::problem(Problem::TimeOutOfRange).with_context("seconds", text));
    }
    Ok(seconds)
}
