//! Robot-side constants: colors, directions, sensors, comparison operators,
//! and the speaker tone table.
//!
//! These encodings are shared with the device firmware and must stay stable.

/// LED channel value used for every named color.
pub const LED_BRIGHTNESS: u8 = 75;

/// A named color, used both for the LED ring and the color-match sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
    White,
    Purple,
    Yellow,
    Off,
}

impl Color {
    /// Red/green/blue channel values at the standard brightness.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let b = LED_BRIGHTNESS;
        match self {
            Color::Red => (b, 0, 0),
            Color::Green => (0, b, 0),
            Color::Blue => (0, 0, b),
            Color::White => (b, b, b),
            Color::Purple => (b, 0, b),
            Color::Yellow => (b, b, 0),
            Color::Off => (0, 0, 0),
        }
    }

    /// Stable id used as the color-match sensor argument.
    pub fn code(&self) -> u8 {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
            Color::White => 3,
            Color::Purple => 4,
            Color::Yellow => 5,
            Color::Off => 6,
        }
    }
}

impl TryFrom<&str> for Color {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "RED" => Ok(Color::Red),
            "GREEN" => Ok(Color::Green),
            "BLUE" => Ok(Color::Blue),
            "WHITE" => Ok(Color::White),
            "PURPLE" => Ok(Color::Purple),
            "YELLOW" => Ok(Color::Yellow),
            "OFF" => Ok(Color::Off),
            _ => Err("Value is not a supported color"),
        }
    }
}

/// A motion direction for the drive motors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Clockwise,
    Counterclockwise,
}

impl Direction {
    /// Wire encoding of the direction.
    pub fn code(&self) -> u8 {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
            Direction::Clockwise => 2,
            Direction::Counterclockwise => 3,
        }
    }

    /// Whether this is a linear (drive) direction.
    pub fn is_linear(&self) -> bool {
        matches!(self, Direction::Forward | Direction::Backward)
    }

    /// Whether this is a rotational (turn/spin) direction.
    pub fn is_rotational(&self) -> bool {
        !self.is_linear()
    }
}

impl TryFrom<&str> for Direction {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "FORWARD" => Ok(Direction::Forward),
            "BACKWARD" => Ok(Direction::Backward),
            "CLOCKWISE" => Ok(Direction::Clockwise),
            "COUNTERCLOCKWISE" => Ok(Direction::Counterclockwise),
            _ => Err("Value is not a supported direction"),
        }
    }
}

/// Comparison operator codes for the Compare instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl CompareOp {
    /// Wire encoding of the operator.
    pub fn code(&self) -> u8 {
        match self {
            CompareOp::Equal => 0,
            CompareOp::NotEqual => 1,
            CompareOp::LessThan => 2,
            CompareOp::LessOrEqual => 3,
            CompareOp::GreaterThan => 4,
            CompareOp::GreaterOrEqual => 5,
        }
    }
}

impl TryFrom<&str> for CompareOp {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "==" => Ok(CompareOp::Equal),
            "!=" => Ok(CompareOp::NotEqual),
            "<" => Ok(CompareOp::LessThan),
            "<=" => Ok(CompareOp::LessOrEqual),
            ">" => Ok(CompareOp::GreaterThan),
            ">=" => Ok(CompareOp::GreaterOrEqual),
            _ => Err("Value is not a supported comparison operator"),
        }
    }
}

/// Sensor ids for the ReadSensor instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sensor {
    ImuPitch,
    ImuRoll,
    ImuYaw,
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
    MagX,
    MagY,
    MagZ,
    /// Front time-of-flight distance in centimeters.
    FrontDistance,
    /// Boolean: an object is within the front detection threshold.
    FrontObject,
    /// Boolean: an object is near the left side.
    LeftObjectNear,
    /// Boolean: an object is near the right side.
    RightObjectNear,
    /// Boolean: the color sensor sees the color given as the instruction's
    /// third operand.
    ColorMatch,
}

impl Sensor {
    /// Wire encoding of the sensor id.
    pub fn id(&self) -> u8 {
        match self {
            Sensor::ImuPitch => 0,
            Sensor::ImuRoll => 1,
            Sensor::ImuYaw => 2,
            Sensor::AccelX => 3,
            Sensor::AccelY => 4,
            Sensor::AccelZ => 5,
            Sensor::GyroX => 6,
            Sensor::GyroY => 7,
            Sensor::GyroZ => 8,
            Sensor::MagX => 9,
            Sensor::MagY => 10,
            Sensor::MagZ => 11,
            Sensor::FrontDistance => 12,
            Sensor::FrontObject => 13,
            Sensor::LeftObjectNear => 14,
            Sensor::RightObjectNear => 15,
            Sensor::ColorMatch => 16,
        }
    }
}

/// Returns the frequency in Hz for a note name "A" through "G"
/// (fourth octave), or `None` for anything else.
pub fn tone_frequency(note: &str) -> Option<f32> {
    match note {
        "A" => Some(440.0),
        "B" => Some(493.88),
        "C" => Some(261.63),
        "D" => Some(293.66),
        "E" => Some(329.63),
        "F" => Some(349.23),
        "G" => Some(392.0),
        _ => None,
    }
}
