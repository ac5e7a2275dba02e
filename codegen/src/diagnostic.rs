//! Fatal compile errors.
//!
//! Every failure carries a stable problem code, a constant message, and
//! per-instance context such as the offending statement text or a byte
//! position in the sanitized source. Callers surface the full description
//! verbatim to the author of the robot program.

use edubot_problems::Problem;

/// A fatal compile error. Compilation produces no output when one is raised.
#[derive(Debug)]
pub struct Diagnostic {
    /// A stable value describing the type of error.
    pub code: String,

    description: String,

    /// Additional context appended to the constant description.
    pub described: Vec<String>,

    /// Byte position in the sanitized source, where relevant.
    pub position: Option<usize>,
}

impl Diagnostic {
    /// Creates a diagnostic from a problem code.
    pub fn problem(problem: Problem) -> Self {
        Self {
            code: problem.code().to_string(),
            description: problem.message().to_string(),
            described: vec![],
            position: None,
        }
    }

    /// Adds context about this particular instance of the problem, such as
    /// the literal statement text that failed to match.
    pub fn with_context(mut self, description: &str, item: &str) -> Self {
        self.described.push(format!("{}={}", description, item));
        self
    }

    /// Associates the diagnostic with a byte position in the source.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the full description, combining the constant message with
    /// any per-instance context.
    pub fn description(&self) -> String {
        if self.described.is_empty() {
            self.description.clone()
        } else {
            format!("{} ({})", self.description, self.described.join(", "))
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.description())?;
        if let Some(position) = self.position {
            write!(f, " at position {}", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_when_context_added_then_appended_to_description() {
        let diagnostic =
            Diagnostic::problem(Problem::InvalidCommand).with_context("command", "blink()");
        assert_eq!(diagnostic.code, "E0101");
        assert_eq!(diagnostic.description(), "Invalid command (command=blink())");
    }

    #[test]
    fn diagnostic_when_position_set_then_displayed() {
        let diagnostic = Diagnostic::problem(Problem::UnclosedBracket).with_position(12);
        assert!(diagnostic.to_string().ends_with("at position 12"));
    }
}
