//! Bracket-balance validation over sanitized source text.

use edubot_problems::Problem;

use crate::diagnostic::Diagnostic;

/// Verifies that `{}`, `()`, and `[]` are balanced and properly nested.
///
/// Bracket characters inside string or character literals (honoring
/// backslash escapes) and inside comments never affect the balance.
pub fn validate(text: &str) -> Result<(), Diagnostic> {
    let chars: Vec<char> = text.chars().collect();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // A backslash-escaped quote outside a literal (the sanitizer
            // escapes single quotes) is a plain character, not an opener.
            quote @ ('"' | '\'') if i == 0 || chars[i - 1] != '\\' => {
                i += 1;
                while i < chars.len() && chars[i] != quote {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 1;
                        break;
                    }
                    i += 1;
                }
            }
            open @ ('{' | '(' | '[') => stack.push((open, i)),
            close @ ('}' | ')' | ']') => match stack.pop() {
                None => {
                    return Err(Diagnostic::problem(Problem::UnmatchedClosingBracket)
                        .with_context("found", &close.to_string())
                        .with_position(i));
                }
                Some((open, _)) if closing_of(open) != close => {
                    return Err(Diagnostic::problem(Problem::MismatchedBrackets)
                        .with_context("expected", &closing_of(open).to_string())
                        .with_context("found", &close.to_string())
                        .with_position(i));
                }
                Some(_) => {}
            },
            _ => {}
        }
        i += 1;
    }

    if let Some((open, position)) = stack.pop() {
        return Err(Diagnostic::problem(Problem::UnclosedBracket)
            .with_context("bracket", &open.to_string())
            .with_position(position));
    }
    Ok(())
}

fn closing_of(open: char) -> char {
    match open {
        '{' => '}',
        '(' => ')',
        _ => ']',
    }
}
