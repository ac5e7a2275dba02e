//! Source sanitization: comment stripping, brace isolation, and whitespace
//! normalization.
//!
//! The output is a single-line, semicolon-delimited string in which every
//! brace and every `else`/`else if` token is its own pseudo-statement, so
//! the later stages can treat the program as a flat statement list.

use lazy_static::lazy_static;
use regex::Regex;

/// Private stand-in for the semicolons inside a `for (...)` header, so the
/// statement split does not fragment the header. Restored per statement by
/// [`split_statements`].
const PROTECTED_SEMICOLON: char = '\u{1}';

lazy_static! {
    static ref ELSE_IF_BOUNDARY: Regex = Regex::new(r"\}\s*else\s+if\b").unwrap();
    static ref ELSE_BOUNDARY: Regex = Regex::new(r"\}\s*else\b").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalizes raw source text into a single separator-delimited line.
pub fn sanitize(source: &str) -> String {
    let text = protect_for_header_semicolons(source);
    let text = strip_comments(&text);
    let text = separate_else_chains(&text);
    let text = isolate_braces(&text);
    let text = WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned();
    text.replace('\'', "\\'")
}

/// Splits sanitized text into trimmed statements, restoring the protected
/// semicolons of `for` headers.
pub fn split_statements(sanitized: &str) -> Vec<String> {
    sanitized
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(|statement| statement.replace(PROTECTED_SEMICOLON, ";"))
        .collect()
}

/// Substitutes every semicolon inside each structurally matched `for (...)`
/// header with [`PROTECTED_SEMICOLON`].
fn protect_for_header_semicolons(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;

    while i < chars.len() {
        if starts_for_keyword(&chars, i) {
            // Locate the header's opening parenthesis.
            let mut j = i + 3;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && chars[j] == '(' {
                out.extend(&chars[i..=j]);
                let mut depth = 1;
                i = j + 1;
                while i < chars.len() && depth > 0 {
                    match chars[i] {
                        '(' => depth += 1,
                        ')' => depth -= 1,
                        ';' => {
                            out.push(PROTECTED_SEMICOLON);
                            i += 1;
                            continue;
                        }
                        _ => {}
                    }
                    out.push(chars[i]);
                    i += 1;
                }
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Whether `chars[i..]` begins the keyword `for` at a token boundary.
fn starts_for_keyword(chars: &[char], i: usize) -> bool {
    if chars.len() < i + 3 || chars[i] != 'f' || chars[i + 1] != 'o' || chars[i + 2] != 'r' {
        return false;
    }
    let boundary_before = i == 0 || !is_ident_char(chars[i - 1]);
    let boundary_after = chars.get(i + 3).map_or(true, |c| !is_ident_char(*c));
    boundary_before && boundary_after
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Removes `//` line comments and `/* */` block comments, leaving string
/// and character literals intact.
fn strip_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                out.push(' ');
            }
            quote @ ('"' | '\'') => {
                out.push(chars[i]);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    if chars[i] == '\\' {
                        if let Some(escaped) = chars.get(i + 1) {
                            out.push(*escaped);
                            i += 1;
                        }
                    } else if chars[i] == quote {
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Puts an explicit separator between a closing brace and a following
/// `else` or `else if`, so they split into distinct statements.
fn separate_else_chains(text: &str) -> String {
    let text = ELSE_IF_BOUNDARY.replace_all(text, "};else if");
    ELSE_BOUNDARY.replace_all(&text, "};else").into_owned()
}

/// Surrounds every brace with separators so `{` and `}` become their own
/// pseudo-statements.
fn isolate_braces(text: &str) -> String {
    text.replace('{', ";{;").replace('}', ";};")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_when_line_comment_then_removed() {
        let out = sanitize("wait(1); // pause\nmotors.stop();");
        assert_eq!(out, "wait(1); motors.stop();");
    }

    #[test]
    fn sanitize_when_block_comment_then_removed() {
        let out = sanitize("wait(1); /* a\nmulti line\ncomment */ motors.stop();");
        assert_eq!(out, "wait(1); motors.stop();");
    }

    #[test]
    fn sanitize_when_braces_then_own_statements() {
        let statements = split_statements(&sanitize("if (x > 5) { wait(1); }"));
        assert_eq!(statements, vec!["if (x > 5)", "{", "wait(1)", "}"]);
    }

    #[test]
    fn sanitize_when_else_if_chain_then_separate_statements() {
        let source = "if (a > 1) { wait(1); } else if (a > 2) { wait(2); } else { wait(3); }";
        let statements = split_statements(&sanitize(source));
        assert_eq!(
            statements,
            vec![
                "if (a > 1)",
                "{",
                "wait(1)",
                "}",
                "else if (a > 2)",
                "{",
                "wait(2)",
                "}",
                "else",
                "{",
                "wait(3)",
                "}"
            ]
        );
    }

    #[test]
    fn sanitize_when_for_header_then_semicolons_survive_split() {
        let statements = split_statements(&sanitize("for (int i = 0; i < 10; i++) { wait(1); }"));
        assert_eq!(
            statements,
            vec!["for (int i = 0; i < 10; i++)", "{", "wait(1)", "}"]
        );
    }

    #[test]
    fn sanitize_when_nested_for_headers_then_all_protected() {
        let source = "for (int i = 0; i < 3; i++) { for (int j = 0; j < 2; j++) { wait(1); } }";
        let statements = split_statements(&sanitize(source));
        assert_eq!(statements[0], "for (int i = 0; i < 3; i++)");
        assert_eq!(statements[2], "for (int j = 0; j < 2; j++)");
    }

    #[test]
    fn sanitize_when_whitespace_runs_then_collapsed() {
        assert_eq!(sanitize("wait( 1 );\n\n\t wait(2);"), "wait( 1 ); wait(2);");
    }

    #[test]
    fn sanitize_when_single_quote_then_escaped() {
        assert_eq!(sanitize("speaker.play_tone('A');"), "speaker.play_tone(\\'A\\');");
    }

    #[test]
    fn sanitize_when_forward_identifier_then_not_a_for_header() {
        // "forward(1; 2)" must not have its semicolon protected.
        let statements = split_statements(&sanitize("forward(1; 2);"));
        assert_eq!(statements, vec!["forward(1", "2)"]);
    }
}
