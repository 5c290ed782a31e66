//! JSON with JavaScript-style comments
//!
//! Comments are not part of JSON, but hand-written configuration files
//! tend to grow them anyway. They are removed before parsing; everything
//! inside string literals is left untouched.

use serde_json::Value;

use crate::{Error, Format, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    String,
    Escape,
    LineComment,
    BlockComment,
}

/// Remove `//` line comments and `/* */` block comments from JSON text.
///
/// Line comments keep their terminating newline and block comments are
/// replaced by a single space (plus any newlines they spanned), so parser
/// line numbers still point at the original text. An unterminated block
/// comment runs to the end of the input.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' => {
                    out.push(c);
                    state = State::String;
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push(' ');
                    state = State::BlockComment;
                }
                _ => out.push(c),
            },
            State::String => {
                out.push(c);
                match c {
                    '\\' => state = State::Escape,
                    '"' => state = State::Code,
                    _ => {}
                }
            }
            State::Escape => {
                out.push(c);
                state = State::String;
            }
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = State::Code;
                }
            }
            State::BlockComment => match c {
                '*' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::Code;
                }
                '\n' => out.push(c),
                _ => {}
            },
        }
    }

    out
}

/// Strip comments and parse JSON, keeping object keys in document order.
pub fn parse(source: &str) -> Result<Value> {
    let stripped = strip_comments(source);
    serde_json::from_str(&stripped).map_err(|e| {
        if e.line() > 0 {
            Error::parse_at(Format::Json, e.line(), e.to_string())
        } else {
            Error::parse(Format::Json, e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comment() {
        assert_eq!(strip_comments("{\"a\": 1} // done\n"), "{\"a\": 1} \n");
    }

    #[test]
    fn test_strip_block_comment() {
        assert_eq!(strip_comments("[1, /* two */ 3]"), "[1,   3]");
    }

    #[test]
    fn test_block_comment_keeps_newlines() {
        assert_eq!(strip_comments("/*\n\n*/1"), " \n\n1");
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let source = r#"{"url": "http://example.org", "glob": "/*.rs", "end": "*/"}"#;
        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let source = r#"{"q": "say \"//hi\""} // c"#;
        assert_eq!(strip_comments(source), r#"{"q": "say \"//hi\""} "#);
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let value = parse(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse("{\n\"a\": 1,\n\"b\": }\n").unwrap_err();
        assert!(matches!(err, Error::ParseAt { line: 3, format: Format::Json, .. }));
    }
}
