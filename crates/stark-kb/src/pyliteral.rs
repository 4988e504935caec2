//! A reader for Python literal expressions.
//!
//! The Amazon Q&A dumps store one Python `repr` of a dict per line rather than JSON: strings
//! use single quotes, booleans are `True`/`False` and missing values are `None`. This module
//! parses that subset into [`serde_json::Value`] so the records can go through the same serde
//! types as the JSON dumps.
//!
//! Supported: dicts with string keys, lists, tuples (as arrays), strings in either quote style
//! with optional `u`/`b`/`r` prefixes, integers (with an optional legacy `L` suffix), floats,
//! `True`, `False` and `None`.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest nesting of dicts, lists and tuples accepted by [`parse_line`].
pub const MAX_DEPTH: usize = 64;

/// What went wrong while parsing a literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PyLiteralErrorKind {
    /// A character that cannot start or continue the current construct.
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    /// The input ended inside a construct.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A backslash escape that is unknown or encodes no character.
    #[error("invalid escape sequence")]
    InvalidEscape,
    /// A numeric token that does not parse.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    /// Non-whitespace input after a complete literal.
    #[error("trailing input after literal")]
    TrailingInput,
    /// A dict key that is not a string.
    #[error("dict key is not a string")]
    NonStringKey,
    /// Containers nested deeper than [`MAX_DEPTH`].
    #[error("containers nested deeper than {}", MAX_DEPTH)]
    TooDeep,
}

/// A parse failure with the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct PyLiteralError {
    /// Byte offset into the input.
    pub offset: usize,
    /// Failure kind.
    pub kind: PyLiteralErrorKind,
}

/// Parses one Python literal, allowing surrounding whitespace.
pub fn parse_line(line: &str) -> Result<Value, PyLiteralError> {
    let mut parser = Parser {
        src: line,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < line.len() {
        return Err(parser.error(PyLiteralErrorKind::TrailingInput));
    }
    Ok(value)
}

/// Recursive-descent cursor over the input.
struct Parser<'a> {
    /// Full input.
    src: &'a str,
    /// Current byte offset.
    pos: usize,
    /// Containers currently open.
    depth: usize,
}

impl Parser<'_> {
    /// Error at the current position.
    fn error(&self, kind: PyLiteralErrorKind) -> PyLiteralError {
        PyLiteralError {
            offset: self.pos,
            kind,
        }
    }

    /// Next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    /// Character after the next one.
    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    /// Consumes and returns the next character.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes the next character, which must be `expected`.
    fn expect(&mut self, expected: char) -> Result<(), PyLiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(PyLiteralErrorKind::UnexpectedChar(c))),
            None => Err(self.error(PyLiteralErrorKind::UnexpectedEnd)),
        }
    }

    /// Skips whitespace.
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Parses any literal.
    fn value(&mut self) -> Result<Value, PyLiteralError> {
        self.skip_ws();
        let Some(c) = self.peek() else {
            return Err(self.error(PyLiteralErrorKind::UnexpectedEnd));
        };
        match c {
            '{' | '[' | '(' => self.container(c),
            '\'' | '"' => self.string(false).map(Value::String),
            '0'..='9' | '-' | '+' | '.' => self.number(),
            _ if c.is_ascii_alphabetic() => match self.string_prefix_len() {
                Some(len) => {
                    let raw = self.src[self.pos..self.pos + len]
                        .chars()
                        .any(|p| p.eq_ignore_ascii_case(&'r'));
                    self.pos += len;
                    self.string(raw).map(Value::String)
                }
                None => self.keyword(),
            },
            _ => Err(self.error(PyLiteralErrorKind::UnexpectedChar(c))),
        }
    }

    /// Length of a string prefix (`u`, `b`, `r`, `br`, `rb`, ...) directly followed by a quote.
    fn string_prefix_len(&self) -> Option<usize> {
        let rest = &self.src[self.pos..];
        let prefix_len = rest
            .chars()
            .take(2)
            .take_while(|c| matches!(c.to_ascii_lowercase(), 'u' | 'b' | 'r'))
            .count();
        (1..=prefix_len).find(|&len| matches!(rest[len..].chars().next(), Some('\'' | '"')))
    }

    /// Parses `True`, `False` or `None`.
    fn keyword(&mut self) -> Result<Value, PyLiteralError> {
        let start = self.pos;
        let len = self.src[start..]
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(self.src.len() - start);
        let value = match &self.src[start..start + len] {
            "True" => Value::Bool(true),
            "False" => Value::Bool(false),
            "None" => Value::Null,
            _ => {
                let c = self.peek().unwrap_or_default();
                return Err(self.error(PyLiteralErrorKind::UnexpectedChar(c)));
            }
        };
        self.pos += len;
        Ok(value)
    }

    /// Parses the dict, list or tuple opened by `open`, tracking nesting depth.
    fn container(&mut self, open: char) -> Result<Value, PyLiteralError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(PyLiteralErrorKind::TooDeep));
        }
        self.depth += 1;
        let value = match open {
            '{' => self.dict(),
            '[' => self.sequence('[', ']'),
            _ => self.sequence('(', ')'),
        };
        self.depth -= 1;
        value
    }

    /// Parses a dict with string keys.
    fn dict(&mut self) -> Result<Value, PyLiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key_offset = self.pos;
            let Value::String(key) = self.value()? else {
                return Err(PyLiteralError {
                    offset: key_offset,
                    kind: PyLiteralErrorKind::NonStringKey,
                });
            };
            self.skip_ws();
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            if !self.separator('}')? {
                return Ok(Value::Object(map));
            }
        }
    }

    /// Parses a list or tuple into an array.
    fn sequence(&mut self, open: char, close: char) -> Result<Value, PyLiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            if !self.separator(close)? {
                return Ok(Value::Array(items));
            }
        }
    }

    /// Consumes `,` (returns true, more items may follow) or `close` (returns false).
    fn separator(&mut self, close: char) -> Result<bool, PyLiteralError> {
        self.skip_ws();
        match self.bump() {
            Some(',') => Ok(true),
            Some(c) if c == close => Ok(false),
            Some(c) => {
                self.pos -= c.len_utf8();
                Err(self.error(PyLiteralErrorKind::UnexpectedChar(c)))
            }
            None => Err(self.error(PyLiteralErrorKind::UnexpectedEnd)),
        }
    }

    /// Parses a quoted string starting at the opening quote.
    fn string(&mut self, raw: bool) -> Result<String, PyLiteralError> {
        let quote = self
            .bump()
            .ok_or_else(|| self.error(PyLiteralErrorKind::UnexpectedEnd))?;
        let mut out = String::new();
        loop {
            let escape_start = self.pos;
            match self.bump() {
                None => return Err(self.error(PyLiteralErrorKind::UnexpectedEnd)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') if raw => {
                    // Raw strings keep the backslash but it still protects the next character.
                    out.push('\\');
                    match self.bump() {
                        Some(c) => out.push(c),
                        None => return Err(self.error(PyLiteralErrorKind::UnexpectedEnd)),
                    }
                }
                Some('\\') => self.escape(escape_start, &mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    /// Decodes the escape after a backslash at `start`.
    fn escape(&mut self, start: usize, out: &mut String) -> Result<(), PyLiteralError> {
        let invalid = PyLiteralError {
            offset: start,
            kind: PyLiteralErrorKind::InvalidEscape,
        };
        let Some(c) = self.bump() else {
            return Err(self.error(PyLiteralErrorKind::UnexpectedEnd));
        };
        let decoded = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'v' => '\u{0b}',
            '\\' | '\'' | '"' => c,
            // Line continuation.
            '\n' => return Ok(()),
            'x' => self.hex_char(2).ok_or(invalid)?,
            'u' => self.hex_char(4).ok_or(invalid)?,
            'U' => self.hex_char(8).ok_or(invalid)?,
            _ => return Err(invalid),
        };
        out.push(decoded);
        Ok(())
    }

    /// Reads exactly `digits` hex digits and converts them to a character.
    fn hex_char(&mut self, digits: usize) -> Option<char> {
        let hex = self.src.get(self.pos..self.pos + digits)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let code = u32::from_str_radix(hex, 16).ok()?;
        let c = char::from_u32(code)?;
        self.pos += digits;
        Some(c)
    }

    /// Parses an integer or float.
    fn number(&mut self) -> Result<Value, PyLiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '.' | '_' => self.pos += 1,
                'e' | 'E' => {
                    self.pos += 1;
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        let text = self.src[start..self.pos].replace('_', "");
        if matches!(self.peek(), Some('L' | 'l'))
            && !matches!(self.peek_second(), Some(c) if c.is_ascii_alphanumeric())
        {
            self.pos += 1;
        }

        let invalid = || PyLiteralError {
            offset: start,
            kind: PyLiteralErrorKind::InvalidNumber(text.clone()),
        };
        let number = if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(invalid)?
        } else if let Ok(n) = text.parse::<i64>() {
            Number::from(n)
        } else if let Ok(n) = text.trim_start_matches('+').parse::<u64>() {
            Number::from(n)
        } else {
            // Integers beyond 64 bits degrade to floats.
            text.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(invalid)?
        };
        Ok(Value::Number(number))
    }
}
