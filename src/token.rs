//! JSON tokenizer.
//!
//! This module locates and classifies the single value token of an input.
//! It owns three of the engine's jobs:
//!
//! - **Whitespace trimming**: [`Tokenizer::skip_whitespace`] advances over
//!   `' '`, `'\t'`, `'\r'`, `'\n'` (and comments, when enabled)
//! - **Classification**: [`Tokenizer::next_token`] consumes one token and tags
//!   it with a [`TokenKind`]
//! - **Trailing-data guard**: [`Tokenizer::end`] requires that nothing but
//!   whitespace follows the value
//!
//! Text input is tokenized through its UTF-8 bytes, so `&str` and `&[u8]`
//! inputs classify identically.
//!
//! ```rust
//! use json_scalar::token::{TokenKind, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new(b" \"caf\\u00e9\" ");
//! let token = tokenizer.next_token().unwrap();
//! assert_eq!(token.kind, TokenKind::String);
//! assert_eq!(token.text(), "café");
//! tokenizer.end().unwrap();
//! ```

use crate::options::ReadOptions;
use crate::{Error, Result};
use std::borrow::Cow;
use std::fmt;

const UNPAIRED_SURROGATE: &str = "unpaired surrogate in unicode escape";

/// The classification of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Null,
    True,
    False,
    Number,
    String,
    StartArray,
    StartObject,
}

impl TokenKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::StartArray => "array",
            TokenKind::StartObject => "object",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte offsets `start..end` of a token within its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A classified token borrowed from the input.
///
/// For strings, [`Token::text`] is the unescaped content (borrowed when the
/// token has no escapes). For every other kind it is the raw token text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub span: TokenSpan,
    text: Cow<'de, str>,
}

impl<'de> Token<'de> {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_text(self) -> Cow<'de, str> {
        self.text
    }
}

/// A cursor over one input buffer.
pub struct Tokenizer<'de> {
    input: &'de [u8],
    position: usize,
    allow_comments: bool,
    allow_trailing_commas: bool,
}

impl<'de> Tokenizer<'de> {
    /// Creates a tokenizer with the strict default options.
    pub fn new(input: &'de [u8]) -> Self {
        Tokenizer {
            input,
            position: 0,
            allow_comments: false,
            allow_trailing_commas: false,
        }
    }

    pub fn with_options(input: &'de [u8], options: &ReadOptions) -> Self {
        Tokenizer {
            input,
            position: 0,
            allow_comments: options.allow_comments,
            allow_trailing_commas: options.allow_trailing_commas,
        }
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Converts a byte offset into a 1-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.input.len());
        let before = &self.input[..offset];
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let col = before[line_start..]
            .iter()
            .filter(|&&b| (b & 0xC0) != 0x80)
            .count()
            + 1;
        (line, col)
    }

    pub(crate) fn syntax_at(&self, offset: usize, msg: &str) -> Error {
        let (line, col) = self.line_col(offset);
        Error::syntax(line, col, msg)
    }

    #[must_use]
    pub fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek_byte() == Some(byte) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Skips insignificant whitespace, and comments when they are enabled.
    pub fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.position += 1,
                Some(b'/') if self.allow_comments => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        let start = self.position;
        match self.input.get(start + 1) {
            Some(b'/') => {
                self.position = self.input[start..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(self.input.len(), |i| start + i + 1);
                Ok(())
            }
            Some(b'*') => {
                let body = &self.input[start + 2..];
                match body.windows(2).position(|w| w == b"*/") {
                    Some(i) => {
                        self.position = start + 2 + i + 2;
                        Ok(())
                    }
                    None => Err(self.syntax_at(start, "unterminated block comment")),
                }
            }
            _ => Err(self.syntax_at(start, "unexpected character '/'")),
        }
    }

    /// Consumes and classifies the next token, skipping leading whitespace.
    pub fn next_token(&mut self) -> Result<Token<'de>> {
        self.skip_whitespace()?;
        let start = self.position;

        match self.peek_byte() {
            None => Err(self.syntax_at(start, "unexpected end of input, expected a value")),
            Some(b'n') => self.literal("null", TokenKind::Null),
            Some(b't') => self.literal("true", TokenKind::True),
            Some(b'f') => self.literal("false", TokenKind::False),
            Some(b'"') => self.string(),
            Some(b'-' | b'0'..=b'9') => self.number(),
            Some(b'[') => self.structural("[", TokenKind::StartArray),
            Some(b'{') => self.structural("{", TokenKind::StartObject),
            Some(other) => {
                let msg = if other.is_ascii_graphic() {
                    format!("unexpected character '{}'", other as char)
                } else {
                    format!("unexpected byte 0x{:02x}", other)
                };
                Err(self.syntax_at(start, &msg))
            }
        }
    }

    /// Trailing-data guard: only whitespace may remain.
    pub fn end(&mut self) -> Result<()> {
        self.skip_whitespace()?;
        if self.position < self.input.len() {
            let (line, col) = self.line_col(self.position);
            Err(Error::trailing_data(line, col))
        } else {
            Ok(())
        }
    }

    /// Steps through array elements after `[` has been consumed.
    ///
    /// Returns `true` when another element follows and `false` once the
    /// closing `]` has been consumed.
    pub fn next_element(&mut self, first: bool) -> Result<bool> {
        self.skip_whitespace()?;
        if first {
            return Ok(!self.eat(b']'));
        }

        match self.peek_byte() {
            Some(b',') => {
                self.position += 1;
                self.skip_whitespace()?;
                if self.peek_byte() == Some(b']') {
                    if self.allow_trailing_commas {
                        self.position += 1;
                        return Ok(false);
                    }
                    return Err(self.syntax_at(self.position, "trailing comma before ']'"));
                }
                Ok(true)
            }
            Some(b']') => {
                self.position += 1;
                Ok(false)
            }
            None => Err(self.syntax_at(self.position, "unterminated array, expected ']'")),
            Some(_) => Err(self.syntax_at(self.position, "expected ',' or ']' in array")),
        }
    }

    fn token(&self, kind: TokenKind, start: usize, text: Cow<'de, str>) -> Token<'de> {
        Token {
            kind,
            span: TokenSpan {
                start,
                end: self.position,
            },
            text,
        }
    }

    fn structural(&mut self, text: &'static str, kind: TokenKind) -> Result<Token<'de>> {
        let start = self.position;
        self.position += 1;
        Ok(self.token(kind, start, Cow::Borrowed(text)))
    }

    fn literal(&mut self, literal: &'static str, kind: TokenKind) -> Result<Token<'de>> {
        let start = self.position;
        if self.input[start..].starts_with(literal.as_bytes()) {
            self.position += literal.len();
            Ok(self.token(kind, start, Cow::Borrowed(literal)))
        } else {
            Err(self.syntax_at(start, &format!("invalid literal, expected '{}'", literal)))
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.position;
        while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        self.position - start
    }

    fn number(&mut self) -> Result<Token<'de>> {
        let start = self.position;
        self.eat(b'-');

        match self.peek_byte() {
            Some(b'0') => {
                self.position += 1;
                if matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                    return Err(self.syntax_at(start, "leading zeros are not allowed in numbers"));
                }
            }
            Some(b'1'..=b'9') => {
                self.digits();
            }
            _ => return Err(self.syntax_at(self.position, "expected a digit in number")),
        }

        if self.eat(b'.') && self.digits() == 0 {
            return Err(self.syntax_at(self.position, "expected a digit after the decimal point"));
        }

        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            self.position += 1;
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.position += 1;
            }
            if self.digits() == 0 {
                return Err(self.syntax_at(self.position, "expected a digit in exponent"));
            }
        }

        match self.peek_byte() {
            None | Some(b' ' | b'\t' | b'\r' | b'\n' | b',' | b']' | b'}' | b'/') => {}
            Some(_) => {
                return Err(self.syntax_at(self.position, "invalid character within a number"));
            }
        }

        // Number grammar is ASCII-only.
        let text = std::str::from_utf8(&self.input[start..self.position])
            .map_err(|_| self.syntax_at(start, "invalid number"))?;
        Ok(self.token(TokenKind::Number, start, Cow::Borrowed(text)))
    }

    fn string(&mut self) -> Result<Token<'de>> {
        let start = self.position;
        self.position += 1;
        let mut run_start = self.position;
        let mut owned: Option<String> = None;

        loop {
            match self.peek_byte() {
                None => return Err(self.syntax_at(start, "unterminated string")),
                Some(b'"') => {
                    let run = self.utf8_run(run_start)?;
                    self.position += 1;
                    let text = match owned {
                        Some(mut buf) => {
                            buf.push_str(run);
                            Cow::Owned(buf)
                        }
                        None => Cow::Borrowed(run),
                    };
                    return Ok(self.token(TokenKind::String, start, text));
                }
                Some(b'\\') => {
                    let run = self.utf8_run(run_start)?;
                    let buf = owned.get_or_insert_with(String::new);
                    buf.push_str(run);
                    let ch = self.escape()?;
                    buf.push(ch);
                    run_start = self.position;
                }
                Some(b) if b < 0x20 => {
                    return Err(self.syntax_at(
                        self.position,
                        "control characters must be escaped in strings",
                    ));
                }
                Some(_) => self.position += 1,
            }
        }
    }

    /// Validates the unescaped run `run_start..position`.
    fn utf8_run(&self, run_start: usize) -> Result<&'de str> {
        let input: &'de [u8] = self.input;
        std::str::from_utf8(&input[run_start..self.position])
            .map_err(|e| self.syntax_at(run_start + e.valid_up_to(), "invalid UTF-8 in string"))
    }

    fn escape(&mut self) -> Result<char> {
        let escape_start = self.position;
        self.position += 1;
        let byte = self.peek_byte();
        self.position += 1;

        match byte {
            Some(b'"') => Ok('"'),
            Some(b'\\') => Ok('\\'),
            Some(b'/') => Ok('/'),
            Some(b'b') => Ok('\u{0008}'),
            Some(b'f') => Ok('\u{000C}'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'u') => {
                let high = self.hex4(escape_start)?;
                match high {
                    0xD800..=0xDBFF => {
                        if !self.input[self.position..].starts_with(b"\\u") {
                            return Err(self.syntax_at(escape_start, UNPAIRED_SURROGATE));
                        }
                        self.position += 2;
                        let low = self.hex4(escape_start)?;
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(self.syntax_at(escape_start, UNPAIRED_SURROGATE));
                        }
                        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        char::from_u32(code).ok_or_else(|| {
                            self.syntax_at(escape_start, "invalid unicode code point")
                        })
                    }
                    0xDC00..=0xDFFF => Err(self.syntax_at(escape_start, UNPAIRED_SURROGATE)),
                    code => char::from_u32(code)
                        .ok_or_else(|| self.syntax_at(escape_start, "invalid unicode code point")),
                }
            }
            None => Err(self.syntax_at(escape_start, "unterminated string")),
            Some(_) => Err(self.syntax_at(escape_start, "invalid escape sequence")),
        }
    }

    fn hex4(&mut self, escape_start: usize) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .peek_byte()
                .and_then(|b| (b as char).to_digit(16))
                .ok_or_else(|| {
                    self.syntax_at(
                        escape_start,
                        "invalid unicode escape sequence (expected 4 hex digits)",
                    )
                })?;
            code = code * 16 + digit;
            self.position += 1;
        }
        Ok(code)
    }
}
