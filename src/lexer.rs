//! TOML tokenizer.
//!
//! Converts input text into a lazy, left-to-right token stream with
//! line/column positions for diagnostics. Comments and inter-token
//! whitespace are discarded; newlines are significant (they terminate
//! key-value statements) and are emitted as tokens.
//!
//! TOML's lexical grammar is position-sensitive — `true = 1` is a valid
//! statement whose key is the bare word `true` — so the scanner takes a
//! [`Mode`] per request: `Mode::Key` scans bare/quoted keys and header
//! punctuation, `Mode::Value` scans literals. The parser supplies the mode;
//! structural punctuation, newlines, and strings lex identically in both.
//!
//! Numeric/date-time disambiguation follows the grammar: a digit run whose
//! shape matches `YYYY-MM-DD` or `HH:MM` is handed to
//! [`TomlDateTime`](crate::TomlDateTime) before any numeric interpretation
//! is attempted, since date-times also begin with digits.

use crate::{Error, Result, TomlDateTime};

/// What the parser expects at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Key position: bare keys, quoted keys, header brackets.
    Key,
    /// Value position: scalar literals and inline-container punctuation.
    Value,
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Bare (unquoted) key
    Key(String),
    /// String literal; doubles as a quoted key in key position
    String {
        value: String,
        literal: bool,
        multiline: bool,
    },
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(TomlDateTime),
    Equals,
    Dot,
    Comma,
    LeftBracket,
    RightBracket,
    DoubleLeftBracket,
    DoubleRightBracket,
    LeftBrace,
    RightBrace,
    Newline,
    Eof,
}

impl TokenKind {
    /// Short description for syntax-error messages.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            TokenKind::Key(_) => "key",
            TokenKind::String { .. } => "string",
            TokenKind::Integer(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::Boolean(_) => "boolean",
            TokenKind::DateTime(_) => "date-time",
            TokenKind::Equals => "`=`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::DoubleLeftBracket => "`[[`",
            TokenKind::DoubleRightBracket => "`]]`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::Newline => "end of line",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token plus the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// The char-level scanner. Restartable from scratch by constructing a new
/// one over the same input; never caches beyond the current position.
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current 1-based line and column.
    pub fn location(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.input[self.position..].chars().next()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn lexical(&self, msg: impl Into<String>) -> Error {
        Error::lexical(self.line, self.column, msg)
    }

    /// Skips spaces, tabs, and a trailing comment. Stops before newlines —
    /// those are tokens.
    fn skip_inline_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == ' ' || ch == '\t' {
                self.next_char();
            } else {
                break;
            }
        }
        if self.peek_char() == Some('#') {
            while let Some(ch) = self.peek_char() {
                if ch == '\n' || ch == '\r' {
                    break;
                }
                self.next_char();
            }
        }
    }

    /// Produces the next token, scanning literals according to `mode`.
    pub fn next_token(&mut self, mode: Mode) -> Result<Token> {
        self.skip_inline_whitespace();
        let (line, col) = (self.line, self.column);
        let kind = self.next_kind(mode)?;
        Ok(Token { kind, line, col })
    }

    fn next_kind(&mut self, mode: Mode) -> Result<TokenKind> {
        let ch = match self.peek_char() {
            None => return Ok(TokenKind::Eof),
            Some(ch) => ch,
        };

        match ch {
            '\n' => {
                self.next_char();
                Ok(TokenKind::Newline)
            }
            '\r' => {
                self.next_char();
                if self.peek_char() == Some('\n') {
                    self.next_char();
                    Ok(TokenKind::Newline)
                } else {
                    Err(self.lexical("carriage return not followed by line feed"))
                }
            }
            '=' => {
                self.next_char();
                Ok(TokenKind::Equals)
            }
            '.' => {
                self.next_char();
                Ok(TokenKind::Dot)
            }
            ',' => {
                self.next_char();
                Ok(TokenKind::Comma)
            }
            '{' => {
                self.next_char();
                Ok(TokenKind::LeftBrace)
            }
            '}' => {
                self.next_char();
                Ok(TokenKind::RightBrace)
            }
            '[' => {
                self.next_char();
                // Adjacent brackets form an array-of-tables header, but
                // only in key position; in a value `[[` opens nested arrays.
                if mode == Mode::Key && self.peek_char() == Some('[') {
                    self.next_char();
                    Ok(TokenKind::DoubleLeftBracket)
                } else {
                    Ok(TokenKind::LeftBracket)
                }
            }
            ']' => {
                self.next_char();
                if mode == Mode::Key && self.peek_char() == Some(']') {
                    self.next_char();
                    Ok(TokenKind::DoubleRightBracket)
                } else {
                    Ok(TokenKind::RightBracket)
                }
            }
            '"' | '\'' => self.scan_string(ch),
            _ => match mode {
                Mode::Key => self.scan_bare_key(ch),
                Mode::Value => self.scan_value_literal(ch),
            },
        }
    }

    fn scan_bare_key(&mut self, first: char) -> Result<TokenKind> {
        if !is_bare_key_char(first) {
            return Err(self.lexical(format!("unexpected character `{first}` in key")));
        }
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if is_bare_key_char(ch) {
                self.next_char();
            } else {
                break;
            }
        }
        Ok(TokenKind::Key(self.input[start..self.position].to_string()))
    }

    fn scan_value_literal(&mut self, first: char) -> Result<TokenKind> {
        if first.is_ascii_alphabetic() {
            return self.scan_keyword();
        }
        if first.is_ascii_digit() || first == '+' || first == '-' {
            return self.scan_number_or_datetime();
        }
        Err(self.lexical(format!("expected a value, found `{first}`")))
    }

    /// `true`, `false`, and the unsigned spellings of `inf`/`nan`.
    fn scan_keyword(&mut self) -> Result<TokenKind> {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphabetic() {
                self.next_char();
            } else {
                break;
            }
        }
        match &self.input[start..self.position] {
            "true" => Ok(TokenKind::Boolean(true)),
            "false" => Ok(TokenKind::Boolean(false)),
            "inf" => Ok(TokenKind::Float(f64::INFINITY)),
            "nan" => Ok(TokenKind::Float(f64::NAN)),
            other => Err(self.lexical(format!("expected a value, found `{other}`"))),
        }
    }

    fn scan_number_or_datetime(&mut self) -> Result<TokenKind> {
        let start = self.position;
        let signed = matches!(self.peek_char(), Some('+' | '-'));
        if signed {
            self.next_char();
        }

        // Signed inf/nan never overlap with date-times.
        if matches!(self.peek_char(), Some('i' | 'n')) {
            let word_start = self.position;
            while let Some(ch) = self.peek_char() {
                if ch.is_ascii_alphabetic() {
                    self.next_char();
                } else {
                    break;
                }
            }
            let negative = self.input[start..].starts_with('-');
            return match &self.input[word_start..self.position] {
                "inf" if negative => Ok(TokenKind::Float(f64::NEG_INFINITY)),
                "inf" => Ok(TokenKind::Float(f64::INFINITY)),
                "nan" => Ok(TokenKind::Float(f64::NAN)),
                other => Err(self.lexical(format!("invalid numeric literal `{other}`"))),
            };
        }

        while let Some(ch) = self.peek_char() {
            if is_literal_char(ch) {
                self.next_char();
            } else {
                break;
            }
        }
        let mut run = &self.input[start..self.position];

        // A full date may continue with a space-separated time
        // (`1979-05-27 07:32:00`); one two-char lookahead decides.
        if !signed
            && looks_like_date_only(run)
            && self.peek_char() == Some(' ')
            && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.next_char();
            while let Some(ch) = self.peek_char() {
                if is_literal_char(ch) {
                    self.next_char();
                } else {
                    break;
                }
            }
            run = &self.input[start..self.position];
        }

        if !signed && looks_like_datetime(run) {
            let dt = TomlDateTime::parse_toml(run)
                .map_err(|msg| self.lexical(format!("invalid date-time `{run}`: {msg}")))?;
            return Ok(TokenKind::DateTime(dt));
        }

        parse_number(run).map_err(|msg| self.lexical(msg))
    }

    fn scan_string(&mut self, quote: char) -> Result<TokenKind> {
        // Unterminated-string errors point at the opening delimiter.
        let opened = (self.line, self.column);
        self.next_char();
        let mut multiline = false;
        if self.peek_char() == Some(quote) && self.peek_char_at(1) == Some(quote) {
            self.next_char();
            self.next_char();
            multiline = true;
            // One newline immediately after the opening delimiter is trimmed.
            if self.peek_char() == Some('\r') && self.peek_char_at(1) == Some('\n') {
                self.next_char();
                self.next_char();
            } else if self.peek_char() == Some('\n') {
                self.next_char();
            }
        } else if self.peek_char() == Some(quote) {
            // Empty string: the second quote closes it.
            self.next_char();
            return Ok(TokenKind::String {
                value: String::new(),
                literal: quote == '\'',
                multiline: false,
            });
        }

        let value = if quote == '\'' {
            self.scan_literal_body(multiline, opened)?
        } else {
            self.scan_basic_body(multiline, opened)?
        };
        Ok(TokenKind::String {
            value,
            literal: quote == '\'',
            multiline,
        })
    }

    fn scan_basic_body(&mut self, multiline: bool, opened: (usize, usize)) -> Result<String> {
        let mut value = String::new();
        loop {
            let ch = self.next_char().ok_or_else(|| unterminated(opened))?;
            match ch {
                '"' => {
                    if !multiline {
                        return Ok(value);
                    }
                    if self.close_multiline(&mut value, '"')? {
                        return Ok(value);
                    }
                }
                '\\' => self.scan_escape(&mut value, multiline, opened)?,
                '\r' if multiline => {
                    if self.next_char() != Some('\n') {
                        return Err(self.lexical("carriage return not followed by line feed"));
                    }
                    value.push('\n');
                }
                '\n' if multiline => value.push('\n'),
                '\n' | '\r' => return Err(self.lexical("newline in single-line string")),
                ch if is_forbidden_control(ch) => {
                    return Err(self.lexical(format!(
                        "control character U+{:04X} must be escaped",
                        ch as u32
                    )))
                }
                ch => value.push(ch),
            }
        }
    }

    fn scan_literal_body(&mut self, multiline: bool, opened: (usize, usize)) -> Result<String> {
        let mut value = String::new();
        loop {
            let ch = self.next_char().ok_or_else(|| unterminated(opened))?;
            match ch {
                '\'' => {
                    if !multiline {
                        return Ok(value);
                    }
                    if self.close_multiline(&mut value, '\'')? {
                        return Ok(value);
                    }
                }
                '\r' if multiline => {
                    if self.next_char() != Some('\n') {
                        return Err(self.lexical("carriage return not followed by line feed"));
                    }
                    value.push('\n');
                }
                '\n' if multiline => value.push('\n'),
                '\n' | '\r' => return Err(self.lexical("newline in single-line string")),
                ch if is_forbidden_control(ch) => {
                    return Err(self.lexical(format!(
                        "control character U+{:04X} not allowed in literal string",
                        ch as u32
                    )))
                }
                ch => value.push(ch),
            }
        }
    }

    /// One quote of a potential multi-line terminator has been consumed.
    /// Counts the rest: three or more close the string (up to two extra
    /// quotes belong to the content), fewer are content. Returns `true`
    /// when the string is closed.
    fn close_multiline(&mut self, value: &mut String, quote: char) -> Result<bool> {
        let mut quotes = 1;
        while quotes < 5 && self.peek_char() == Some(quote) {
            self.next_char();
            quotes += 1;
        }
        if quotes >= 3 {
            if self.peek_char() == Some(quote) {
                return Err(self.lexical("too many quotes at end of multi-line string"));
            }
            for _ in 0..quotes - 3 {
                value.push(quote);
            }
            Ok(true)
        } else {
            for _ in 0..quotes {
                value.push(quote);
            }
            Ok(false)
        }
    }

    fn scan_escape(
        &mut self,
        value: &mut String,
        multiline: bool,
        opened: (usize, usize),
    ) -> Result<()> {
        let ch = self.next_char().ok_or_else(|| unterminated(opened))?;
        match ch {
            'b' => value.push('\u{0008}'),
            't' => value.push('\t'),
            'n' => value.push('\n'),
            'f' => value.push('\u{000C}'),
            'r' => value.push('\r'),
            '"' => value.push('"'),
            '\\' => value.push('\\'),
            'u' => value.push(self.scan_unicode_escape(4)?),
            'U' => value.push(self.scan_unicode_escape(8)?),
            // Line-ending backslash: trim the newline and all leading
            // whitespace of the following lines.
            ' ' | '\t' | '\n' | '\r' if multiline => {
                let mut ch = ch;
                while ch == ' ' || ch == '\t' {
                    ch = self.next_char().ok_or_else(|| unterminated(opened))?;
                }
                if ch == '\r' {
                    if self.next_char() != Some('\n') {
                        return Err(self.lexical("carriage return not followed by line feed"));
                    }
                    ch = '\n';
                }
                if ch != '\n' {
                    return Err(self.lexical(format!("invalid escape `\\{ch}`")));
                }
                while matches!(self.peek_char(), Some(' ' | '\t' | '\n' | '\r')) {
                    self.next_char();
                }
            }
            other => return Err(self.lexical(format!("invalid escape `\\{other}`"))),
        }
        Ok(())
    }

    fn scan_unicode_escape(&mut self, digits: usize) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let ch = self
                .next_char()
                .ok_or_else(|| self.lexical("unterminated unicode escape"))?;
            let digit = ch
                .to_digit(16)
                .ok_or_else(|| self.lexical(format!("invalid hex digit `{ch}` in escape")))?;
            code = code * 16 + digit;
        }
        char::from_u32(code)
            .ok_or_else(|| self.lexical(format!("U+{code:04X} is not a valid scalar value")))
    }
}

fn unterminated(opened: (usize, usize)) -> Error {
    Error::lexical(opened.0, opened.1, "unterminated string")
}

fn is_bare_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

/// Control characters that strings may not contain raw. Tab is always
/// allowed; newlines are handled by the callers per string form.
fn is_forbidden_control(ch: char) -> bool {
    (ch < '\u{20}' && ch != '\t') || ch == '\u{7F}'
}

/// Characters that may appear inside a numeric or date-time run. Scanning
/// stops at the first delimiter; validation happens on the whole run.
fn is_literal_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '-' | '.' | ':')
}

fn looks_like_date_only(run: &str) -> bool {
    let b = run.as_bytes();
    b.len() == 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5].is_ascii_digit()
        && b[6].is_ascii_digit()
        && b[7] == b'-'
        && b[8].is_ascii_digit()
        && b[9].is_ascii_digit()
}

fn looks_like_datetime(run: &str) -> bool {
    let b = run.as_bytes();
    (b.len() >= 8 && b[..4].iter().all(u8::is_ascii_digit) && b[4] == b'-')
        || (b.len() >= 5 && b[..2].iter().all(u8::is_ascii_digit) && b[2] == b':')
}

/// Validates and converts a numeric run per the TOML grammar.
fn parse_number(run: &str) -> std::result::Result<TokenKind, String> {
    let (negative, digits) = match run.as_bytes().first() {
        Some(b'+') => (false, &run[1..]),
        Some(b'-') => (true, &run[1..]),
        _ => (false, run),
    };
    if digits.is_empty() {
        return Err(format!("invalid numeric literal `{run}`"));
    }

    if let Some(radix) = digits.strip_prefix("0x").map(|rest| (16u32, rest)).or_else(|| {
        digits
            .strip_prefix("0o")
            .map(|rest| (8u32, rest))
            .or_else(|| digits.strip_prefix("0b").map(|rest| (2u32, rest)))
    }) {
        let (base, rest) = radix;
        if negative || run.starts_with('+') {
            return Err(format!("radix-prefixed integer `{run}` cannot carry a sign"));
        }
        validate_underscores(rest, |b| (b as char).to_digit(base).is_some())?;
        let cleaned: String = rest.chars().filter(|&c| c != '_').collect();
        if cleaned.is_empty() {
            return Err(format!("invalid integer `{run}`"));
        }
        if let Some(bad) = cleaned.chars().find(|c| c.to_digit(base).is_none()) {
            return Err(format!("invalid digit `{bad}` in integer `{run}`"));
        }
        return i64::from_str_radix(&cleaned, base)
            .map(TokenKind::Integer)
            .map_err(|_| format!("integer `{run}` does not fit in 64 bits"));
    }

    validate_underscores(digits, |b| b.is_ascii_digit())?;
    let cleaned: String = run.chars().filter(|&c| c != '_').collect();
    let cleaned_digits = cleaned.trim_start_matches(['+', '-']);
    reject_leading_zero(cleaned_digits, run)?;

    if digits.contains(['.', 'e', 'E']) {
        validate_float_shape(digits, run)?;
        return cleaned
            .parse::<f64>()
            .map(TokenKind::Float)
            .map_err(|_| format!("invalid float `{run}`"));
    }

    cleaned
        .parse::<i64>()
        .map(TokenKind::Integer)
        .map_err(|_| format!("invalid integer `{run}`"))
}

/// Underscores must sit between two digit characters.
fn validate_underscores(
    s: &str,
    is_digit: impl Fn(u8) -> bool,
) -> std::result::Result<(), String> {
    let b = s.as_bytes();
    for (i, &byte) in b.iter().enumerate() {
        if byte == b'_' {
            let prev_ok = i > 0 && is_digit(b[i - 1]);
            let next_ok = i + 1 < b.len() && is_digit(b[i + 1]);
            if !prev_ok || !next_ok {
                return Err(format!(
                    "underscores in `{s}` must be surrounded by digits"
                ));
            }
        }
    }
    Ok(())
}

fn reject_leading_zero(digits: &str, run: &str) -> std::result::Result<(), String> {
    let b = digits.as_bytes();
    if b.len() > 1 && b[0] == b'0' && b[1].is_ascii_digit() {
        return Err(format!("leading zeros are not allowed in `{run}`"));
    }
    Ok(())
}

/// A decimal point needs digits on both sides; an exponent needs a mantissa
/// before it and digits after its optional sign.
fn validate_float_shape(digits: &str, run: &str) -> std::result::Result<(), String> {
    let b = digits.as_bytes();
    for (i, &byte) in b.iter().enumerate() {
        match byte {
            b'.' => {
                let prev_ok = i > 0 && b[i - 1].is_ascii_digit();
                let next_ok = i + 1 < b.len() && b[i + 1].is_ascii_digit();
                if !prev_ok || !next_ok {
                    return Err(format!(
                        "decimal point in `{run}` must be surrounded by digits"
                    ));
                }
            }
            b'e' | b'E' => {
                if i == 0 || !b[i - 1].is_ascii_digit() {
                    return Err(format!("misplaced exponent in `{run}`"));
                }
                let mut j = i + 1;
                if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
                    j += 1;
                }
                if j >= b.len() || !b[j].is_ascii_digit() {
                    return Err(format!("exponent in `{run}` has no digits"));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_token(input: &str) -> TokenKind {
        let mut tokenizer = Tokenizer::new(input);
        tokenizer.next_token(Mode::Value).unwrap().kind
    }

    fn value_error(input: &str) -> Error {
        let mut tokenizer = Tokenizer::new(input);
        tokenizer.next_token(Mode::Value).unwrap_err()
    }

    #[test]
    fn integers() {
        assert_eq!(value_token("1_000"), TokenKind::Integer(1000));
        assert_eq!(value_token("1_0_0"), TokenKind::Integer(100));
        assert_eq!(value_token("+99"), TokenKind::Integer(99));
        assert_eq!(value_token("-17"), TokenKind::Integer(-17));
        assert_eq!(value_token("0x1A"), TokenKind::Integer(26));
        assert_eq!(value_token("0o755"), TokenKind::Integer(0o755));
        assert_eq!(value_token("0b1101_0101"), TokenKind::Integer(0b1101_0101));
    }

    #[test]
    fn bad_underscores_are_lexical_errors() {
        assert!(matches!(value_error("_100"), Error::Lexical { .. }));
        assert!(matches!(value_error("100_"), Error::Lexical { .. }));
        assert!(matches!(value_error("1__0"), Error::Lexical { .. }));
        assert!(matches!(value_error("0x_1"), Error::Lexical { .. }));
    }

    #[test]
    fn floats() {
        assert_eq!(value_token("1_000.5"), TokenKind::Float(1000.5));
        assert_eq!(value_token("1e6"), TokenKind::Float(1e6));
        assert_eq!(value_token("-2E-2"), TokenKind::Float(-2e-2));
        assert_eq!(value_token("6.626e-34"), TokenKind::Float(6.626e-34));
        assert_eq!(value_token("inf"), TokenKind::Float(f64::INFINITY));
        assert_eq!(value_token("-inf"), TokenKind::Float(f64::NEG_INFINITY));
        match value_token("nan") {
            TokenKind::Float(f) => assert!(f.is_nan()),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn malformed_floats() {
        assert!(matches!(value_error(".5"), Error::Lexical { .. }));
        assert!(matches!(value_error("5."), Error::Lexical { .. }));
        assert!(matches!(value_error("1e"), Error::Lexical { .. }));
        assert!(matches!(value_error("03.2"), Error::Lexical { .. }));
    }

    #[test]
    fn leading_zero_rejected() {
        assert!(matches!(value_error("042"), Error::Lexical { .. }));
        assert!(matches!(value_error("0_1"), Error::Lexical { .. }));
        assert_eq!(value_token("0"), TokenKind::Integer(0));
        assert_eq!(value_token("0.0"), TokenKind::Float(0.0));
    }

    #[test]
    fn radix_errors_name_the_bad_digit() {
        match value_error("0xG1") {
            Error::Lexical { msg, .. } => assert!(msg.contains("invalid digit `G`"), "{msg}"),
            other => panic!("expected lexical error, got {other:?}"),
        }
        match value_error("0b12") {
            Error::Lexical { msg, .. } => assert!(msg.contains("invalid digit `2`"), "{msg}"),
            other => panic!("expected lexical error, got {other:?}"),
        }
        match value_error("0xFFFF_FFFF_FFFF_FFFF") {
            Error::Lexical { msg, .. } => {
                assert!(msg.contains("does not fit in 64 bits"), "{msg}")
            }
            other => panic!("expected lexical error, got {other:?}"),
        }
    }

    #[test]
    fn datetimes_win_over_numbers() {
        match value_token("2024-01-02") {
            TokenKind::DateTime(dt) => assert_eq!(dt.to_string(), "2024-01-02"),
            other => panic!("expected date-time, got {other:?}"),
        }
        match value_token("2024-01-02 03:04:05Z") {
            TokenKind::DateTime(dt) => assert_eq!(dt.to_string(), "2024-01-02T03:04:05Z"),
            other => panic!("expected date-time, got {other:?}"),
        }
        match value_token("07:32:00") {
            TokenKind::DateTime(dt) => assert_eq!(dt.to_string(), "07:32:00"),
            other => panic!("expected date-time, got {other:?}"),
        }
    }

    #[test]
    fn basic_string_escapes() {
        assert_eq!(
            value_token(r#""a\tb\n\u00E9""#),
            TokenKind::String {
                value: "a\tb\né".to_string(),
                literal: false,
                multiline: false,
            }
        );
        assert!(matches!(value_error(r#""bad \q""#), Error::Lexical { .. }));
        assert!(matches!(value_error("\"open"), Error::Lexical { .. }));
    }

    #[test]
    fn unterminated_strings_point_at_the_opening_quote() {
        for input in ["\"open", "'open", "\"\"\"open\nstill open", "'''open"] {
            match value_error(input) {
                Error::Lexical { line, col, msg } => {
                    assert_eq!((line, col), (1, 1), "{input}");
                    assert!(msg.contains("unterminated"), "{msg}");
                }
                other => panic!("expected lexical error, got {other:?}"),
            }
        }
    }

    #[test]
    fn literal_strings_take_text_verbatim() {
        assert_eq!(
            value_token(r"'C:\Users\no_escape'"),
            TokenKind::String {
                value: r"C:\Users\no_escape".to_string(),
                literal: true,
                multiline: false,
            }
        );
    }

    #[test]
    fn multiline_strips_leading_newline() {
        let kind = value_token("\"\"\"\nline one\nline two\"\"\"");
        assert_eq!(
            kind,
            TokenKind::String {
                value: "line one\nline two".to_string(),
                literal: false,
                multiline: true,
            }
        );
    }

    #[test]
    fn multiline_line_ending_backslash() {
        let kind = value_token("\"\"\"one \\\n    two\"\"\"");
        assert_eq!(
            kind,
            TokenKind::String {
                value: "one two".to_string(),
                literal: false,
                multiline: true,
            }
        );
    }

    #[test]
    fn multiline_allows_embedded_quotes() {
        let kind = value_token("\"\"\"she said \"hi\"\"\"\"");
        assert_eq!(
            kind,
            TokenKind::String {
                value: "she said \"hi\"".to_string(),
                literal: false,
                multiline: true,
            }
        );
    }

    #[test]
    fn comments_and_newlines() {
        let mut tokenizer = Tokenizer::new("a # comment\nb");
        assert_eq!(
            tokenizer.next_token(Mode::Key).unwrap().kind,
            TokenKind::Key("a".to_string())
        );
        assert_eq!(tokenizer.next_token(Mode::Key).unwrap().kind, TokenKind::Newline);
        assert_eq!(
            tokenizer.next_token(Mode::Key).unwrap().kind,
            TokenKind::Key("b".to_string())
        );
        assert_eq!(tokenizer.next_token(Mode::Key).unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn bare_keys_in_key_mode() {
        let mut tokenizer = Tokenizer::new("true-1_b = ");
        assert_eq!(
            tokenizer.next_token(Mode::Key).unwrap().kind,
            TokenKind::Key("true-1_b".to_string())
        );
        assert_eq!(tokenizer.next_token(Mode::Key).unwrap().kind, TokenKind::Equals);
    }

    #[test]
    fn header_brackets_merge_in_key_mode() {
        let mut tokenizer = Tokenizer::new("[[a]]");
        assert_eq!(
            tokenizer.next_token(Mode::Key).unwrap().kind,
            TokenKind::DoubleLeftBracket
        );
        assert_eq!(
            tokenizer.next_token(Mode::Key).unwrap().kind,
            TokenKind::Key("a".to_string())
        );
        assert_eq!(
            tokenizer.next_token(Mode::Key).unwrap().kind,
            TokenKind::DoubleRightBracket
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut tokenizer = Tokenizer::new("a\n  b");
        let a = tokenizer.next_token(Mode::Key).unwrap();
        assert_eq!((a.line, a.col), (1, 1));
        tokenizer.next_token(Mode::Key).unwrap();
        let b = tokenizer.next_token(Mode::Key).unwrap();
        assert_eq!((b.line, b.col), (2, 3));
    }

    #[test]
    fn control_characters_rejected() {
        assert!(matches!(value_error("\"a\u{0001}b\""), Error::Lexical { .. }));
        assert!(matches!(value_error("'a\u{0001}b'"), Error::Lexical { .. }));
    }
}
