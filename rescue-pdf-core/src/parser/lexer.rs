//! PDF Lexer
//!
//! Tokenizes PDF syntax according to ISO 32000-1 Section 7.2

use super::source::ByteCursor;
use super::{ParseError, ParseResult};
use std::io::{Read, Seek};

/// PDF Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Boolean: true or false
    Boolean(bool),

    /// Integer number
    Integer(i64),

    /// Real number
    Real(f64),

    /// String (literal or hexadecimal)
    String(Vec<u8>),

    /// Name object (e.g., /Type)
    Name(String),

    /// Left square bracket [
    ArrayStart,

    /// Right square bracket ]
    ArrayEnd,

    /// Dictionary start <<
    DictStart,

    /// Dictionary end >>
    DictEnd,

    /// Stream keyword
    Stream,

    /// Endstream keyword
    EndStream,

    /// Obj keyword
    Obj,

    /// Endobj keyword
    EndObj,

    /// StartXRef keyword
    StartXRef,

    /// Any other bare word (xref, trailer, R, content operators, ...)
    Keyword(String),

    /// Null object
    Null,

    /// Comment (usually ignored)
    Comment(String),

    /// End of file
    Eof,
}

impl Token {
    /// Literal text of an operator/keyword token
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Token::Stream => Some("stream"),
            Token::EndStream => Some("endstream"),
            Token::Obj => Some("obj"),
            Token::EndObj => Some("endobj"),
            Token::StartXRef => Some("startxref"),
            Token::Keyword(word) => Some(word.as_str()),
            _ => None,
        }
    }
}

/// PDF Lexer for tokenizing PDF content
pub struct Lexer<R> {
    cursor: ByteCursor<R>,
    token_buffer: Vec<Token>,
}

impl<R: Read + Seek> Lexer<R> {
    /// Create a new lexer from a reader
    pub fn new(reader: R) -> ParseResult<Self> {
        Ok(Self::from_cursor(ByteCursor::new(reader)?))
    }

    /// Create a lexer over an existing byte cursor
    pub fn from_cursor(cursor: ByteCursor<R>) -> Self {
        Self {
            cursor,
            token_buffer: Vec::new(),
        }
    }

    /// Access the underlying cursor
    ///
    /// Any pushed-back tokens are dropped.
    pub fn cursor_mut(&mut self) -> &mut ByteCursor<R> {
        self.token_buffer.clear();
        &mut self.cursor
    }

    /// Total length of the input
    pub fn len(&self) -> u64 {
        self.cursor.len()
    }

    /// Check if the input is empty
    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Get current position
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Seek to an absolute offset and resynchronize token boundaries there
    pub fn seek(&mut self, offset: u64) -> ParseResult<()> {
        self.token_buffer.clear();
        self.cursor.seek(offset)?;
        Ok(())
    }

    /// Get the next token
    pub fn next_token(&mut self) -> ParseResult<Token> {
        // Check if we have a pushed-back token
        if let Some(token) = self.token_buffer.pop() {
            return Ok(token);
        }

        self.skip_whitespace()?;

        let ch = match self.peek_char()? {
            Some(ch) => ch,
            None => return Ok(Token::Eof),
        };

        match ch {
            b'%' => self.read_comment(),
            b'/' => self.read_name(),
            b'(' => self.read_literal_string(),
            b'<' => self.read_angle_bracket(),
            b'>' => {
                self.consume_char()?;
                if self.peek_char()? == Some(b'>') {
                    self.consume_char()?;
                    Ok(Token::DictEnd)
                } else {
                    Err(self.syntax_error("Expected '>' after '>'"))
                }
            }
            b'[' => {
                self.consume_char()?;
                Ok(Token::ArrayStart)
            }
            b']' => {
                self.consume_char()?;
                Ok(Token::ArrayEnd)
            }
            b't' | b'f' => self.read_boolean(),
            b'n' => self.read_null(),
            b'+' | b'-' | b'0'..=b'9' | b'.' => self.read_number(),
            _ if ch.is_ascii_alphabetic() || ch == b'\'' || ch == b'"' || ch == b'*' => {
                self.read_keyword()
            }
            _ => Err(self.syntax_error(format!("Unexpected character: {}", ch as char))),
        }
    }

    /// Push back a token to be returned by the next call to next_token
    pub fn push_token(&mut self, token: Token) {
        self.token_buffer.push(token);
    }

    fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::SyntaxError {
            position: self.cursor.position(),
            message: message.into(),
        }
    }

    /// Peek at the next character without consuming it
    fn peek_char(&mut self) -> ParseResult<Option<u8>> {
        Ok(self.cursor.peek()?)
    }

    /// Consume the next character
    fn consume_char(&mut self) -> ParseResult<Option<u8>> {
        Ok(self.cursor.next_byte()?)
    }

    /// Skip whitespace and return the number of bytes skipped
    pub(crate) fn skip_whitespace(&mut self) -> ParseResult<usize> {
        let mut count = 0;
        while let Some(ch) = self.peek_char()? {
            if is_whitespace(ch) {
                self.consume_char()?;
                count += 1;
            } else {
                break;
            }
        }
        Ok(count)
    }

    /// Read a comment (from % to end of line)
    fn read_comment(&mut self) -> ParseResult<Token> {
        self.consume_char()?; // consume '%'
        let mut comment = String::new();

        while let Some(ch) = self.peek_char()? {
            if ch == b'\n' || ch == b'\r' {
                break;
            }
            self.consume_char()?;
            comment.push(ch as char);
        }

        Ok(Token::Comment(comment))
    }

    /// Read a name object (e.g., /Type)
    fn read_name(&mut self) -> ParseResult<Token> {
        self.consume_char()?; // consume '/'
        let mut name = String::new();

        while let Some(ch) = self.peek_char()? {
            if is_whitespace(ch) || is_delimiter(ch) {
                break;
            }
            self.consume_char()?;

            // Handle hex codes in names (e.g., /A#20B means /A B)
            if ch == b'#' {
                let hex1 = self
                    .consume_char()?
                    .ok_or_else(|| self.syntax_error("Incomplete hex code in name"))?;
                let hex2 = self
                    .consume_char()?
                    .ok_or_else(|| self.syntax_error("Incomplete hex code in name"))?;

                let value = match (hex_value(hex1), hex_value(hex2)) {
                    (Some(high), Some(low)) => (high << 4) | low,
                    _ => return Err(self.syntax_error("Invalid hex code in name")),
                };
                name.push(value as char);
            } else {
                name.push(ch as char);
            }
        }

        Ok(Token::Name(name))
    }

    /// Read a literal string (parentheses)
    fn read_literal_string(&mut self) -> ParseResult<Token> {
        self.consume_char()?; // consume '('
        let mut string = Vec::new();
        let mut paren_depth = 1;
        let mut escape = false;

        while paren_depth > 0 {
            let ch = self
                .consume_char()?
                .ok_or_else(|| self.syntax_error("Unterminated string"))?;

            if escape {
                let escaped = match ch {
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'b' => b'\x08',
                    b'f' => b'\x0C',
                    b'0'..=b'7' => {
                        // Octal escape sequence
                        let mut value = ch - b'0';
                        for _ in 0..2 {
                            match self.peek_char()? {
                                Some(next @ b'0'..=b'7') => {
                                    self.consume_char()?;
                                    value = value.wrapping_mul(8).wrapping_add(next - b'0');
                                }
                                _ => break,
                            }
                        }
                        value
                    }
                    _ => ch, // (, ), \ and unknown escapes are literal
                };
                string.push(escaped);
                escape = false;
            } else {
                match ch {
                    b'\\' => escape = true,
                    b'(' => {
                        string.push(ch);
                        paren_depth += 1;
                    }
                    b')' => {
                        paren_depth -= 1;
                        if paren_depth > 0 {
                            string.push(ch);
                        }
                    }
                    _ => string.push(ch),
                }
            }
        }

        Ok(Token::String(string))
    }

    /// Read angle bracket tokens (hex strings or dict markers)
    fn read_angle_bracket(&mut self) -> ParseResult<Token> {
        self.consume_char()?; // consume '<'

        if self.peek_char()? == Some(b'<') {
            self.consume_char()?;
            return Ok(Token::DictStart);
        }

        let mut digits = Vec::new();
        let mut found_end = false;

        while let Some(ch) = self.consume_char()? {
            if ch == b'>' {
                found_end = true;
                break;
            }
            match hex_value(ch) {
                Some(value) => digits.push(value),
                None if is_whitespace(ch) => {}
                None => return Err(self.syntax_error("Invalid character in hex string")),
            }
        }

        if !found_end {
            return Err(self.syntax_error("Unterminated hex string"));
        }

        // Pad with 0 if odd number of digits
        if digits.len() % 2 != 0 {
            digits.push(0);
        }

        let bytes = digits
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect();
        Ok(Token::String(bytes))
    }

    /// Read boolean (true/false)
    fn read_boolean(&mut self) -> ParseResult<Token> {
        let word = self.read_word()?;
        match word.as_str() {
            "true" => Ok(Token::Boolean(true)),
            "false" => Ok(Token::Boolean(false)),
            _ => Ok(Self::process_keyword(word)),
        }
    }

    /// Read null
    fn read_null(&mut self) -> ParseResult<Token> {
        let word = self.read_word()?;
        if word == "null" {
            Ok(Token::Null)
        } else {
            Ok(Self::process_keyword(word))
        }
    }

    /// Read a number (integer or real)
    fn read_number(&mut self) -> ParseResult<Token> {
        let mut number_str = String::new();
        let mut has_dot = false;

        // Handle sign - consume it first
        if let Some(ch @ (b'+' | b'-')) = self.peek_char()? {
            self.consume_char()?;
            number_str.push(ch as char);

            // After sign, we must have at least one digit
            match self.peek_char()? {
                Some(next) if next.is_ascii_digit() || next == b'.' => {}
                _ => return Err(self.syntax_error("Expected digit after sign")),
            }
        }

        // Read digits and decimal point
        while let Some(ch) = self.peek_char()? {
            match ch {
                b'0'..=b'9' => {
                    self.consume_char()?;
                    number_str.push(ch as char);
                }
                b'.' if !has_dot => {
                    self.consume_char()?;
                    number_str.push(ch as char);
                    has_dot = true;
                }
                _ => break,
            }
        }

        if has_dot {
            let value = number_str
                .parse::<f64>()
                .map_err(|_| self.syntax_error(format!("Invalid real number: '{number_str}'")))?;
            Ok(Token::Real(value))
        } else {
            let value = number_str
                .parse::<i64>()
                .map_err(|_| self.syntax_error(format!("Invalid integer: '{number_str}'")))?;
            Ok(Token::Integer(value))
        }
    }

    /// Read a keyword
    fn read_keyword(&mut self) -> ParseResult<Token> {
        let word = self.read_word()?;
        Ok(Self::process_keyword(word))
    }

    /// Process a word as a keyword
    fn process_keyword(word: String) -> Token {
        match word.as_str() {
            "stream" => Token::Stream,
            "endstream" => Token::EndStream,
            "obj" => Token::Obj,
            "endobj" => Token::EndObj,
            "startxref" => Token::StartXRef,
            _ => Token::Keyword(word),
        }
    }

    /// Read a word (sequence of non-delimiter characters)
    fn read_word(&mut self) -> ParseResult<String> {
        let mut word = String::new();

        while let Some(ch) = self.peek_char()? {
            if is_whitespace(ch) || is_delimiter(ch) {
                break;
            }
            self.consume_char()?;
            word.push(ch as char);
        }

        Ok(word)
    }
}

/// PDF whitespace characters (ISO 32000-1 Table 1)
pub(crate) fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

/// PDF delimiter characters (ISO 32000-1 Table 2)
pub(crate) fn is_delimiter(ch: u8) -> bool {
    matches!(
        ch,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Get value of hex digit
pub(crate) fn hex_value(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}
