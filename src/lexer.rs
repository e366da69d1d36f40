use std::fmt;
use std::io::BufRead;

use tracing::trace;

use crate::error::AsmError;
use crate::opcodes;

#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Mnemonic(String),
    Number(String),
    Directive(String),
    Unrecognized(String),
    EndOfLine,
    EndOfInput,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Mnemonic(text) => write!(f, "mnemonic '{}'", text),
            Token::Number(text) => write!(f, "number '{}'", text),
            Token::Directive(text) => write!(f, "directive '{}'", text),
            Token::Unrecognized(text) => write!(f, "'{}'", text),
            Token::EndOfLine => write!(f, "end of line"),
            Token::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// Pull-based tokenizer. Reads the source one physical line at a time and
/// hands out tokens on demand; every non-comment line ends with exactly one
/// `EndOfLine`.
pub struct Lexer<R> {
    reader: R,
    line: Vec<u8>,
    cursor: usize,
    line_number: usize,
    line_open: bool,
    at_eof: bool,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Lexer {
            reader,
            line: Vec::new(),
            cursor: 0,
            line_number: 0,
            line_open: false,
            at_eof: false,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, AsmError> {
        if !self.line_open && !self.fill_line()? {
            return Ok(self.spanned(Token::EndOfInput, self.cursor));
        }

        let bytes = self.line.as_slice();
        while self.cursor < bytes.len() && is_delimiter(bytes[self.cursor]) {
            if bytes[self.cursor] == b';' {
                // the rest of the line is a comment
                return Ok(self.close_line());
            }
            self.cursor += 1;
        }

        if self.cursor >= bytes.len() {
            return Ok(self.close_line());
        }

        let start = self.cursor;
        while self.cursor < bytes.len() && !is_delimiter(bytes[self.cursor]) {
            self.cursor += 1;
        }

        // non-UTF-8 bytes survive as replacement characters and classify as unrecognized
        let token = classify(&String::from_utf8_lossy(&self.line[start..self.cursor]));
        trace!(line = self.line_number, ?token, "token");
        Ok(self.spanned(token, start))
    }

    // Loads the next line that is not a pure comment. Returns false at end of input.
    fn fill_line(&mut self) -> Result<bool, AsmError> {
        if self.at_eof {
            return Ok(false);
        }
        loop {
            self.line.clear();
            self.cursor = 0;
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                self.at_eof = true;
                return Ok(false);
            }
            self.line_number += 1;
            if !is_comment(&self.line) {
                self.line_open = true;
                return Ok(true);
            }
        }
    }

    fn close_line(&mut self) -> SpannedToken {
        let column = self.cursor;
        self.cursor = self.line.len();
        self.line_open = false;
        self.spanned(Token::EndOfLine, column)
    }

    fn spanned(&self, token: Token, offset: usize) -> SpannedToken {
        SpannedToken {
            token,
            line: self.line_number,
            column: offset + 1,
        }
    }
}

/// Tokenizes a whole source string, up to and including `EndOfInput`.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, AsmError> {
    let mut lexer = Lexer::new(source.as_bytes());
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.token == Token::EndOfInput;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

pub fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b';')
}

/// A line whose first non-blank byte is `;`.
pub fn is_comment(line: &[u8]) -> bool {
    line.iter()
        .find(|&&b| b != b' ' && b != b'\t')
        .is_some_and(|&b| b == b';')
}

fn classify(text: &str) -> Token {
    if text.starts_with('.') {
        Token::Directive(text.to_string())
    } else if text.starts_with(|c: char| c.is_ascii_digit()) || has_hex_prefix(text) {
        Token::Number(text.to_string())
    } else if opcodes::lookup(text).is_some() {
        Token::Mnemonic(text.to_string())
    } else {
        Token::Unrecognized(text.to_string())
    }
}

fn has_hex_prefix(text: &str) -> bool {
    text.starts_with("0x") || text.starts_with("0X")
}

/// Why a numeric literal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    Malformed,
    TooLarge,
}

/// Parses a decimal or `0x`-prefixed hexadecimal literal into a cell value.
pub fn parse_number(text: &str) -> Result<u16, NumberError> {
    let (digits, radix) = if has_hex_prefix(text) {
        (&text[2..], 16)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(NumberError::Malformed);
    }

    let value = u32::from_str_radix(digits, radix).map_err(|_| NumberError::TooLarge)?;
    u16::try_from(value).map_err(|_| NumberError::TooLarge)
}
