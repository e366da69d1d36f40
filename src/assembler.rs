use std::io::BufRead;

use tracing::{debug, warn};

use crate::error::AsmError;
use crate::image::MemoryImage;
use crate::lexer::{Lexer, NumberError, SpannedToken, Token, parse_number};
use crate::opcodes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Data,
    Code,
}

/// Single-pass translator. Pulls tokens from the lexer and writes resolved
/// cells straight into a borrowed memory image.
pub struct Assembler<R> {
    lexer: Lexer<R>,
    section: Section,
    code_address: usize,
}

impl<R: BufRead> Assembler<R> {
    pub fn new(lexer: Lexer<R>) -> Self {
        Self {
            lexer,
            // no directive seen yet means code
            section: Section::Code,
            code_address: 0,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn code_address(&self) -> usize {
        self.code_address
    }

    /// Translates the whole source into `image`. Stops at the first error;
    /// the image contents are unspecified after a failure.
    pub fn assemble(&mut self, image: &mut MemoryImage) -> Result<(), AsmError> {
        loop {
            let spanned = self.lexer.next_token()?;
            match &spanned.token {
                Token::EndOfInput => return Ok(()),
                Token::EndOfLine => continue,
                Token::Directive(name) => self.directive(name, spanned.line),
                _ => match self.section {
                    Section::Data => self.data_entry(&spanned, image)?,
                    Section::Code => self.instruction(&spanned, image)?,
                },
            }
        }
    }

    fn directive(&mut self, name: &str, line: usize) {
        match name {
            ".DATA" => {
                debug!(line, "entering data section");
                self.section = Section::Data;
            }
            ".CODE" => {
                debug!(line, previous = self.code_address, "entering code section, cursor reset");
                self.section = Section::Code;
                self.code_address = 0;
            }
            _ => warn!(line, directive = name, "ignoring unknown directive"),
        }
    }

    // <address> <value>
    fn data_entry(&mut self, first: &SpannedToken, image: &mut MemoryImage) -> Result<(), AsmError> {
        let address = expect_number(first, "a data address")?;
        let second = self.lexer.next_token()?;
        let value = expect_number(&second, "a data value")?;

        let address = usize::from(address);
        store(image, address, value, first.line)
    }

    // <mnemonic> [operand]
    fn instruction(&mut self, first: &SpannedToken, image: &mut MemoryImage) -> Result<(), AsmError> {
        let mnemonic = match &first.token {
            Token::Mnemonic(text) | Token::Unrecognized(text) => text,
            other => return Err(syntax_error(first.line, "a mnemonic", other)),
        };
        let instr = opcodes::find(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
            line: first.line,
            mnemonic: mnemonic.clone(),
        })?;

        store(image, self.code_address, instr.opcode, first.line)?;

        if instr.takes_operand() {
            let operand = self.lexer.next_token()?;
            let value = expect_number(&operand, "a numeric operand")?;
            store(image, self.code_address + 1, value, operand.line)?;
        }

        self.code_address += instr.size();
        Ok(())
    }
}

/// Translates `source` into a fresh memory image.
pub fn assemble_source(source: &str) -> Result<MemoryImage, AsmError> {
    assemble_reader(source.as_bytes())
}

pub fn assemble_reader<R: BufRead>(reader: R) -> Result<MemoryImage, AsmError> {
    let mut image = MemoryImage::new();
    Assembler::new(Lexer::new(reader)).assemble(&mut image)?;
    Ok(image)
}

fn store(image: &mut MemoryImage, address: usize, value: u16, line: usize) -> Result<(), AsmError> {
    image
        .store(address, value)
        .ok_or(AsmError::AddressOutOfRange { line, address })
}

fn expect_number(spanned: &SpannedToken, expected: &'static str) -> Result<u16, AsmError> {
    let Token::Number(text) = &spanned.token else {
        return Err(syntax_error(spanned.line, expected, &spanned.token));
    };
    parse_number(text).map_err(|err| match err {
        NumberError::Malformed => AsmError::InvalidNumber {
            line: spanned.line,
            text: text.clone(),
        },
        NumberError::TooLarge => AsmError::NumberOutOfRange {
            line: spanned.line,
            text: text.clone(),
        },
    })
}

fn syntax_error(line: usize, expected: &'static str, found: &Token) -> AsmError {
    AsmError::Syntax {
        line,
        expected,
        found: found.to_string(),
    }
}
