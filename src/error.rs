use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::MEMORY_SIZE;

/// Broad classification used by the driver to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Grammar,
    Semantic,
}

#[derive(Debug, Error)]
pub enum AsmError {
    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: expected {expected}, found {found}")]
    Syntax {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: invalid numeric literal '{text}'")]
    InvalidNumber { line: usize, text: String },

    #[error("line {line}: numeric literal '{text}' does not fit in a 16-bit cell")]
    NumberOutOfRange { line: usize, text: String },

    #[error("line {line}: address {address} is outside memory (0..{size})", size = MEMORY_SIZE)]
    AddressOutOfRange { line: usize, address: usize },

    #[error("failed to write {}: {source}", .path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AsmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AsmError::Io(_) | AsmError::Emit { .. } => ErrorKind::Io,
            AsmError::Syntax { .. } => ErrorKind::Grammar,
            AsmError::UnknownMnemonic { .. }
            | AsmError::InvalidNumber { .. }
            | AsmError::NumberOutOfRange { .. }
            | AsmError::AddressOutOfRange { .. } => ErrorKind::Semantic,
        }
    }

    /// Source line the error points at, if it came from translation.
    pub fn line(&self) -> Option<usize> {
        match self {
            AsmError::Syntax { line, .. }
            | AsmError::UnknownMnemonic { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::NumberOutOfRange { line, .. }
            | AsmError::AddressOutOfRange { line, .. } => Some(*line),
            AsmError::Io(_) | AsmError::Emit { .. } => None,
        }
    }
}
