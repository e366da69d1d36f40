//! # Neander assembler
//!
//! Translates assembly source for the Neander 8-bit teaching CPU into a
//! `.mem` memory image: two header words (`0x4E03`, `0x5244`) followed by the
//! populated cells of a 512-word memory, written as little-endian 16-bit words.
//!
//! ```rust
//! use neander_asm::assemble_source;
//!
//! let image = assemble_source(".CODE\nLDA 0x0A\nHLT").unwrap();
//! assert_eq!(image.to_words(), vec![0x4E03, 0x5244, 0x20, 0x0A, 0xF0]);
//! ```
//!
//! ## Modules
//!
//! - `lexer` - line-oriented tokenizer
//! - `assembler` - single-pass translator (`.DATA` / `.CODE` sections)
//! - `opcodes` - mnemonic table
//! - `image` - memory image, artifact writer and loader
//! - `tui` - interactive workbench

pub mod assembler;
pub mod config;
pub mod error;
pub mod image;
pub mod lexer;
pub mod opcodes;
pub mod tui;

pub use assembler::{Assembler, Section, assemble_reader, assemble_source};
pub use error::{AsmError, ErrorKind};
pub use image::{ImageError, MemoryImage};
pub use lexer::{Lexer, SpannedToken, Token, tokenize};
pub use opcodes::{INSTRUCTIONS, Instruction};
