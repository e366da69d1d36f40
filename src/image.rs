use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{HEADER, HEADER_WORDS, MEMORY_SIZE};
use crate::error::AsmError;

/// Errors from decoding a previously written artifact.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("artifact has an odd number of bytes ({0})")]
    OddLength(usize),

    #[error("artifact is too short to hold the header")]
    MissingHeader,

    #[error("bad header {0:#06x} {1:#06x}")]
    BadHeader(u16, u16),

    #[error("artifact holds {0} cells, memory has room for {max}", max = MEMORY_SIZE)]
    TooLarge(usize),
}

/// The translated memory: 512 zero-initialized cells and the highest index written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    cells: [u16; MEMORY_SIZE],
    max_address: usize,
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryImage {
    pub fn new() -> Self {
        MemoryImage {
            cells: [0; MEMORY_SIZE],
            max_address: 0,
        }
    }

    /// Writes `value` at `address`. Returns `None` when the address is outside memory,
    /// leaving the image untouched.
    pub fn store(&mut self, address: usize, value: u16) -> Option<()> {
        let cell = self.cells.get_mut(address)?;
        *cell = value;
        self.max_address = self.max_address.max(address);
        Some(())
    }

    pub fn get(&self, address: usize) -> Option<u16> {
        self.cells.get(address).copied()
    }

    pub fn max_address(&self) -> usize {
        self.max_address
    }

    pub fn cells(&self) -> &[u16; MEMORY_SIZE] {
        &self.cells
    }

    /// The cells that end up in the artifact, `[0, max_address]`.
    pub fn live_window(&self) -> &[u16] {
        &self.cells[..=self.max_address]
    }

    /// Artifact contents as words: the header followed by the live window.
    pub fn to_words(&self) -> Vec<u16> {
        let mut words = Vec::with_capacity(HEADER_WORDS + self.max_address + 1);
        words.extend_from_slice(&HEADER);
        words.extend_from_slice(self.live_window());
        words
    }

    /// Serializes the artifact as consecutive little-endian 16-bit words.
    pub fn write_artifact<W: Write>(&self, mut writer: W) -> io::Result<usize> {
        let words = self.to_words();
        for word in &words {
            writer.write_all(&word.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(words.len())
    }

    /// Creates (or truncates) `path` and writes the artifact into it.
    pub fn save(&self, path: &Path) -> Result<usize, AsmError> {
        let emit_err = |source| AsmError::Emit {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(emit_err)?;
        let words = self.write_artifact(BufWriter::new(file)).map_err(emit_err)?;
        info!(path = %path.display(), words, "artifact written");
        Ok(words)
    }

    /// Rebuilds an image from artifact bytes. The header is checked and stripped;
    /// the remaining words land at addresses starting from 0.
    pub fn from_artifact(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.len() % 2 != 0 {
            return Err(ImageError::OddLength(bytes.len()));
        }
        let words: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let [first, second, body @ ..] = words.as_slice() else {
            return Err(ImageError::MissingHeader);
        };
        if [*first, *second] != HEADER {
            return Err(ImageError::BadHeader(*first, *second));
        }
        if body.len() > MEMORY_SIZE {
            return Err(ImageError::TooLarge(body.len()));
        }

        let mut image = MemoryImage::new();
        image.cells[..body.len()].copy_from_slice(body);
        image.max_address = body.len().saturating_sub(1);
        Ok(image)
    }
}
