//! Memory model: the 256-byte data/instruction RAM and the ROM program table.

/// Fetch-range policy helpers for both instruction spaces.
pub mod access;
/// Fixed 256-entry ROM program table.
pub mod program;

pub use access::{validate_ram_fetch, validate_rom_fetch};
pub use program::{ProgramImage, PROGRAM_WORDS};

use crate::decoder::{InstructionWord, INSTRUCTION_WORD_BYTES};
use crate::fault::ImageError;

/// Size in bytes of the data/instruction RAM.
pub const MEMORY_BYTES: usize = 256;

/// Byte-addressable RAM shared by data accesses and RAM-space fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            bytes: vec![0; MEMORY_BYTES].into_boxed_slice(),
        }
    }
}

impl Memory {
    /// Creates memory preloaded with `image` at address 0; the rest is zero.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::MemoryTooLarge`] when `image` exceeds 256 bytes.
    pub fn from_image(image: &[u8]) -> Result<Self, ImageError> {
        if image.len() > MEMORY_BYTES {
            return Err(ImageError::MemoryTooLarge {
                len: image.len(),
                capacity: MEMORY_BYTES,
            });
        }
        let mut memory = Self::default();
        memory.bytes[..image.len()].copy_from_slice(image);
        Ok(memory)
    }

    /// Reads one byte. Every `u8` address is in range.
    #[must_use]
    pub fn read(&self, addr: u8) -> u8 {
        self.bytes[usize::from(addr)]
    }

    /// Writes one byte.
    pub fn write(&mut self, addr: u8, value: u8) {
        self.bytes[usize::from(addr)] = value;
    }

    /// Assembles the instruction word stored at `byte_addr..byte_addr + 8`.
    ///
    /// Returns `None` when the eight bytes do not fit inside memory.
    #[must_use]
    pub fn instruction_at(&self, byte_addr: usize) -> Option<InstructionWord> {
        let end = byte_addr.checked_add(INSTRUCTION_WORD_BYTES)?;
        let slice = self.bytes.get(byte_addr..end)?;
        let mut bytes = [0u8; INSTRUCTION_WORD_BYTES];
        bytes.copy_from_slice(slice);
        Some(InstructionWord::from_le_bytes(bytes))
    }

    /// Stores an instruction word at `byte_addr`, lowest byte first.
    ///
    /// Returns `false` and leaves memory untouched when it does not fit.
    pub fn store_instruction(&mut self, byte_addr: usize, word: InstructionWord) -> bool {
        let Some(end) = byte_addr.checked_add(INSTRUCTION_WORD_BYTES) else {
            return false;
        };
        let Some(slice) = self.bytes.get_mut(byte_addr..end) else {
            return false;
        };
        slice.copy_from_slice(&word.to_le_bytes());
        true
    }

    /// Returns the full backing store.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Zeroes every byte.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}
