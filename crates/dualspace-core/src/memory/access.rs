//! Fetch-range policy for the two instruction spaces.

use crate::decoder::INSTRUCTION_WORD_BYTES;
use crate::{FaultCode, MEMORY_BYTES, PROGRAM_WORDS};

/// Highest legal byte address for a RAM-space fetch.
pub const RAM_FETCH_LIMIT: usize = MEMORY_BYTES - INSTRUCTION_WORD_BYTES;

/// Validates a ROM-space fetch and returns the table index.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] unless `pc < 256`.
pub fn validate_rom_fetch(pc: u32) -> Result<usize, FaultCode> {
    usize::try_from(pc)
        .ok()
        .filter(|index| *index < PROGRAM_WORDS)
        .ok_or(FaultCode::AddressOutOfRange)
}

/// Validates a RAM-space fetch and returns the starting byte address.
///
/// RAM-space PCs count 8-byte instruction slots, so the byte address is
/// `pc * 8` and must not exceed `256 - 8`.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] when the eight bytes would not
/// fit inside memory.
pub fn validate_ram_fetch(pc: u32) -> Result<usize, FaultCode> {
    usize::try_from(pc)
        .ok()
        .and_then(|slot| slot.checked_mul(INSTRUCTION_WORD_BYTES))
        .filter(|addr| *addr <= RAM_FETCH_LIMIT)
        .ok_or(FaultCode::AddressOutOfRange)
}
