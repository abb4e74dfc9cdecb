use crate::decoder::{DecodedInstruction, InstructionWord};
use crate::fault::ImageError;

/// Number of entries in the ROM program table.
pub const PROGRAM_WORDS: usize = 256;

/// Read-only program table consulted directly by ROM-space fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ProgramImage {
    words: Box<[InstructionWord]>,
}

impl Default for ProgramImage {
    fn default() -> Self {
        Self {
            words: vec![InstructionWord::default(); PROGRAM_WORDS].into_boxed_slice(),
        }
    }
}

impl ProgramImage {
    /// Builds a table from raw words; missing trailing entries are zero.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::ProgramTooLarge`] for more than 256 words.
    pub fn from_words(words: &[u64]) -> Result<Self, ImageError> {
        Self::check_len(words.len())?;
        let mut image = Self::default();
        for (slot, raw) in image.words.iter_mut().zip(words) {
            *slot = InstructionWord::new(*raw);
        }
        Ok(image)
    }

    /// Builds a table by encoding decoded instructions.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::ProgramTooLarge`] for more than 256 instructions.
    pub fn from_instructions(program: &[DecodedInstruction]) -> Result<Self, ImageError> {
        Self::check_len(program.len())?;
        let mut image = Self::default();
        for (slot, instruction) in image.words.iter_mut().zip(program) {
            *slot = instruction.encode();
        }
        Ok(image)
    }

    const fn check_len(len: usize) -> Result<(), ImageError> {
        if len > PROGRAM_WORDS {
            Err(ImageError::ProgramTooLarge {
                len,
                capacity: PROGRAM_WORDS,
            })
        } else {
            Ok(())
        }
    }

    /// Returns the word at `index`, or `None` past the end of the table.
    #[must_use]
    pub fn word_at(&self, index: usize) -> Option<InstructionWord> {
        self.words.get(index).copied()
    }

    /// Returns every entry in table order.
    #[must_use]
    pub fn words(&self) -> &[InstructionWord] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::{ProgramImage, PROGRAM_WORDS};
    use crate::decoder::{DecodedInstruction, InstructionWord};
    use crate::encoding::Opcode;
    use crate::fault::ImageError;

    #[test]
    fn short_images_are_zero_padded_to_full_table() {
        let image = ProgramImage::from_words(&[7, 8]).expect("fits");
        assert_eq!(image.words().len(), PROGRAM_WORDS);
        assert_eq!(image.word_at(0), Some(InstructionWord::new(7)));
        assert_eq!(image.word_at(1), Some(InstructionWord::new(8)));
        assert_eq!(image.word_at(255), Some(InstructionWord::new(0)));
        assert_eq!(image.word_at(256), None);
    }

    #[test]
    fn oversized_images_are_rejected() {
        let words = vec![0u64; PROGRAM_WORDS + 4];
        assert_eq!(
            ProgramImage::from_words(&words),
            Err(ImageError::ProgramTooLarge {
                len: PROGRAM_WORDS + 4,
                capacity: PROGRAM_WORDS
            })
        );
    }

    #[test]
    fn instruction_images_are_encoded_in_order() {
        let program = [
            DecodedInstruction::new(Opcode::Scan).with_write_select(1),
            DecodedInstruction::new(Opcode::Output).with_read_a(1),
        ];
        let image = ProgramImage::from_instructions(&program).expect("fits");
        assert_eq!(image.word_at(0), Some(program[0].encode()));
        assert_eq!(image.word_at(1), Some(program[1].encode()));
    }
}
