use derive_more::Display;
use static_assertions::const_assert;
use std::convert::TryInto;
use strum_macros::EnumIter;

pub type Byte = u8;
pub type Word = u32;
pub type OpCode = u32;

pub const WORD_WIDTH: u32 = 31;
pub const OPCODE_WIDTH: u32 = 7;
pub const WORD_MAX: Word = (1 << WORD_WIDTH) - 1;
pub const OPCODE_MAX: OpCode = (1 << OPCODE_WIDTH) - 1;

pub const BYTES_PER_WORD: usize = 4;

const_assert!(WORD_WIDTH <= Word::BITS);
const_assert!(OPCODE_WIDTH < WORD_WIDTH);

/*
    Instruction words are laid out with the opcode in the highest bits, followed by each
    parameter in declaration order, and zero-padding in the low bits:

        OOOOOOO PPPP PPPPPPPPPP ... 000000

    so e.g. `ADD R1, R2, R3` is `0100000 0001 0010 0011 000000000000`. The padding is part
    of the format; the hardware decodes fields from the top of the word down.

    The one exception is raw data (see `DAT`), which occupies the whole word verbatim.
*/

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ParamKind {
    #[display(fmt = "reg")]
    Register,
    #[display(fmt = "imm4")]
    Imm4,
    #[display(fmt = "imm8")]
    Imm8,
    #[display(fmt = "imm10")]
    Imm10,
    #[display(fmt = "addr")]
    Address,
}

impl ParamKind {
    pub const REGISTER_WIDTH: u32 = 4;
    pub const ADDRESS_WIDTH: u32 = 10;

    pub const fn width(self) -> u32 {
        match self {
            ParamKind::Register => ParamKind::REGISTER_WIDTH,
            ParamKind::Imm4 => 4,
            ParamKind::Imm8 => 8,
            ParamKind::Imm10 => 10,
            ParamKind::Address => ParamKind::ADDRESS_WIDTH,
        }
    }

    pub const fn max(self) -> Word {
        (1 << self.width()) - 1
    }
}

pub const fn mask(width: u32) -> Word {
    (1 << width) - 1
}

pub fn words_to_bytes(v: &[Word]) -> Vec<Byte> {
    v.iter().flat_map(|w| w.to_le_bytes().to_vec()).collect()
}

// Returns none if the data is not a whole number of words.
pub fn bytes_to_words(bytes: &[Byte]) -> Option<Vec<Word>> {
    if bytes.len() % BYTES_PER_WORD != 0 {
        return None;
    }

    bytes
        .chunks(BYTES_PER_WORD)
        .map(|ch| ch.try_into().ok().map(Word::from_le_bytes))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kind_ranges_follow_widths() {
        assert_eq!(ParamKind::Register.max(), 15);
        assert_eq!(ParamKind::Imm4.max(), 15);
        assert_eq!(ParamKind::Imm8.max(), 255);
        assert_eq!(ParamKind::Imm10.max(), 1023);
        assert_eq!(ParamKind::Address.max(), 1023);
        assert!(ParamKind::iter().all(|k| k.width() < WORD_WIDTH - OPCODE_WIDTH));
    }

    #[test]
    fn byte_conversion_is_little_endian() {
        let bytes = words_to_bytes(&[0x0102_0304, WORD_MAX]);
        assert_eq!(bytes, vec![4, 3, 2, 1, 0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(bytes_to_words(&bytes), Some(vec![0x0102_0304, WORD_MAX]));
        assert_eq!(bytes_to_words(&bytes[..5]), None);
    }
}
