use crate::assembler::model::REGISTER_SIGIL;
use crate::spec::{
    isa::Isa,
    types::{
        hw::{mask, ParamKind, Word, OPCODE_WIDTH, WORD_MAX, WORD_WIDTH},
        schema::InstDef,
    },
};
use itertools::Itertools;
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    TooWide(Word),
    InvalidOpcode(Word),
    NonZeroPadding(Word),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TooWide(raw) => write!(f, "Word {:#010X} is wider than {} bits", raw, WORD_WIDTH),
            Error::InvalidOpcode(raw) => write!(f, "Invalid Opcode: {:#06X}", raw),
            Error::NonZeroPadding(raw) => write!(f, "Word {:#010X} has nonzero padding", raw),
        }
    }
}

/// A word decoded back into an instruction and its operand values.
#[derive(Debug, PartialEq, Eq)]
pub struct Decoded {
    pub idef: &'static InstDef,
    pub operands: Vec<Word>,
}

impl Display for Decoded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.idef.name)?;
        if self.operands.is_empty() {
            return Ok(());
        }

        let operands = self
            .idef
            .params
            .iter()
            .zip(self.operands.iter())
            .map(|(kind, value)| match kind {
                ParamKind::Register => format!("{}{}", REGISTER_SIGIL, value),
                _ => value.to_string(),
            })
            .join(", ");
        write!(f, " {}", operands)
    }
}

pub fn opcode_of(word: Word) -> Word {
    word >> (WORD_WIDTH - OPCODE_WIDTH)
}

pub fn disassemble_word(word: Word) -> Result<Decoded, Error> {
    if word > WORD_MAX {
        return Err(Error::TooWide(word));
    }

    let idef = Isa::get()
        .lookup_opcode(opcode_of(word))
        .ok_or(Error::InvalidOpcode(opcode_of(word)))?;

    if word & mask(idef.padding()) != 0 {
        return Err(Error::NonZeroPadding(word));
    }

    let mut shift = WORD_WIDTH - OPCODE_WIDTH;
    let operands = idef
        .params
        .iter()
        .map(|kind| {
            shift -= kind.width();
            (word >> shift) & mask(kind.width())
        })
        .collect();

    Ok(Decoded { idef, operands })
}

/// One line per word: address, raw word, and its decoding. Words which are not
/// valid instructions are shown as the data word which would produce them.
pub fn disassemble(words: &[Word]) -> Vec<String> {
    words
        .iter()
        .enumerate()
        .map(|(address, &word)| {
            let text = match disassemble_word(word) {
                Ok(decoded) => decoded.to_string(),
                Err(_) => format!("DAT {:#X}", word),
            };
            format!("{:04}: {:#010X}  {}", address, word, text)
        })
        .collect()
}
