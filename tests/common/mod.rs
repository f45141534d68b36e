#![allow(dead_code)]

use facpu::assembler::{self, Category};
use facpu::spec::types::{
    hw::{ParamKind, Word, OPCODE_WIDTH, WORD_WIDTH},
    schema::InstDef,
};

pub const FIB: &str = include_str!("../../asm/demo/fib.fas");
pub const COLOURS: &str = include_str!("../../asm/demo/colours.fas");

pub fn assemble_ok(source: &str) -> Vec<Word> {
    match assembler::assemble(source) {
        Ok(words) => words,
        Err(err) => panic!("unexpected failure: {}", err),
    }
}

pub fn category_of(source: &str) -> Category {
    match assembler::assemble(source) {
        Ok(words) => panic!("unexpected success: {:?}", words),
        Err(err) => err.category(),
    }
}

/// Splits `word` into its opcode and the fields `idef` declares, reading from the top
/// of the word down.
pub fn unpack(idef: &InstDef, word: Word) -> (Word, Vec<Word>) {
    let mut rest = word as u64;
    let mut consumed = OPCODE_WIDTH;
    let opcode = (rest >> (WORD_WIDTH - OPCODE_WIDTH)) as Word;

    let fields = idef
        .params
        .iter()
        .map(|kind| {
            consumed += kind.width();
            let field = (rest >> (WORD_WIDTH - consumed)) & ((1 << kind.width()) - 1);
            field as Word
        })
        .collect();

    rest &= (1 << (WORD_WIDTH - consumed)) - 1;
    assert_eq!(rest, 0, "padding of {} is not zero", idef.name);

    (opcode, fields)
}

pub fn token(kind: ParamKind, value: Word) -> String {
    match kind {
        ParamKind::Register => format!("R{}", value),
        _ => value.to_string(),
    }
}

pub fn source_line(idef: &InstDef, values: &[Word]) -> String {
    let params: Vec<String> = idef
        .params
        .iter()
        .zip(values.iter())
        .map(|(kind, value)| token(*kind, *value))
        .collect();
    format!("{} {}", idef.name, params.join(", "))
}
