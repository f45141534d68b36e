pub mod context;
pub mod disasm;
pub mod lang;
pub mod model;
pub mod phases;

mod defs;

pub use phases::types::{Category, Diagnostic, Error};

use crate::spec::types::hw::{self, Byte, Word};
use context::{Context, LabelTable};
use log::info;
use model::ProcessedLine;

/// The complete result of an assembly run, including the intermediate canonical
/// lines and the label table (for listings).
#[derive(Debug)]
pub struct Program {
    pub lines: Vec<ProcessedLine>,
    pub labels: LabelTable,
    pub words: Vec<Word>,
}

pub fn assemble_program(source: &str) -> Result<Program, Error> {
    let mut ctx = Context::new();
    let lines = phases::preprocess(source, &mut ctx)?;

    let Context { labels, .. } = ctx;
    let words = phases::encode(&lines, &labels)?;

    info!("assembled {} words", words.len());
    Ok(Program {
        lines,
        labels,
        words,
    })
}

pub fn assemble(source: &str) -> Result<Vec<Word>, Error> {
    Ok(assemble_program(source)?.words)
}

pub fn assemble_bytes(source: &str) -> Result<Vec<Byte>, Error> {
    Ok(hw::words_to_bytes(&assemble(source)?))
}
