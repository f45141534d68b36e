use super::hw::{OpCode, ParamKind, OPCODE_WIDTH, WORD_WIDTH};
use derive_more::Constructor;
use itertools::Itertools;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct InstDef {
    pub name: String,
    pub opcode: OpCode,
    pub params: Vec<ParamKind>,
}

impl InstDef {
    pub fn with(name: &str, opcode: OpCode, params: Vec<ParamKind>) -> Self {
        InstDef::new(name.to_uppercase(), opcode, params)
    }

    pub fn with_0(name: &str, opcode: OpCode) -> Self {
        InstDef::with(name, opcode, vec![])
    }

    pub fn with_1(name: &str, opcode: OpCode, p1: ParamKind) -> Self {
        InstDef::with(name, opcode, vec![p1])
    }

    pub fn with_2(name: &str, opcode: OpCode, p1: ParamKind, p2: ParamKind) -> Self {
        InstDef::with(name, opcode, vec![p1, p2])
    }

    pub fn with_3(
        name: &str,
        opcode: OpCode,
        p1: ParamKind,
        p2: ParamKind,
        p3: ParamKind,
    ) -> Self {
        InstDef::with(name, opcode, vec![p1, p2, p3])
    }

    /// Number of bits occupied by the opcode and all of the parameters, i.e.
    /// everything except the low-order padding.
    pub fn encoded_width(&self) -> u32 {
        OPCODE_WIDTH + self.params.iter().map(|p| p.width()).sum::<u32>()
    }

    pub fn padding(&self) -> u32 {
        WORD_WIDTH - self.encoded_width()
    }

    pub fn signature(&self) -> String {
        self.params.iter().join(", ")
    }
}

impl Display for InstDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#04X})", self.name, self.opcode)?;
        if !self.params.is_empty() {
            write!(f, ": {}", self.signature())?;
        }
        Ok(())
    }
}
