use crate::assembler::context::MacroRegistry;
use crate::spec::types::{
    hw::{ParamKind, Word},
    schema::InstDef,
};
use derive_more::Constructor;
use itertools::Itertools;
use std::fmt::Display;
use strum::IntoEnumIterator;

/*
    The architecture of the assembly language representation:

        There are three kinds of mnemonic the assembler understands:

            1.  `InstDef`s: These are the concrete hardware instructions declared in
                `crate::spec::defs::inst`. Each has an opcode and an ordered list of `ParamKind`s,
                which fully determines how it is packed into a word.

            2.  `Family`s: A generic mnemonic naming an ordered list of `InstDef`s, e.g. `ADD`
                is `ADD` (three registers) or `ADDI` (two registers and an immediate). During
                preprocessing the first variant whose parameter kinds are compatible with the
                `Shape` of the passed tokens is selected, and the line is rewritten to name it.

            3.  `Pseudo`s: Mnemonics which emit a word without following the opcode/parameter
                layout at all (currently just `DAT`, a raw data word). Their arity is part of
                their definition.

        Separately, `Builtin`s are the macros which exist before any `#define` (`define`
        itself, and `col`). They are looked up before user macros, so cannot be shadowed.

        A token's `Shape` is all we can know about it before a concrete instruction has
        been picked: register tokens (the register sigil, in either case, followed by
        digits) can only ever fill a register slot, while anything else (numbers, labels,
        macro results) could fill any of the non-register slots. The concrete kind is only decided by the encoder.
*/

pub const REGISTER_SIGIL: char = 'R';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Register,
    Value,
}

/// The register number of a register token such as `R12` or `r3`, as written. Labels
/// which merely start with the sigil (`retry`, `RESET`) are not registers.
pub fn register_digits(token: &str) -> Option<&str> {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&REGISTER_SIGIL) => (),
        _ => return None,
    }

    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits)
}

impl Shape {
    pub fn of(token: &str) -> Self {
        match register_digits(token.trim()) {
            Some(_) => Shape::Register,
            None => Shape::Value,
        }
    }

    pub fn accepts(self, kind: ParamKind) -> bool {
        match self {
            Shape::Register => kind == ParamKind::Register,
            Shape::Value => kind != ParamKind::Register,
        }
    }

    pub fn compatible_kinds(self) -> impl Iterator<Item = ParamKind> {
        ParamKind::iter().filter(move |kind| self.accepts(*kind))
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.compatible_kinds().join("|"))
    }
}

pub fn sanitize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

#[derive(Debug)]
pub struct Family {
    pub name: String,
    pub variants: Vec<String>,
}

impl Family {
    pub fn new(name: String, variants: Vec<String>) -> Self {
        Self {
            name: sanitize_name(&name),
            variants: variants.iter().map(|s| sanitize_name(s)).collect(),
        }
    }

    pub fn with(name: &str, variants: Vec<&str>) -> Self {
        Self::new(
            name.to_owned(),
            variants.into_iter().map(ToOwned::to_owned).collect(),
        )
    }
}

impl InstDef {
    /// Whether the passed tokens could be encoded by this instruction, judging only
    /// by their `Shape`s.
    pub fn accepts_shapes(&self, shapes: &[Shape]) -> bool {
        self.params.len() == shapes.len()
            && self
                .params
                .iter()
                .zip(shapes.iter())
                .all(|(kind, shape)| shape.accepts(*kind))
    }
}

pub type PseudoRule = fn(&[&str]) -> Result<Word, crate::assembler::phases::encode::Error>;

#[derive(Constructor)]
pub struct Pseudo {
    pub name: String,
    pub arity: usize,
    pub rule: PseudoRule,
}

impl std::fmt::Debug for Pseudo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pseudo")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl Pseudo {
    pub fn with(name: &str, arity: usize, rule: PseudoRule) -> Self {
        Pseudo::new(sanitize_name(name), arity, rule)
    }
}

/// Builtin macros may touch the registry (e.g. `#define`), and produce replacement text.
pub type BuiltinRule = fn(
    &mut MacroRegistry,
    &[String],
) -> Result<String, crate::assembler::phases::expand::Error>;

#[derive(Constructor)]
pub struct Builtin {
    pub name: String,
    pub rule: BuiltinRule,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl Builtin {
    pub fn with(name: &str, rule: BuiltinRule) -> Self {
        Builtin::new(name.to_owned(), rule)
    }
}

/// What the encoder can do with a (canonical) mnemonic.
#[derive(Debug, Clone, Copy)]
pub enum Encoding<'a> {
    Inst(&'a InstDef),
    Pseudo(&'a Pseudo),
}

impl<'a> Encoding<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Encoding::Inst(idef) => &idef.name,
            Encoding::Pseudo(pseudo) => &pseudo.name,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Encoding::Inst(idef) => idef.params.len(),
            Encoding::Pseudo(pseudo) => pseudo.arity,
        }
    }
}

/// A source line which will emit exactly one word, after all labels, comments and
/// macros have been stripped and any alias resolved.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct ProcessedLine {
    pub line: usize,
    pub mnemonic: String,
    pub params: Vec<String>,
}

impl ProcessedLine {
    pub fn params(&self) -> Vec<&str> {
        self.params.iter().map(String::as_str).collect()
    }
}

impl Display for ProcessedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        if !self.params.is_empty() {
            write!(f, " {}", self.params.join(", "))?;
        }
        Ok(())
    }
}
