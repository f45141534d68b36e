use super::types::{Category, Located};
use crate::assembler::{
    context::LabelTable,
    lang::Lang,
    model::{register_digits, Encoding, ProcessedLine},
};
use crate::spec::types::{
    hw::{ParamKind, Word, OPCODE_WIDTH, WORD_WIDTH},
    schema::InstDef,
};
use log::trace;
use std::fmt::Display;

/// What a token was being parsed as when it was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Param(ParamKind),
    Data,
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Param(ParamKind::Register) => write!(f, "Register"),
            Operand::Param(ParamKind::Address) => write!(f, "Address"),
            Operand::Param(kind) => write!(f, "Immediate ({})", kind),
            Operand::Data => write!(f, "Data word"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UnknownMnemonic(String),
    ArgCount {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    Malformed {
        token: String,
        operand: Operand,
    },
    OutOfRange {
        token: String,
        operand: Operand,
        max: Word,
    },
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::UnknownMnemonic(_) => Category::UnknownMnemonic,
            Error::ArgCount { .. } => Category::ArityMismatch,
            Error::Malformed { .. } => Category::SyntaxError,
            Error::OutOfRange { .. } => Category::RangeError,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Error::UnknownMnemonic(mnemonic) | Error::ArgCount { mnemonic, .. } => Some(mnemonic),
            Error::Malformed { token, .. } | Error::OutOfRange { token, .. } => Some(token),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownMnemonic(mnemonic) => write!(f, "Instruction '{}' unknown", mnemonic),
            Error::ArgCount {
                mnemonic,
                expected,
                found,
            } => write!(
                f,
                "Instruction '{}' expects {} params, but got {}",
                mnemonic, expected, found
            ),
            Error::Malformed {
                token,
                operand: operand @ Operand::Param(ParamKind::Address),
            } => write!(
                f,
                "{} '{}' is neither a label nor a number",
                operand, token
            ),
            Error::Malformed { token, operand } => {
                write!(f, "{} '{}' has invalid syntax", operand, token)
            }
            Error::OutOfRange {
                token,
                operand,
                max,
            } => write!(f, "{} '{}' out of range (max {})", operand, token, max),
        }
    }
}

/// Parses an integer literal: decimal, or `0x`/`0o`/`0b` prefixed (either case),
/// optionally signed. As with Python's `int(x, 0)`, a decimal literal may not have
/// leading zeros unless it is all zeros. Returns `None` if `raw` is not a literal.
pub fn parse_int(raw: &str) -> Option<i128> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = match lower.get(..2) {
        Some("0x") => (16, &lower[2..]),
        Some("0o") => (8, &lower[2..]),
        Some("0b") => (2, &lower[2..]),
        _ => (10, lower.as_str()),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    if radix == 10 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
        return None;
    }

    // The digits are valid, so this only fails on overflow. Saturating keeps such
    // literals out of range rather than malformed.
    let value = i128::from_str_radix(digits, radix).unwrap_or(i128::MAX);
    Some(if negative { -value } else { value })
}

pub fn check_range(token: &str, value: i128, operand: Operand, max: Word) -> Result<Word, Error> {
    if value < 0 || value > i128::from(max) {
        return Err(Error::OutOfRange {
            token: token.to_owned(),
            operand,
            max,
        });
    }

    // In range, so this is lossless.
    Ok(value as Word)
}

fn parse_register(token: &str) -> Result<Word, Error> {
    let operand = Operand::Param(ParamKind::Register);
    let digits = register_digits(token).ok_or_else(|| Error::Malformed {
        token: token.to_owned(),
        operand,
    })?;

    // Only fails if the number is absurdly large.
    let value = digits.parse::<i128>().unwrap_or(i128::MAX);
    check_range(token, value, operand, ParamKind::Register.max())
}

fn parse_param(kind: ParamKind, token: &str, labels: &LabelTable) -> Result<Word, Error> {
    let operand = Operand::Param(kind);

    if kind == ParamKind::Register {
        return parse_register(token);
    }

    let value = match labels.address(token) {
        Some(address) if kind == ParamKind::Address => address as i128,
        _ => parse_int(token).ok_or_else(|| Error::Malformed {
            token: token.to_owned(),
            operand,
        })?,
    };

    check_range(token, value, operand, kind.max())
}

/// Packs the opcode and then each parameter, most significant first, and left aligns
/// the result in the word.
pub fn pack(idef: &InstDef, params: &[&str], labels: &LabelTable) -> Result<Word, Error> {
    let mut word = idef.opcode;
    let mut width = OPCODE_WIDTH;

    for (kind, token) in idef.params.iter().zip(params.iter()) {
        let value = parse_param(*kind, token, labels)?;
        word = (word << kind.width()) | value;
        width += kind.width();
    }

    Ok(word << (WORD_WIDTH - width))
}

pub fn encode_line(line: &ProcessedLine, labels: &LabelTable) -> Result<Word, Error> {
    let encoding = Lang::get()
        .lookup_encoding(&line.mnemonic)
        .ok_or_else(|| Error::UnknownMnemonic(line.mnemonic.clone()))?;

    let params = line.params();
    if encoding.arity() != params.len() {
        return Err(Error::ArgCount {
            mnemonic: encoding.name().to_owned(),
            expected: encoding.arity(),
            found: params.len(),
        });
    }

    let word = match encoding {
        Encoding::Inst(idef) => pack(idef, &params, labels)?,
        Encoding::Pseudo(pseudo) => (pseudo.rule)(&params)?,
    };

    trace!("{} => {:#010X}", line, word);
    Ok(word)
}

pub fn encode(lines: &[ProcessedLine], labels: &LabelTable) -> Result<Vec<Word>, Located<Error>> {
    lines
        .iter()
        .map(|line| encode_line(line, labels).map_err(|err| Located::at_line(line.line, err)))
        .collect()
}
