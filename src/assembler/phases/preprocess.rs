use super::{
    alias, expand, lex,
    types::{Category, Located},
};
use crate::assembler::{
    context::{Context, Label},
    model::ProcessedLine,
};
use log::{debug, trace};
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    DuplicateLabel { label: String, first_line: usize },
    Macro(expand::Error),
    Alias(alias::Error),
}

impl From<expand::Error> for Error {
    fn from(err: expand::Error) -> Self {
        Error::Macro(err)
    }
}

impl From<alias::Error> for Error {
    fn from(err: alias::Error) -> Self {
        Error::Alias(err)
    }
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::DuplicateLabel { .. } => Category::DuplicateLabel,
            Error::Macro(err) => err.category(),
            Error::Alias(err) => err.category(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Error::DuplicateLabel { label, .. } => Some(label),
            Error::Macro(err) => err.token(),
            Error::Alias(err) => err.token(),
        }
    }

    /// Another source line (zero-based) involved in the error, if there is one.
    pub fn related_line(&self) -> Option<usize> {
        match self {
            Error::DuplicateLabel { first_line, .. } => Some(*first_line),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateLabel { label, first_line } => write!(
                f,
                "Label '{}' already defined on line {}",
                label,
                first_line + 1
            ),
            Error::Macro(err) => write!(f, "{}", err),
            Error::Alias(err) => write!(f, "{}", err),
        }
    }
}

fn preprocess_line(
    line: usize,
    raw: &str,
    address: usize,
    ctx: &mut Context,
) -> Result<Option<ProcessedLine>, Error> {
    let code = lex::strip_comment(raw).trim();
    if code.is_empty() {
        return Ok(None);
    }

    let (labels, rest) = lex::extract_labels(code);
    for label in labels {
        ctx.labels
            .define(label, Label::new(address, line))
            .map_err(|first| Error::DuplicateLabel {
                label: label.to_owned(),
                first_line: first.line,
            })?;
    }

    let expanded = expand::expand(&rest, &mut ctx.macros)?;
    let (mnemonic, params) = match lex::split_line(&expanded) {
        Some(split) => split,
        None => return Ok(None),
    };

    let mnemonic = alias::resolve(mnemonic, &params)?;
    Ok(Some(ProcessedLine::new(
        line,
        mnemonic,
        params.into_iter().map(ToOwned::to_owned).collect(),
    )))
}

/// Runs every source line through comment, label, macro and alias handling, binding
/// labels in `ctx` as it goes. Only lines which will emit a word are returned.
pub fn preprocess(source: &str, ctx: &mut Context) -> Result<Vec<ProcessedLine>, Located<Error>> {
    let mut lines = Vec::new();

    for (line, raw) in source.lines().enumerate() {
        let processed = preprocess_line(line, raw, lines.len(), ctx)
            .map_err(|err| Located::at_line(line, err))?;

        match processed {
            Some(processed) => {
                trace!("{:>4}: {}", lines.len(), processed);
                lines.push(processed);
            }
            None => trace!("line {} emits nothing", line + 1),
        }
    }

    debug!(
        "preprocessed {} lines, {} labels",
        lines.len(),
        ctx.labels.len()
    );
    Ok(lines)
}
