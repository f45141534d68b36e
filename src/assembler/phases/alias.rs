use super::types::Category;
use crate::assembler::{
    lang::Lang,
    model::{sanitize_name, Shape},
};
use crate::spec::types::schema::InstDef;
use itertools::Itertools;
use log::trace;
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    NoMatchingVariant {
        family: String,
        shapes: Vec<Shape>,
        candidates: Vec<InstDef>,
    },
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::NoMatchingVariant { .. } => Category::AliasResolutionFailure,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Error::NoMatchingVariant { family, .. } => Some(family),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoMatchingVariant {
                family,
                shapes,
                candidates,
            } => {
                write!(
                    f,
                    "Instruction '{}' with params ({}) matches none of:",
                    family,
                    shapes.iter().join(", ")
                )?;
                for idef in candidates {
                    write!(f, "\n    {} {}", idef.name, idef.signature())?;
                }
                Ok(())
            }
        }
    }
}

/// Returns the concrete mnemonic `mnemonic` stands for given `params`. Other known
/// mnemonics are returned sanitized, and unknown ones exactly as written (so that the
/// encoder reports them as the user spelled them).
pub fn resolve(mnemonic: &str, params: &[&str]) -> Result<String, Error> {
    let lang = Lang::get();
    let name = sanitize_name(mnemonic);

    let family = match lang.lookup_family(&name) {
        Some(family) => family,
        None if lang.lookup_encoding(&name).is_some() => return Ok(name),
        None => return Ok(mnemonic.to_owned()),
    };

    let shapes: Vec<Shape> = params.iter().map(|tk| Shape::of(tk)).collect();
    match lang
        .family_variants(family)
        .find(|idef| idef.accepts_shapes(&shapes))
    {
        Some(idef) => {
            trace!("{} ({}) => {}", name, shapes.iter().join(", "), idef.name);
            Ok(idef.name.clone())
        }
        None => Err(Error::NoMatchingVariant {
            family: mnemonic.to_owned(),
            shapes,
            candidates: lang.family_variants(family).cloned().collect(),
        }),
    }
}
