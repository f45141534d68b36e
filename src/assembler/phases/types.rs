use super::{encode, preprocess};
use derive_more::Constructor;
use std::fmt::Display;
use strum_macros::Display as StrumDisplay;

/*
    Phases:

        1.  Preprocessing: Each source line has its comment stripped and its label definitions
            removed (and bound to the current address). The remainder is macro-expanded, split
            into a mnemonic and parameter tokens, and if the mnemonic names a `Family` the
            line is rewritten to name the concrete instruction selected for the token shapes.
            Lines which end up empty are dropped; every other line becomes a `ProcessedLine`
            and advances the address counter by one.

        2.  Encoding: Only once every line has been preprocessed (and so every label is known)
            is each `ProcessedLine` packed into a `Word`, resolving labels as it goes.

    Either phase aborts the whole run on its first error; there is no partial output.
*/

/// A zero-based source line index.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Constructor)]
pub struct Loc {
    line: usize,
}

impl Loc {
    pub fn line(self) -> usize {
        self.line
    }
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(line: {})", self.line + 1)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Located<T: Sized> {
    loc: Option<Loc>,
    val: T,
}

impl<T: Display> Display for Located<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.loc {
            None => write!(f, "@<unknown location>: {}", self.val),
            Some(loc) => write!(f, "@{}: {}", loc, self.val),
        }
    }
}

impl<T> Located<T> {
    fn new(loc: Option<Loc>, val: T) -> Self {
        Located { loc, val }
    }

    pub fn with_loc(loc: Loc, val: T) -> Self {
        Located::new(Some(loc), val)
    }

    pub fn at_line(line: usize, val: T) -> Self {
        Located::with_loc(Loc::new(line), val)
    }

    pub fn loc(&self) -> Option<Loc> {
        self.loc
    }

    pub fn inner(&self) -> &T {
        &self.val
    }
}

/// The kinds of failure an assembly run can end in, independent of which phase
/// noticed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Category {
    UnknownMnemonic,
    UnknownMacro,
    DuplicateLabel,
    ArityMismatch,
    SyntaxError,
    RangeError,
    AliasResolutionFailure,
    MacroArgumentError,
    MacroRecursion,
}

/// Everything a presentation layer needs to report an error against the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
    pub token: Option<String>,
    pub related_line: Option<usize>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Preprocess(Located<preprocess::Error>),
    Encode(Located<encode::Error>),
}

impl From<Located<preprocess::Error>> for Error {
    fn from(err: Located<preprocess::Error>) -> Self {
        Error::Preprocess(err)
    }
}

impl From<Located<encode::Error>> for Error {
    fn from(err: Located<encode::Error>) -> Self {
        Error::Encode(err)
    }
}

impl Error {
    pub fn loc(&self) -> Option<Loc> {
        match self {
            Error::Preprocess(err) => err.loc(),
            Error::Encode(err) => err.loc(),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Error::Preprocess(err) => err.inner().category(),
            Error::Encode(err) => err.inner().category(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::Preprocess(err) => err.inner().to_string(),
            Error::Encode(err) => err.inner().to_string(),
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        let (token, related_line) = match self {
            Error::Preprocess(err) => (err.inner().token(), err.inner().related_line()),
            Error::Encode(err) => (err.inner().token(), None),
        };

        Diagnostic {
            line: self.loc().map_or(0, Loc::line),
            message: self.message(),
            token: token.map(ToOwned::to_owned),
            related_line,
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Assembly Error (in ")?;
        match self {
            Error::Preprocess(_) => write!(f, "Preprocessor"),
            Error::Encode(_) => write!(f, "Encoder"),
        }?;
        write!(f, "): ")?;
        match self {
            Error::Preprocess(err) => write!(f, "{}", err),
            Error::Encode(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_display_one_based() {
        assert_eq!(Located::at_line(4, "x").to_string(), "@(line: 5): x");
    }

    #[test]
    fn diagnostics_follow_the_phase_error() {
        let err = Error::from(Located::at_line(
            3,
            preprocess::Error::DuplicateLabel {
                label: "L".to_owned(),
                first_line: 1,
            },
        ));
        assert_eq!(err.category(), Category::DuplicateLabel);
        assert_eq!(
            err.diagnostic(),
            Diagnostic {
                line: 3,
                message: "Label 'L' already defined on line 2".to_owned(),
                token: Some("L".to_owned()),
                related_line: Some(1),
            }
        );

        let err = Error::from(Located::at_line(
            0,
            encode::Error::UnknownMnemonic("FROB".to_owned()),
        ));
        assert_eq!(err.diagnostic().related_line, None);
        assert_eq!(err.diagnostic().token.as_deref(), Some("FROB"));
    }
}
