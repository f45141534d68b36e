use super::types::Category;
use crate::assembler::{context::MacroRegistry, lang::Lang};
use log::trace;
use std::fmt::Display;

pub const MACRO_CHAR: char = '#';
pub const PLACEHOLDER_CHAR: char = '$';
const ARGS_OPEN: char = '(';
const ARGS_CLOSE: char = ')';
const ARG_SEPARATOR: char = ',';

/// Maximum number of nested expansions (argument lists and user macro bodies) along
/// one chain before we give up.
pub const MAX_DEPTH: usize = 64;

/// Maximum length in bytes of any single expansion. Nesting alone does not bound this,
/// since each `#define` can double the length of the one before.
pub const MAX_EXPANSION_LEN: usize = 64 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UnknownMacro(String),
    MalformedCall(String, &'static str),
    ArgCount {
        name: String,
        expected: &'static str,
        found: usize,
    },
    MissingArgument {
        name: String,
        index: usize,
        supplied: usize,
    },
    BadArgument {
        name: String,
        arg: String,
        reason: String,
    },
    TooDeep(String),
    TooLong(String),
    Recursive(String),
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::UnknownMacro(_) => Category::UnknownMacro,
            Error::MalformedCall(..) => Category::SyntaxError,
            Error::ArgCount { .. } | Error::MissingArgument { .. } => Category::ArityMismatch,
            Error::BadArgument { .. } => Category::MacroArgumentError,
            Error::TooDeep(_) | Error::TooLong(_) | Error::Recursive(_) => {
                Category::MacroRecursion
            }
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Error::UnknownMacro(name)
            | Error::TooDeep(name)
            | Error::TooLong(name)
            | Error::Recursive(name) => Some(name),
            Error::MalformedCall(raw, _) => Some(raw),
            Error::ArgCount { name, .. } | Error::MissingArgument { name, .. } => Some(name),
            Error::BadArgument { arg, .. } => Some(arg),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownMacro(name) => write!(f, "Macro '{}' unknown", name),
            Error::MalformedCall(raw, msg) => write!(f, "Malformed macro call '{}': {}", raw, msg),
            Error::ArgCount {
                name,
                expected,
                found,
            } => write!(
                f,
                "Macro '{}' expects {} params, but got {}",
                name, expected, found
            ),
            Error::MissingArgument {
                name,
                index,
                supplied,
            } => write!(
                f,
                "Macro '{}' refers to parameter {}{}, but got {} params",
                name, PLACEHOLDER_CHAR, index, supplied
            ),
            Error::BadArgument { name, arg, reason } => {
                write!(f, "Macro '{}' argument '{}' {}", name, arg, reason)
            }
            Error::TooDeep(name) => write!(
                f,
                "Macro '{}' nests deeper than {} expansions",
                name, MAX_DEPTH
            ),
            Error::TooLong(name) => write!(
                f,
                "Macro '{}' expands to more than {} bytes",
                name, MAX_EXPANSION_LEN
            ),
            Error::Recursive(name) => write!(f, "Macro '{}' expands to itself", name),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits an (already expanded) argument list at its commas. Arguments are trimmed,
/// and arguments which are then empty are dropped altogether.
pub fn split_args(raw: &str) -> Vec<String> {
    raw.split(ARG_SEPARATOR)
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Given `raw` starting with an opening parenthesis, returns the byte index of the
/// parenthesis which closes it.
fn matching_paren(raw: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in raw.char_indices() {
        match c {
            ARGS_OPEN => depth += 1,
            ARGS_CLOSE => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => (),
        }
    }
    None
}

/// Replaces each `$k` in `template` by the `k`th (1-based) argument.
pub fn substitute(name: &str, template: &str, args: &[String]) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(idx) = rest.find(PLACEHOLDER_CHAR) {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + PLACEHOLDER_CHAR.len_utf8()..];
        let digits = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or_else(|| after.len());

        if digits == 0 {
            out.push(PLACEHOLDER_CHAR);
        } else {
            let index = after[..digits].parse::<usize>().unwrap_or(usize::MAX);
            match index.checked_sub(1).and_then(|i| args.get(i)) {
                Some(arg) => {
                    out.push_str(arg);
                    if out.len() > MAX_EXPANSION_LEN {
                        return Err(Error::TooLong(name.to_owned()));
                    }
                }
                None => {
                    return Err(Error::MissingArgument {
                        name: name.to_owned(),
                        index,
                        supplied: args.len(),
                    })
                }
            }
        }

        rest = &after[digits..];
    }
    out.push_str(rest);

    Ok(out)
}

struct Expander<'a> {
    macros: &'a mut MacroRegistry,
    depth: usize,
    // User macros whose bodies are currently being expanded, innermost last.
    active: Vec<String>,
}

impl<'a> Expander<'a> {
    fn descend<T, F>(&mut self, name: &str, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(Error::TooDeep(name.to_owned()));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expand(&mut self, text: &str) -> Result<String, Error> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(idx) = rest.find(MACRO_CHAR) {
            out.push_str(&rest[..idx]);
            let call = &rest[idx..];
            let after = &call[MACRO_CHAR.len_utf8()..];

            let name_len = after
                .find(|c: char| !is_name_char(c))
                .unwrap_or_else(|| after.len());
            if name_len == 0 {
                return Err(Error::MalformedCall(
                    call.to_owned(),
                    "expected a macro name",
                ));
            }
            let name = &after[..name_len];
            let mut tail = &after[name_len..];

            let args = if tail.starts_with(ARGS_OPEN) {
                let close = matching_paren(tail).ok_or_else(|| {
                    Error::MalformedCall(call.to_owned(), "unterminated argument list")
                })?;
                let inner = &tail[ARGS_OPEN.len_utf8()..close];
                tail = &tail[close + ARGS_CLOSE.len_utf8()..];

                split_args(&self.descend(name, |ex| ex.expand(inner))?)
            } else {
                vec![]
            };

            let replacement = self.invoke(name, &args)?;
            trace!("#{}({}) => '{}'", name, args.join(", "), replacement);
            out.push_str(&replacement);
            if out.len() > MAX_EXPANSION_LEN {
                return Err(Error::TooLong(name.to_owned()));
            }

            rest = tail;
        }
        out.push_str(rest);

        Ok(out)
    }

    fn invoke(&mut self, name: &str, args: &[String]) -> Result<String, Error> {
        if let Some(builtin) = Lang::get().lookup_builtin(name) {
            let text = (builtin.rule)(self.macros, args)?;
            return self.descend(name, |ex| ex.expand(&text));
        }

        let template = match self.macros.lookup(name) {
            Some(template) => template.to_owned(),
            None => return Err(Error::UnknownMacro(name.to_owned())),
        };

        if self.active.iter().any(|active| active == name) {
            return Err(Error::Recursive(name.to_owned()));
        }

        let body = substitute(name, &template, args)?;

        self.active.push(name.to_owned());
        let result = self.descend(name, |ex| ex.expand(&body));
        self.active.pop();
        result
    }
}

/// Expands every macro call in `text`, including calls produced by expanding other
/// macros, so that no macro syntax remains in the result.
pub fn expand(text: &str, macros: &mut MacroRegistry) -> Result<String, Error> {
    Expander {
        macros,
        depth: 0,
        active: Vec::new(),
    }
    .expand(text)
}
