use crate::assembler::Diagnostic;
use ansi_term::{Colour::Red, Style};
use derive_more::Constructor;
use std::fmt::Display;

/// Renders a `Diagnostic` against the source it refers to, with a line of context
/// either side of the offending line.
#[derive(Debug, Constructor)]
pub struct Report<'a> {
    diag: &'a Diagnostic,
    source: &'a str,
}

impl<'a> Report<'a> {
    fn source_line(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        lines: &[&str],
        idx: usize,
        highlight: Option<&str>,
    ) -> std::fmt::Result {
        let text = match lines.get(idx) {
            Some(text) => text,
            None => return Ok(()),
        };

        write!(f, "  {:>4} | ", idx + 1)?;
        // Mnemonics are reported in canonical case, so match regardless of it. ASCII
        // lowercasing keeps byte offsets intact.
        let found = highlight.and_then(|tk| {
            text.to_ascii_lowercase()
                .find(&tk.to_ascii_lowercase())
                .map(|at| (at, tk.len()))
        });
        match found {
            Some((at, len)) => writeln!(
                f,
                "{}{}{}",
                &text[..at],
                Style::new().bold().underline().paint(&text[at..at + len]),
                &text[at + len..]
            ),
            None => writeln!(f, "{}", text),
        }
    }
}

impl<'a> Display for Report<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<&str> = self.source.lines().collect();
        let line = self.diag.line;

        writeln!(
            f,
            "{}",
            Red.bold().paint(format!("Error on line {}", line + 1))
        )?;
        if let Some(prev) = line.checked_sub(1) {
            self.source_line(f, &lines, prev, None)?;
        }
        self.source_line(f, &lines, line, self.diag.token.as_deref())?;
        self.source_line(f, &lines, line + 1, None)?;

        if let Some(related) = self.diag.related_line {
            writeln!(f, "  first defined on line {}:", related + 1)?;
            self.source_line(f, &lines, related, self.diag.token.as_deref())?;
        }

        writeln!(f, "{}", Red.paint(self.diag.message.as_str()))
    }
}
