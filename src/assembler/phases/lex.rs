pub const COMMENT_CHAR: char = ';';
pub const LABEL_CHAR: char = ':';
pub const PARAM_SEPARATOR: char = ',';

pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_CHAR) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Removes every label definition from `line`, returning the label names in order of
/// appearance along with what is left of the line.
///
/// A label definition is any run of non-whitespace ending in a `:`; if a chunk has
/// more than one `:`, everything up to the last one is the label name (so `a:b:`
/// defines `a:b`), and anything after it stays on the line.
pub fn extract_labels(line: &str) -> (Vec<&str>, String) {
    let mut labels = Vec::new();
    let mut rest = String::with_capacity(line.len());

    let mut last = 0;
    for (start, chunk) in chunks(line) {
        rest.push_str(&line[last..start]);
        last = start + chunk.len();

        match chunk.rfind(LABEL_CHAR) {
            Some(idx) if idx > 0 => {
                labels.push(&chunk[..idx]);
                rest.push_str(&chunk[idx + LABEL_CHAR.len_utf8()..]);
            }
            _ => rest.push_str(chunk),
        }
    }
    rest.push_str(&line[last..]);

    (labels, rest.trim().to_owned())
}

fn chunks(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut chars = line.char_indices().peekable();
    std::iter::from_fn(move || {
        while chars.peek().map_or(false, |(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let (start, _) = *chars.peek()?;
        let mut end = line.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() {
                end = idx;
                break;
            }
            chars.next();
        }

        Some((start, &line[start..end]))
    })
}

/// Splits an instruction line on runs of commas and whitespace into its mnemonic and
/// parameter tokens. Returns `None` for a line with no tokens at all.
pub fn split_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line
        .split(|c: char| c == PARAM_SEPARATOR || c.is_whitespace())
        .filter(|tk| !tk.is_empty());

    let mnemonic = tokens.next()?;
    Some((mnemonic, tokens.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(strip_comment("ADD R1, R2, R3 ; add"), "ADD R1, R2, R3 ");
        assert_eq!(strip_comment("; whole line"), "");
        assert_eq!(strip_comment("HLT;;"), "HLT");
        assert_eq!(strip_comment("NOP"), "NOP");
    }

    #[test]
    fn single_label() {
        let (labels, rest) = extract_labels("LOOP: ADD R1, R2, R3");
        assert_eq!(labels, vec!["LOOP"]);
        assert_eq!(rest, "ADD R1, R2, R3");
    }

    #[test]
    fn multiple_labels_anywhere() {
        let (labels, rest) = extract_labels("a: b:  JMP  c: a");
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(rest, "JMP   a");
    }

    #[test]
    fn label_only_line() {
        let (labels, rest) = extract_labels("  START:  ");
        assert_eq!(labels, vec!["START"]);
        assert!(rest.is_empty());
    }

    #[test]
    fn label_glued_to_instruction() {
        let (labels, rest) = extract_labels("LOOP:JMP LOOP");
        assert_eq!(labels, vec!["LOOP"]);
        assert_eq!(rest, "JMP LOOP");
    }

    #[test]
    fn label_name_runs_to_last_colon() {
        let (labels, rest) = extract_labels("a:b: NOP");
        assert_eq!(labels, vec!["a:b"]);
        assert_eq!(rest, "NOP");
    }

    #[test]
    fn bare_colon_is_not_a_label() {
        let (labels, rest) = extract_labels("NOP :");
        assert!(labels.is_empty());
        assert_eq!(rest, "NOP :");
    }

    #[test]
    fn no_labels() {
        let (labels, rest) = extract_labels("LI R0, #col(FF0000)");
        assert!(labels.is_empty());
        assert_eq!(rest, "LI R0, #col(FF0000)");
    }

    #[test]
    fn split_on_commas_and_whitespace() {
        assert_eq!(
            split_line("ADD R1,R2 ,  R3"),
            Some(("ADD", vec!["R1", "R2", "R3"]))
        );
        assert_eq!(split_line("ADD,R1,R2,R3"), Some(("ADD", vec!["R1", "R2", "R3"])));
        assert_eq!(split_line("HLT"), Some(("HLT", vec![])));
        assert_eq!(split_line("  \t "), None);
    }
}
