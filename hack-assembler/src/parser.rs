//! Line-oriented parser for Hack assembly source.
//!
//! One pass over each line strips a trailing comment, trims the remainder,
//! and classifies the instruction kind, so the driver never re-scans a
//! line more than once per pass.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// `@symbol` or `@123`.
    Address,
    /// `dest=comp;jump`, with `dest` and `jump` optional.
    Compute,
    /// `(symbol)` — a label, consumed in pass 1 and emitted nowhere.
    Label,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Address => "address",
            Self::Compute => "compute",
            Self::Label => "label",
        };
        write!(f, "{name}")
    }
}

/// A compute instruction's three mnemonic fields, already split on `=` and
/// `;`. A missing `dest` or `jump` is an empty string, matching how
/// [`crate::code::encode_c_instruction`] treats "no destination"/"no jump".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeFields<'a> {
    pub dest: &'a str,
    pub comp: &'a str,
    pub jump: &'a str,
}

#[derive(Debug)]
pub enum ParserError {
    /// `advance` hasn't been called yet, or the source is exhausted.
    NoCurrentLine,
    /// The accessor called doesn't apply to the current line's kind.
    WrongCommand {
        expected: &'static str,
        actual: CommandType,
    },
}

impl std::error::Error for ParserError {}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCurrentLine => write!(f, "no current line available"),
            Self::WrongCommand { expected, actual } => {
                write!(f, "expected a {expected} command, found a {actual} command")
            }
        }
    }
}

/// Walks a program's source lines, skipping blanks and comments, and
/// exposes each remaining instruction through borrowed slices of the
/// caller's own line buffer.
pub struct ParserLines<'a> {
    lines: std::slice::Iter<'a, String>,
    current: Option<(&'a str, CommandType)>,
    line_number: usize,
}

impl<'a> ParserLines<'a> {
    #[must_use]
    pub fn from_lines(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter(),
            current: None,
            line_number: 0,
        }
    }

    /// Advances to the next non-blank, non-comment instruction. Returns
    /// `false` once every line has been consumed.
    pub fn advance(&mut self) -> bool {
        for raw in self.lines.by_ref() {
            let trimmed = strip_comment(raw).trim();
            if trimmed.is_empty() {
                continue;
            }
            self.line_number += 1;
            self.current = Some((trimmed, classify(trimmed)));
            return true;
        }
        self.current = None;
        false
    }

    /// The 1-based count of instructions `advance` has returned so far —
    /// the source line a later encoding error should be blamed on.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn command_type(&self) -> Result<CommandType, ParserError> {
        self.current
            .map(|(_, kind)| kind)
            .ok_or(ParserError::NoCurrentLine)
    }

    /// The symbol named by an address or label instruction: the text
    /// between `@`/`(` and the end/`)`.
    pub fn symbol(&self) -> Result<&'a str, ParserError> {
        let (text, kind) = self.current.ok_or(ParserError::NoCurrentLine)?;
        match kind {
            CommandType::Address => Ok(&text[1..]),
            CommandType::Label => Ok(&text[1..text.len() - 1]),
            CommandType::Compute => Err(ParserError::WrongCommand {
                expected: "address or label",
                actual: kind,
            }),
        }
    }

    /// The dest/comp/jump mnemonics of a compute instruction.
    pub fn compute_fields(&self) -> Result<ComputeFields<'a>, ParserError> {
        let (text, kind) = self.current.ok_or(ParserError::NoCurrentLine)?;
        if kind != CommandType::Compute {
            return Err(ParserError::WrongCommand {
                expected: "compute",
                actual: kind,
            });
        }

        let (dest, rest) = text.split_once('=').map_or(("", text), |(d, r)| (d, r));
        let (comp, jump) = rest.split_once(';').unwrap_or((rest, ""));
        Ok(ComputeFields { dest, comp, jump })
    }
}

fn strip_comment(line: &str) -> &str {
    line.find("//").map_or(line, |idx| &line[..idx])
}

fn classify(line: &str) -> CommandType {
    match line.as_bytes()[0] {
        b'@' => CommandType::Address,
        b'(' => CommandType::Label,
        _ => CommandType::Compute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(line: &str) -> (CommandType, Vec<String>) {
        let lines = vec![line.to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        (parser.command_type().unwrap(), lines)
    }

    #[test]
    fn classifies_address_compute_and_label_lines() {
        assert_eq!(parse_one("@100").0, CommandType::Address);
        assert_eq!(parse_one("(LOOP)").0, CommandType::Label);
        assert_eq!(parse_one("D=M").0, CommandType::Compute);
    }

    #[test]
    fn strips_trailing_comments_before_classifying() {
        assert_eq!(strip_comment("@100 // jump target"), "@100 ");
        assert_eq!(strip_comment("D=M"), "D=M");
        assert_eq!(strip_comment("// whole line is a comment"), "");
    }

    #[test]
    fn address_symbol_drops_the_at_sign() {
        let lines = vec!["@counter".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        assert_eq!(parser.symbol().unwrap(), "counter");
    }

    #[test]
    fn label_symbol_drops_the_parens() {
        let lines = vec!["(LOOP)".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        assert_eq!(parser.symbol().unwrap(), "LOOP");
    }

    #[test]
    fn compute_fields_split_on_equals_and_semicolon() {
        let lines = vec!["MD=D+1;JGT".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        let fields = parser.compute_fields().unwrap();
        assert_eq!(fields.dest, "MD");
        assert_eq!(fields.comp, "D+1");
        assert_eq!(fields.jump, "JGT");
    }

    #[test]
    fn compute_fields_default_missing_dest_and_jump_to_empty() {
        let lines = vec!["D+1".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        let fields = parser.compute_fields().unwrap();
        assert_eq!(fields.dest, "");
        assert_eq!(fields.comp, "D+1");
        assert_eq!(fields.jump, "");
    }

    #[test]
    fn symbol_rejects_compute_instructions() {
        let lines = vec!["D=M".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        assert!(parser.symbol().is_err());
    }

    #[test]
    fn line_number_counts_only_real_instructions() {
        let lines = vec![
            "// header".to_string(),
            String::new(),
            "@1".to_string(),
            "D=A".to_string(),
        ];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        assert_eq!(parser.line_number(), 1);
        parser.advance();
        assert_eq!(parser.line_number(), 2);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let lines = vec!["   @100   ".to_string(), "  D=M  // note  ".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        assert!(parser.advance());
        assert_eq!(parser.symbol().unwrap(), "100");
        assert!(parser.advance());
        assert_eq!(parser.compute_fields().unwrap().dest, "D");
    }
}
