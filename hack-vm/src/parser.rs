//! Parser module for the VM language.
//!
//! Mirrors the assembler's `ParserLines`: strip comments and whitespace
//! once per line, classify the command, and hand back borrowed slices of
//! the already-cleaned source rather than re-scanning on every accessor.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

#[derive(Debug)]
pub enum ParserError {
    InvalidState(&'static str),
    MalformedCommand(String),
}

impl std::error::Error for ParserError {}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::MalformedCommand(line) => write!(f, "malformed command: {line}"),
        }
    }
}

/// Parser for VM lines with zero-copy string slicing.
pub struct ParserLines<'a> {
    lines: std::slice::Iter<'a, String>,
    current_line: &'a str,
    current_command_type: Option<CommandType>,
}

impl<'a> ParserLines<'a> {
    #[inline]
    #[must_use]
    pub fn from_lines(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter(),
            current_line: "",
            current_command_type: None,
        }
    }

    /// Advances to the next valid command, skipping comments and whitespace.
    #[inline]
    pub fn advance(&mut self) -> bool {
        for line in self.lines.by_ref() {
            if line.is_empty() {
                continue;
            }

            let clean_line = Self::strip_comment(line);
            let trimmed = clean_line.trim();

            if !trimmed.is_empty() {
                self.current_line = trimmed;
                self.current_command_type = Some(Self::classify_command(trimmed));
                return true;
            }
        }

        self.current_command_type = None;
        false
    }

    #[inline]
    fn strip_comment(line: &str) -> &str {
        let bytes = line.as_bytes();
        for i in 0..bytes.len().saturating_sub(1) {
            if bytes[i] == b'/' && bytes[i + 1] == b'/' {
                return &line[..i];
            }
        }
        line
    }

    #[inline]
    fn classify_command(line: &str) -> CommandType {
        let first_word = line.split_whitespace().next().unwrap_or("");
        match first_word {
            "push" => CommandType::Push,
            "pop" => CommandType::Pop,
            "label" => CommandType::Label,
            "goto" => CommandType::Goto,
            "if-goto" => CommandType::If,
            "function" => CommandType::Function,
            "return" => CommandType::Return,
            "call" => CommandType::Call,
            _ => CommandType::Arithmetic,
        }
    }

    #[inline]
    pub fn command_type(&self) -> Result<CommandType, ParserError> {
        self.current_command_type
            .ok_or(ParserError::InvalidState("no current line available"))
    }

    /// First argument: the arithmetic mnemonic, the segment name, the
    /// label, or the function name. Never valid for `Return`.
    #[inline]
    pub fn arg1(&self) -> Result<&'a str, ParserError> {
        let mut parts = self.current_line.split_whitespace();
        match self.command_type()? {
            CommandType::Arithmetic => {
                parts.next().ok_or(ParserError::InvalidState("empty command"))
            }
            CommandType::Return => Err(ParserError::InvalidState("arg1 invalid for return")),
            _ => {
                parts.next();
                parts.next().ok_or_else(|| {
                    ParserError::MalformedCommand(self.current_line.to_string())
                })
            }
        }
    }

    /// Second argument: the segment index or the variable/argument count.
    #[inline]
    pub fn arg2(&self) -> Result<i32, ParserError> {
        match self.command_type()? {
            CommandType::Push
            | CommandType::Pop
            | CommandType::Function
            | CommandType::Call => {
                let mut parts = self.current_line.split_whitespace();
                parts.next();
                parts.next();
                let raw = parts
                    .next()
                    .ok_or_else(|| ParserError::MalformedCommand(self.current_line.to_string()))?;
                raw.parse()
                    .map_err(|_| ParserError::MalformedCommand(self.current_line.to_string()))
            }
            other => Err(ParserError::InvalidState(match other {
                CommandType::Arithmetic => "arg2 invalid for arithmetic",
                CommandType::Label => "arg2 invalid for label",
                CommandType::Goto => "arg2 invalid for goto",
                CommandType::If => "arg2 invalid for if-goto",
                CommandType::Return => "arg2 invalid for return",
                _ => unreachable!(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_command_kind() {
        let lines = vec![
            "push constant 7".to_string(),
            "pop local 2".to_string(),
            "add".to_string(),
            "label LOOP".to_string(),
            "goto LOOP".to_string(),
            "if-goto LOOP".to_string(),
            "function Foo.bar 2".to_string(),
            "call Foo.bar 1".to_string(),
            "return".to_string(),
        ];
        let mut parser = ParserLines::from_lines(&lines);

        let expected = [
            CommandType::Push,
            CommandType::Pop,
            CommandType::Arithmetic,
            CommandType::Label,
            CommandType::Goto,
            CommandType::If,
            CommandType::Function,
            CommandType::Call,
            CommandType::Return,
        ];

        for kind in expected {
            assert!(parser.advance());
            assert_eq!(parser.command_type().unwrap(), kind);
        }
        assert!(!parser.advance());
    }

    #[test]
    fn reads_push_arguments() {
        let lines = vec!["push argument 3".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        assert_eq!(parser.arg1().unwrap(), "argument");
        assert_eq!(parser.arg2().unwrap(), 3);
    }

    #[test]
    fn reads_arithmetic_mnemonic_as_arg1() {
        let lines = vec!["eq".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance();
        assert_eq!(parser.arg1().unwrap(), "eq");
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let lines = vec![
            "// header".to_string(),
            String::new(),
            "push constant 1 // one".to_string(),
        ];
        let mut parser = ParserLines::from_lines(&lines);
        assert!(parser.advance());
        assert_eq!(parser.command_type().unwrap(), CommandType::Push);
        assert!(!parser.advance());
    }
}
