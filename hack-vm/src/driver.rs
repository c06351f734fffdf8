//! Ties the parser and code writer together into whole-program translation.
//!
//! A "module" is one `.vm` file's lines paired with the stem used for its
//! static segment. `translate_program` feeds every module through a single
//! [`CodeWriter`] so label and call counters, and the current-function
//! scope, stay correct across file boundaries exactly as they would inside
//! one file.

use std::fmt;

use crate::code_writer::{CodeWriter, CodeWriterError};
use crate::parser::{CommandType, ParserError, ParserLines};

#[derive(Debug)]
pub enum TranslateError {
    Parser(ParserError),
    Code { line: usize, source: CodeWriterError },
}

impl std::error::Error for TranslateError {}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parser(e) => write!(f, "ParseError: {e}"),
            Self::Code { line, source } => write!(f, "CodeError: {source} (line {line})"),
        }
    }
}

impl From<ParserError> for TranslateError {
    fn from(e: ParserError) -> Self {
        Self::Parser(e)
    }
}

/// One `.vm` source file: its lines and the stem used for static variables.
pub struct Module<'a> {
    pub stem: String,
    pub lines: &'a [String],
}

fn translate_module(
    module: &Module<'_>,
    writer: &mut CodeWriter,
) -> Result<(), TranslateError> {
    writer.set_filename(&module.stem);
    let mut parser = ParserLines::from_lines(module.lines);
    let mut line_no = 0usize;

    while parser.advance() {
        line_no += 1;
        let kind = parser.command_type()?;
        let result: Result<(), CodeWriterError> = match kind {
            CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?),
            CommandType::Push => writer.write_push_pop(true, parser.arg1()?, parser.arg2()?),
            CommandType::Pop => writer.write_push_pop(false, parser.arg1()?, parser.arg2()?),
            CommandType::Label => {
                writer.write_label(parser.arg1()?);
                Ok(())
            }
            CommandType::Goto => {
                writer.write_goto(parser.arg1()?);
                Ok(())
            }
            CommandType::If => {
                writer.write_if(parser.arg1()?);
                Ok(())
            }
            CommandType::Function => {
                writer.write_function(parser.arg1()?, parser.arg2()?);
                Ok(())
            }
            CommandType::Call => {
                writer.write_call(parser.arg1()?, parser.arg2()?);
                Ok(())
            }
            CommandType::Return => {
                writer.write_return();
                Ok(())
            }
        };

        if let Err(source) = result {
            return Err(TranslateError::Code {
                line: line_no,
                source,
            });
        }
    }

    Ok(())
}

/// Translates a whole program (one or many modules) into a single Hack
/// assembly listing. `with_bootstrap` should be set for directory-mode,
/// multi-file programs and unset for single-file translation, matching the
/// Nand2Tetris convention that a lone file has no `Sys.init` to call into.
pub fn translate_program(
    modules: &[Module<'_>],
    with_bootstrap: bool,
) -> Result<Vec<String>, TranslateError> {
    let mut writer = CodeWriter::new();
    if with_bootstrap {
        writer.write_bootstrap();
    }
    for module in modules {
        translate_module(module, &mut writer)?;
    }
    Ok(writer.into_lines())
}
