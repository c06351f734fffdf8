//! Jack language compiler: translates one Jack class at a time into VM code.
//!
//! The tokenizer, symbol table, and VM writer are intentionally thin and
//! stateless between classes; [`compilation_engine::CompilationEngine`] ties
//! them together, consuming a whole class's tokens in one pass with no
//! intermediate parse tree, per the grammar's single recursive-descent pass.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::must_use_candidate)]

pub mod compilation_engine;
pub mod symbol_table;
pub mod tokenizer;
pub mod vm_writer;

use std::fmt;

pub use compilation_engine::{CompilationEngine, CompileError, ParseError, SemanticError};
pub use tokenizer::{LexError, Tokenizer};

/// Any error a whole-class compilation can produce, from tokenizing through
/// code generation.
#[derive(Debug)]
pub enum Error {
    Lex(LexError),
    Compile(CompileError),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "LexError: {e}"),
            Self::Compile(e) => write!(f, "{e}"),
        }
    }
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<CompileError> for Error {
    fn from(e: CompileError) -> Self {
        Self::Compile(e)
    }
}

/// Compiles one class's full source text into its VM translation.
pub fn compile_class(source: &str) -> Result<Vec<String>, Error> {
    let tokenizer = Tokenizer::new(source)?;
    let lines = CompilationEngine::new(tokenizer).compile()?;
    Ok(lines)
}
