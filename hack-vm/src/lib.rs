//! VM translator for the Hack platform (`Nand2Tetris` Project 7/8).
//!
//! Translates stack-machine VM commands into Hack assembly. The crate is
//! split the same way as [`hack_assembler`](../hack_assembler/index.html):
//! a zero-copy [`parser`], a [`code_writer`] that emits assembly text, and a
//! [`driver`] that ties both together for single-file and directory-mode
//! translation.

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code_writer;
pub mod driver;
pub mod parser;

pub use code_writer::{CodeWriter, CodeWriterError};
pub use driver::{translate_program, Module, TranslateError};
pub use parser::{CommandType, ParserError, ParserLines};
