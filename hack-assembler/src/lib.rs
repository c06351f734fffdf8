//! Stage 3 of the Hack toolchain: assembly source to Hack machine code.
//!
//! Three modules cover the two-pass design: [`parser`] turns source lines
//! into classified instructions, [`code`] encodes dest/comp/jump mnemonics
//! into their 16-bit binary fields, and [`symbol_table`] resolves labels
//! and variables to addresses. [`driver::assemble`] runs both passes over
//! a whole program.
//!
//! ```rust
//! use hack_assembler::{CommandType, ParserLines, SymbolTable, code};
//!
//! let lines = vec!["@100".to_string(), "D=M".to_string()];
//! let mut parser = ParserLines::from_lines(&lines);
//!
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::Address);
//! assert_eq!(parser.symbol().unwrap(), "100");
//!
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::Compute);
//! let fields = parser.compute_fields().unwrap();
//! let instruction = code::encode_c_instruction(fields.dest, fields.comp, fields.jump).unwrap();
//! assert_eq!(instruction, "1111110000010000");
//!
//! let mut symbols = SymbolTable::new();
//! symbols.add_entry("LOOP", 10);
//! assert_eq!(symbols.get_address("LOOP"), 10);
//! assert_eq!(symbols.get_address("SP"), 0);
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code;
pub mod driver;
pub mod parser;
pub mod symbol_table;

pub use code::EncodingError;
pub use driver::{assemble, AssembleError};
pub use parser::{CommandType, ComputeFields, ParserError, ParserLines};
pub use symbol_table::SymbolTable;
