//! Two-pass assembly driver.
//!
//! Pass 1 builds the symbol table by recording label addresses; pass 2
//! resolves every symbol and emits machine code. Both passes live here
//! (rather than in `main`) so they can be exercised directly from tests
//! without going through the CLI or the filesystem.

use std::fmt;

use crate::code::{self, EncodingError};
use crate::parser::{CommandType, ParserError, ParserLines};
use crate::symbol_table::{SymbolTable, USER_RAM_BASE};

/// Everything that can go wrong assembling a program, tagged with the
/// 1-based source line it happened on when known.
#[derive(Debug)]
pub enum AssembleError {
    Parser(ParserError),
    Encoding { line: usize, source: EncodingError },
}

impl std::error::Error for AssembleError {}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parser(e) => write!(f, "ParseError: {e}"),
            Self::Encoding { line, source } => {
                write!(f, "EncodingError: {source} (line {line})")
            }
        }
    }
}

impl From<ParserError> for AssembleError {
    fn from(e: ParserError) -> Self {
        Self::Parser(e)
    }
}

/// Pass 1: records every label's ROM address. A-commands and C-commands
/// advance the ROM counter; L-commands mark the next instruction's address
/// without advancing it.
pub fn first_pass(lines: &[String], symbol_table: &mut SymbolTable) -> Result<(), AssembleError> {
    let mut rom_address = 0u16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::Label => {
                let symbol = parser.symbol()?;
                symbol_table.add_entry(symbol, rom_address);
            }
            CommandType::Address | CommandType::Compute => {
                rom_address += 1;
            }
        }
    }

    Ok(())
}

/// Pass 2: resolves symbols and emits one 16-character binary line per
/// instruction, in source order. L-commands emit nothing.
pub fn second_pass(
    lines: &[String],
    symbol_table: &mut SymbolTable,
) -> Result<Vec<String>, AssembleError> {
    let mut ram_address = USER_RAM_BASE;
    let mut parser = ParserLines::from_lines(lines);
    let mut instructions = Vec::with_capacity(lines.len());

    while parser.advance() {
        match parser.command_type()? {
            CommandType::Address => {
                let symbol = parser.symbol()?;
                let address = symbol
                    .parse::<u32>()
                    .unwrap_or_else(|_| u32::from(symbol_table.get_or_insert(symbol, &mut ram_address)));

                let instruction =
                    code::encode_a_instruction(address).map_err(|source| AssembleError::Encoding {
                        line: parser.line_number(),
                        source,
                    })?;
                instructions.push(instruction);
            }
            CommandType::Compute => {
                let fields = parser.compute_fields()?;

                let instruction = code::encode_c_instruction(fields.dest, fields.comp, fields.jump)
                    .map_err(|source| AssembleError::Encoding {
                        line: parser.line_number(),
                        source,
                    })?;
                instructions.push(instruction);
            }
            CommandType::Label => {}
        }
    }

    Ok(instructions)
}

/// Runs both passes over a whole program's source lines, returning the
/// finished `.hack` lines in order.
pub fn assemble(lines: &[String]) -> Result<Vec<String>, AssembleError> {
    let mut symbol_table = SymbolTable::new();
    first_pass(lines, &mut symbol_table)?;
    second_pass(lines, &mut symbol_table)
}
