//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Architecture
//! - **Pass 1**: Builds the symbol table by recording label positions
//! - **Pass 2**: Generates machine code, resolving all symbols
//!
//! # Usage
//! ```bash
//! cargo run <input.asm> [output.hack]
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use hack_assembler::driver::{self, AssembleError};
use hack_common::Diagnostic;

fn output_path(input: &Path, explicit_output: Option<&str>) -> std::path::PathBuf {
    explicit_output.map_or_else(
        || hack_common::io::swap_extension(input, "hack"),
        std::path::PathBuf::from,
    )
}

fn run(input_path: &str, explicit_output: Option<&str>) -> Result<std::path::PathBuf, Diagnostic> {
    let input = Path::new(input_path);
    let lines = hack_common::io::read_lines(input)
        .map_err(|e| Diagnostic::new("IoError", e.to_string()).with_file(input_path))?;

    let instructions = driver::assemble(&lines).map_err(|e| match e {
        AssembleError::Parser(inner) => {
            Diagnostic::new("ParseError", inner.to_string()).with_file(input_path)
        }
        AssembleError::Encoding { line, source } => {
            Diagnostic::new("EncodingError", source.to_string())
                .with_file(input_path)
                .with_line(line)
        }
    })?;

    let output = output_path(input, explicit_output);
    let contents = instructions.join("\n") + "\n";
    fs::write(&output, contents).map_err(|e| {
        Diagnostic::new("IoError", e.to_string()).with_file(output.display().to_string())
    })?;

    Ok(output)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if !(2..=3).contains(&args.len()) {
        eprintln!("Usage: {} <input.asm> [output.hack]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} Add.asm", args[0]);
        eprintln!("  {} Add.asm Add.hack", args[0]);
        return ExitCode::FAILURE;
    }

    match run(&args[1], args.get(2).map(String::as_str)) {
        Ok(output) => {
            println!("Assembly completed. Output written to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(diagnostic) => {
            let code = hack_common::report(&diagnostic);
            ExitCode::from(code as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_generation() {
        assert_eq!(
            output_path(Path::new("test.asm"), None),
            Path::new("test.hack")
        );
        assert_eq!(
            output_path(Path::new("test.asm"), Some("custom.hack")),
            Path::new("custom.hack")
        );
        assert_eq!(
            output_path(Path::new("dir/file.asm"), None),
            Path::new("dir/file.hack")
        );
    }

    #[test]
    fn test_output_path_explicit() {
        assert_eq!(
            output_path(Path::new("any.asm"), Some("out.hack")),
            Path::new("out.hack")
        );
        assert_eq!(
            output_path(Path::new("any.asm"), Some("path/to/out.hack")),
            Path::new("path/to/out.hack")
        );
    }
}
