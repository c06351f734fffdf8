//! Jack Compiler - Main Entry Point
//!
//! Translates Jack source (`Nand2Tetris` Project 10/11) into VM code.
//!
//! A single `.jack` file compiles to the `.vm` file of the same name. A
//! directory compiles every `.jack` file inside it, each to its own `.vm`
//! file in the same directory — unlike the VM translator's directory mode,
//! nothing is merged, since each Jack class is an independent compilation
//! unit.
//!
//! # Usage
//! ```bash
//! cargo run <input.jack | input-directory>
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hack_common::io::{list_files_with_ext, read_to_string, swap_extension};
use hack_common::Diagnostic;
use jack_compiler::{compile_class, Error};

fn to_diagnostic(context: &str, err: Error) -> Diagnostic {
    match err {
        Error::Lex(inner) => Diagnostic::new("LexError", inner.to_string())
            .with_file(context)
            .with_line(inner.line()),
        Error::Compile(inner) => Diagnostic::new("CompileError", inner.to_string()).with_file(context),
    }
}

fn compile_file(input: &Path) -> Result<PathBuf, Diagnostic> {
    let source = read_to_string(input).map_err(|e| {
        Diagnostic::new("IoError", e.to_string()).with_file(input.display().to_string())
    })?;

    let lines =
        compile_class(&source).map_err(|e| to_diagnostic(&input.display().to_string(), e))?;

    let output = swap_extension(input, "vm");
    write_output(&output, &lines)?;
    Ok(output)
}

fn compile_directory(dir: &Path) -> Result<Vec<PathBuf>, Diagnostic> {
    let files = list_files_with_ext(dir, "jack").map_err(|e| {
        Diagnostic::new("IoError", e.to_string()).with_file(dir.display().to_string())
    })?;

    if files.is_empty() {
        return Err(Diagnostic::new("IoError", "no .jack files found in directory")
            .with_file(dir.display().to_string()));
    }

    files.iter().map(|file| compile_file(file)).collect()
}

fn write_output(path: &Path, lines: &[String]) -> Result<(), Diagnostic> {
    let contents = lines.join("\n") + "\n";
    fs::write(path, contents)
        .map_err(|e| Diagnostic::new("IoError", e.to_string()).with_file(path.display().to_string()))
}

fn run(input_path: &str) -> Result<Vec<PathBuf>, Diagnostic> {
    let input = Path::new(input_path);
    if input.is_dir() {
        compile_directory(input)
    } else {
        compile_file(input).map(|p| vec![p])
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.jack | input-directory>", args[0]);
        return ExitCode::FAILURE;
    }

    match run(&args[1]) {
        Ok(outputs) => {
            for output in outputs {
                println!("Compilation complete: {}", output.display());
            }
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
    fn single_file_output_swaps_extension() {
        assert_eq!(
            swap_extension(Path::new("Main.jack"), "vm"),
            PathBuf::from("Main.vm")
        );
    }
}
