//! Hack VM Translator - Main Entry Point
//!
//! Translates Hack VM code (`Nand2Tetris` Projects 7/8) into Hack assembly.
//!
//! A single `.vm` file is translated on its own, with no bootstrap code,
//! mirroring how Project 7 test scripts are run directly. A directory is
//! translated as one combined program: every `.vm` file inside it is
//! merged into a single `.asm` file named after the directory, preceded by
//! the bootstrap code that sets `SP` and calls `Sys.init`.
//!
//! # Usage
//! ```bash
//! cargo run <input.vm | input-directory>
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hack_common::io::{directory_output_path, file_stem, list_files_with_ext, read_lines, swap_extension};
use hack_common::Diagnostic;
use hack_vm::driver::{self, Module, TranslateError};

fn to_diagnostic(context: &str, err: TranslateError) -> Diagnostic {
    match err {
        TranslateError::Parser(inner) => {
            Diagnostic::new("ParseError", inner.to_string()).with_file(context)
        }
        TranslateError::Code { line, source } => {
            Diagnostic::new("CodeError", source.to_string())
                .with_file(context)
                .with_line(line)
        }
    }
}

fn run_single_file(input: &Path) -> Result<PathBuf, Diagnostic> {
    let lines = read_lines(input).map_err(|e| {
        Diagnostic::new("IoError", e.to_string()).with_file(input.display().to_string())
    })?;
    let stem = file_stem(input);
    let module = Module {
        stem,
        lines: &lines,
    };

    let asm = driver::translate_program(&[module], false)
        .map_err(|e| to_diagnostic(&input.display().to_string(), e))?;

    let output = swap_extension(input, "asm");
    write_output(&output, &asm)?;
    Ok(output)
}

fn run_directory(dir: &Path) -> Result<PathBuf, Diagnostic> {
    let files = list_files_with_ext(dir, "vm").map_err(|e| {
        Diagnostic::new("IoError", e.to_string()).with_file(dir.display().to_string())
    })?;

    if files.is_empty() {
        return Err(Diagnostic::new("IoError", "no .vm files found in directory")
            .with_file(dir.display().to_string()));
    }

    let mut all_lines = Vec::with_capacity(files.len());
    for file in &files {
        let lines = read_lines(file).map_err(|e| {
            Diagnostic::new("IoError", e.to_string()).with_file(file.display().to_string())
        })?;
        all_lines.push(lines);
    }

    let modules: Vec<Module> = files
        .iter()
        .zip(all_lines.iter())
        .map(|(file, lines)| Module {
            stem: file_stem(file),
            lines,
        })
        .collect();

    let asm = driver::translate_program(&modules, true)
        .map_err(|e| to_diagnostic(&dir.display().to_string(), e))?;

    let output = directory_output_path(dir, "asm");
    write_output(&output, &asm)?;
    Ok(output)
}

fn write_output(path: &Path, lines: &[String]) -> Result<(), Diagnostic> {
    let contents = lines.join("\n") + "\n";
    fs::write(path, contents)
        .map_err(|e| Diagnostic::new("IoError", e.to_string()).with_file(path.display().to_string()))
}

fn run(input_path: &str) -> Result<PathBuf, Diagnostic> {
    let input = Path::new(input_path);
    if input.is_dir() {
        run_directory(input)
    } else {
        run_single_file(input)
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.vm | input-directory>", args[0]);
        return ExitCode::FAILURE;
    }

    match run(&args[1]) {
        Ok(output) => {
            println!("Translation complete: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(diagnostic) => {
            let code = hack_common::report(&diagnostic);
            ExitCode::from(code as u8)
        }
    }
}
