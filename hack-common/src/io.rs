//! File and directory I/O shared by the three translators.
//!
//! Each stage reads one file or iterates a directory once, filtering by
//! extension. Directory entries are sorted alphabetically before
//! translation so output ordering is deterministic across platforms,
//! independent of the OS's directory-iteration order.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads a text file into one `String` per line, in order.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

/// Reads a whole file into a single string, for tokenizer-style consumers
/// that want to scan characters rather than iterate lines.
pub fn read_to_string(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Lists files directly under `dir` whose extension matches `ext`
/// (case-sensitive, without the dot), sorted alphabetically by filename.
pub fn list_files_with_ext(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(ext))
        .collect();
    files.sort();
    Ok(files)
}

/// Swaps a single input file's extension for the target one:
/// `Foo.jack` + `vm` -> `Foo.vm`, preserving the parent directory.
#[must_use]
pub fn swap_extension(input: &Path, new_ext: &str) -> PathBuf {
    input.with_extension(new_ext)
}

/// Builds the merged output path for directory-mode translation:
/// `Dir/` + `asm` -> `Dir/Dir.asm`.
#[must_use]
pub fn directory_output_path(dir: &Path, new_ext: &str) -> PathBuf {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("output")
        .to_string();
    dir.join(format!("{name}.{new_ext}"))
}

/// The basename of a path with its extension stripped — used for VM static
/// segment naming (`Foo.vm` -> stem `Foo`) so static variables link across
/// files sharing that stem, per the VM translator's static segment rule.
#[must_use]
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}
