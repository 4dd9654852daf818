//! VM Translator - Stack VM Bytecode to Hack Assembly Translator
//!
//! Translates .vm source units into Hack assembly (.asm) for the nand2tetris
//! computer: the nine command kinds (arithmetic/logical operations, push/pop
//! across the eight memory segments, branching, and function call/return),
//! with per-unit static naming and globally unique minted labels.
//!
//! # Usage Modes
//!
//! - Single unit: `translate("source", "Unit")` - terminator, no bootstrap
//! - Multiple units: `translate_units(&[...])` / `translate_directory(path)` -
//!   bootstrap, no terminator

pub mod bootstrap;
pub mod codegen;
pub mod error;
pub mod memory;
pub mod parser;

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bootstrap::{write_bootstrap, write_terminator};
use crate::codegen::CodeGenerator;
pub use crate::error::{Result, TranslateError};
use crate::parser::parse_line;

/// Assembly produced for a directory, plus the units that were skipped.
#[derive(Debug)]
pub struct DirectoryOutput {
    /// Combined assembly for every accepted unit.
    pub asm: String,
    /// Per-file naming errors for the units skipped over.
    pub skipped: Vec<TranslateError>,
}

/// Translate a single VM source unit to Hack assembly.
///
/// Single-unit mode: the output ends in the terminator loop and carries no
/// bootstrap.
pub fn translate(source: &str, unit: &str) -> Result<String> {
    let mut codegen = CodeGenerator::new();
    let mut output = String::with_capacity(source.lines().count() * 50 + 64);

    translate_into(source, unit, &mut codegen, &mut output)?;
    write_terminator(&mut output);

    Ok(output)
}

/// Translate an ordered sequence of `(base name, source)` units into one
/// program.
///
/// Multi-unit mode: the bootstrap is emitted first and no terminator is
/// appended. A single code generator is shared across all units so minted
/// labels stay globally unique.
pub fn translate_units(units: &[(&str, &str)]) -> Result<String> {
    let total_lines: usize = units.iter().map(|(_, source)| source.lines().count()).sum();
    let mut output = String::with_capacity(total_lines * 50 + 512);
    let mut codegen = CodeGenerator::new();

    write_bootstrap(&mut codegen, &mut output);

    for (base, source) in units {
        translate_into(source, base, &mut codegen, &mut output)?;
    }

    Ok(output)
}

/// Translate one .vm file in single-unit mode.
pub fn translate_file(path: &Path) -> Result<String> {
    let base = unit_base_name(path)?;

    let source = fs::read_to_string(path).map_err(|e| TranslateError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    translate(&source, &base)
}

/// Translate all .vm files in a directory into one program.
///
/// Files whose names are illegal (no uppercase base) are skipped and
/// reported through [`DirectoryOutput::skipped`]; the remaining units are
/// translated in alphabetical order with Sys.vm first.
pub fn translate_directory(dir_path: &Path) -> Result<DirectoryOutput> {
    let mut vm_files: Vec<PathBuf> = fs::read_dir(dir_path)
        .map_err(|e| TranslateError::FileRead {
            path: dir_path.display().to_string(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "vm"))
        .collect();

    if vm_files.is_empty() {
        return Err(TranslateError::NoVmFiles {
            path: dir_path.display().to_string(),
        });
    }

    vm_files.sort();
    if let Some(pos) = vm_files
        .iter()
        .position(|f| f.file_name() == Some(OsStr::new("Sys.vm")))
    {
        let sys = vm_files.remove(pos);
        vm_files.insert(0, sys);
    }

    let mut skipped = Vec::new();
    let mut sources: Vec<(String, String)> = Vec::with_capacity(vm_files.len());

    for path in &vm_files {
        match unit_base_name(path) {
            Ok(base) => {
                let source = fs::read_to_string(path).map_err(|e| TranslateError::FileRead {
                    path: path.display().to_string(),
                    source: e,
                })?;
                sources.push((base, source));
            }
            Err(e) => skipped.push(e),
        }
    }

    if sources.is_empty() {
        return Err(TranslateError::NoVmFiles {
            path: dir_path.display().to_string(),
        });
    }

    let units: Vec<(&str, &str)> = sources
        .iter()
        .map(|(base, source)| (base.as_str(), source.as_str()))
        .collect();
    let asm = translate_units(&units)?;

    Ok(DirectoryOutput { asm, skipped })
}

/// Run the generator loop for one unit with shared emitter state.
fn translate_into(
    source: &str,
    unit: &str,
    codegen: &mut CodeGenerator,
    output: &mut String,
) -> Result<()> {
    codegen.set_unit(unit);

    for (line_num, line) in source.lines().enumerate() {
        if let Some(cmd) = parse_line(line, line_num + 1, unit)? {
            codegen.translate(&cmd, output);
        }
    }

    Ok(())
}

/// Extract and validate a unit's base name: the portion of the filename
/// before the first `.`, which must start with an uppercase letter. The
/// file itself must carry the .vm extension.
pub fn unit_base_name(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TranslateError::InvalidPath {
            path: path.display().to_string(),
        })?;

    if !path.extension().is_some_and(|ext| ext == "vm") {
        return Err(TranslateError::MissingVmExtension {
            path: path.display().to_string(),
        });
    }

    let base = file_name.split('.').next().unwrap_or("");
    if !base.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Err(TranslateError::LowercaseUnitName {
            path: path.display().to_string(),
        });
    }

    Ok(base.to_string())
}

/// Determine the output filename for a given input.
///
/// - Single unit: dir/Input.vm -> dir/Input.asm
/// - Directory: dir/ -> dir/dir.asm
pub fn output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let dir_name = input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input.join(format!("{}.asm", dir_name))
    } else {
        let base = input
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|name| name.split('.').next())
            .unwrap_or("output");
        input.with_file_name(format!("{}.asm", base))
    }
}
