//! VM Translator CLI
//!
//! Translates VM bytecode to Hack assembly.
//!
//! # Usage
//!
//! ```bash
//! # Single unit
//! translate SimpleAdd.vm
//!
//! # Directory (with bootstrap)
//! translate FibonacciElement/
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use vm_translator::{TranslateError, output_path, translate_directory, translate_file};

#[derive(ClapParser, Debug)]
#[command(name = "translate")]
#[command(version)]
#[command(about = "Stack VM bytecode to Hack assembly translator")]
struct Args {
    /// Input .vm file or directory of .vm files
    #[arg(value_name = "PATH")]
    input: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: path not found: {}", args.input.display());
        return ExitCode::from(2);
    }

    let result = if args.input.is_dir() {
        run_directory(&args.input)
    } else {
        run_file(&args.input)
    };

    match result {
        Ok(output_file) => {
            println!("{}", output_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run_file(input: &Path) -> Result<PathBuf, TranslateError> {
    let asm = translate_file(input)?;
    write_output(input, &asm)
}

fn run_directory(input: &Path) -> Result<PathBuf, TranslateError> {
    let output = translate_directory(input)?;

    for err in &output.skipped {
        eprintln!("Warning: {}", err);
    }

    write_output(input, &output.asm)
}

fn write_output(input: &Path, asm: &str) -> Result<PathBuf, TranslateError> {
    let output = output_path(input);

    fs::write(&output, asm).map_err(|e| TranslateError::FileWrite {
        path: output.display().to_string(),
        source: e,
    })?;

    Ok(output)
}
