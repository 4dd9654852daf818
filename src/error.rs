//! Error types for VM translation.
//!
//! Parse-time errors carry the source unit and line number so messages point
//! at the offending command.

use thiserror::Error;

/// Translation error with source context.
#[derive(Error, Debug)]
pub enum TranslateError {
    // Classifier errors
    #[error("{file}:{line}: unknown command: {command}")]
    UnknownCommand {
        line: usize,
        file: String,
        command: String,
    },

    #[error("{file}:{line}: unknown segment: {segment}")]
    UnknownSegment {
        line: usize,
        file: String,
        segment: String,
    },

    #[error("{file}:{line}: missing argument for {command}")]
    MissingArgument {
        line: usize,
        file: String,
        command: String,
    },

    #[error("{file}:{line}: malformed argument: {value}")]
    MalformedArgument {
        line: usize,
        file: String,
        value: String,
    },

    #[error("{file}:{line}: cannot pop to constant segment")]
    PopToConstant { line: usize, file: String },

    #[error("{file}:{line}: pointer index {index} out of range (must be 0 or 1)")]
    PointerIndexOutOfRange {
        line: usize,
        file: String,
        index: u16,
    },

    #[error("{file}:{line}: temp index {index} out of range (must be 0-7)")]
    TempIndexOutOfRange {
        line: usize,
        file: String,
        index: u16,
    },

    // Filename errors
    #[error("not a .vm file: {path}")]
    MissingVmExtension { path: String },

    #[error("unit name must start with an uppercase letter: {path}")]
    LowercaseUnitName { path: String },

    // Argument errors
    #[error("path is not a file or directory: {path}")]
    InvalidPath { path: String },

    #[error("no .vm files found in directory: {path}")]
    NoVmFiles { path: String },

    // I/O errors
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;
