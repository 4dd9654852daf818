//! VM command tokenizer and classifier.
//!
//! Splits raw source lines into typed command structures. Mnemonic and
//! segment names are resolved through compile-time perfect hash maps.

use phf::phf_map;

use crate::error::{Result, TranslateError};

/// Arithmetic and logical operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// Memory segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

/// VM command variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmCommand {
    // Arithmetic/logical (9 commands)
    Arithmetic(ArithmeticOp),

    // Memory access (push/pop x 8 segments)
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },

    // Branching (3 commands)
    Label { name: String },
    Goto { label: String },
    IfGoto { label: String },

    // Function commands (3 commands)
    Function { name: String, num_locals: u16 },
    Call { name: String, num_args: u16 },
    Return,
}

static ARITHMETIC_OPS: phf::Map<&'static str, ArithmeticOp> = phf_map! {
    "add" => ArithmeticOp::Add,
    "sub" => ArithmeticOp::Sub,
    "neg" => ArithmeticOp::Neg,
    "eq" => ArithmeticOp::Eq,
    "gt" => ArithmeticOp::Gt,
    "lt" => ArithmeticOp::Lt,
    "and" => ArithmeticOp::And,
    "or" => ArithmeticOp::Or,
    "not" => ArithmeticOp::Not,
};

static SEGMENTS: phf::Map<&'static str, Segment> = phf_map! {
    "constant" => Segment::Constant,
    "local" => Segment::Local,
    "argument" => Segment::Argument,
    "this" => Segment::This,
    "that" => Segment::That,
    "temp" => Segment::Temp,
    "pointer" => Segment::Pointer,
    "static" => Segment::Static,
};

/// Strip a trailing `//` comment and surrounding whitespace.
///
/// Returns the empty string for blank lines and full-line comments.
pub fn clean_line(line: &str) -> &str {
    line.split("//").next().unwrap_or("").trim()
}

/// Parse a single VM line into a command.
///
/// Returns `Ok(None)` for blank lines and comments, `Ok(Some(cmd))` for
/// valid commands, and `Err` for anything the classifier rejects.
pub fn parse_line(line: &str, line_num: usize, unit: &str) -> Result<Option<VmCommand>> {
    let line = clean_line(line);
    if line.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();

    let cmd = match parts[0] {
        "push" => {
            let segment = parse_segment(require(&parts, 1, "push", line_num, unit)?, line_num, unit)?;
            let index = parse_index(require(&parts, 2, "push", line_num, unit)?, line_num, unit)?;
            validate_index(segment, index, line_num, unit)?;
            VmCommand::Push { segment, index }
        }
        "pop" => {
            let segment = parse_segment(require(&parts, 1, "pop", line_num, unit)?, line_num, unit)?;
            if segment == Segment::Constant {
                return Err(TranslateError::PopToConstant {
                    line: line_num,
                    file: unit.to_string(),
                });
            }
            let index = parse_index(require(&parts, 2, "pop", line_num, unit)?, line_num, unit)?;
            validate_index(segment, index, line_num, unit)?;
            VmCommand::Pop { segment, index }
        }
        "label" => VmCommand::Label {
            name: require(&parts, 1, "label", line_num, unit)?.to_string(),
        },
        "goto" => VmCommand::Goto {
            label: require(&parts, 1, "goto", line_num, unit)?.to_string(),
        },
        "if-goto" => VmCommand::IfGoto {
            label: require(&parts, 1, "if-goto", line_num, unit)?.to_string(),
        },
        "function" => VmCommand::Function {
            name: require(&parts, 1, "function", line_num, unit)?.to_string(),
            num_locals: parse_index(require(&parts, 2, "function", line_num, unit)?, line_num, unit)?,
        },
        "call" => VmCommand::Call {
            name: require(&parts, 1, "call", line_num, unit)?.to_string(),
            num_args: parse_index(require(&parts, 2, "call", line_num, unit)?, line_num, unit)?,
        },
        "return" => VmCommand::Return,
        other => match ARITHMETIC_OPS.get(other) {
            Some(&op) => VmCommand::Arithmetic(op),
            None => {
                return Err(TranslateError::UnknownCommand {
                    line: line_num,
                    file: unit.to_string(),
                    command: other.to_string(),
                });
            }
        },
    };

    Ok(Some(cmd))
}

fn require<'a>(
    parts: &[&'a str],
    pos: usize,
    command: &str,
    line_num: usize,
    unit: &str,
) -> Result<&'a str> {
    parts.get(pos).copied().ok_or_else(|| TranslateError::MissingArgument {
        line: line_num,
        file: unit.to_string(),
        command: command.to_string(),
    })
}

fn parse_segment(s: &str, line_num: usize, unit: &str) -> Result<Segment> {
    SEGMENTS
        .get(s)
        .copied()
        .ok_or_else(|| TranslateError::UnknownSegment {
            line: line_num,
            file: unit.to_string(),
            segment: s.to_string(),
        })
}

fn parse_index(s: &str, line_num: usize, unit: &str) -> Result<u16> {
    s.parse::<u16>().map_err(|_| TranslateError::MalformedArgument {
        line: line_num,
        file: unit.to_string(),
        value: s.to_string(),
    })
}

fn validate_index(segment: Segment, index: u16, line_num: usize, unit: &str) -> Result<()> {
    match segment {
        Segment::Pointer if index > 1 => Err(TranslateError::PointerIndexOutOfRange {
            line: line_num,
            file: unit.to_string(),
            index,
        }),
        Segment::Temp if index > 7 => Err(TranslateError::TempIndexOutOfRange {
            line: line_num,
            file: unit.to_string(),
            index,
        }),
        _ => Ok(()),
    }
}
