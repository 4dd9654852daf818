//! Hack assembly generation for the nine VM command kinds.
//!
//! Every fragment leaves SP pointing one above the topmost live cell, so
//! fragments compose in any order the source program dictates.

use crate::memory::{SegmentAccess, pointer_symbol, segment_access, temp_address};
use crate::parser::{ArithmeticOp, Segment, VmCommand};

/// Store D at the stack top, then advance SP.
const PUSH_D: &str = "@SP\nA=M\nM=D\n@SP\nM=M+1\n";

/// Retreat SP, then load the exposed cell into D.
const POP_TO_D: &str = "@SP\nAM=M-1\nD=M\n";

/// Category and inner operator of an arithmetic mnemonic.
enum OpClass {
    /// Rewrites the top cell in place.
    Unary(&'static str),
    /// Pops y into D, rewrites the new top with x OP y.
    Binary(&'static str),
    /// Pops y, computes x - y, branches on the jump condition.
    Compare {
        jump: &'static str,
        tag: &'static str,
    },
}

fn op_class(op: ArithmeticOp) -> OpClass {
    match op {
        ArithmeticOp::Add => OpClass::Binary("D+M"),
        ArithmeticOp::Sub => OpClass::Binary("M-D"),
        ArithmeticOp::And => OpClass::Binary("D&M"),
        ArithmeticOp::Or => OpClass::Binary("D|M"),
        ArithmeticOp::Neg => OpClass::Unary("-M"),
        ArithmeticOp::Not => OpClass::Unary("!M"),
        ArithmeticOp::Eq => OpClass::Compare {
            jump: "JEQ",
            tag: "eq",
        },
        ArithmeticOp::Gt => OpClass::Compare {
            jump: "JGT",
            tag: "gt",
        },
        ArithmeticOp::Lt => OpClass::Compare {
            jump: "JLT",
            tag: "lt",
        },
    }
}

/// Code generator for Hack assembly.
///
/// One value is created per translation run and threaded through every unit,
/// so the label counters stay monotonic across the whole output.
pub struct CodeGenerator {
    /// Counter minting comparison branch labels
    compare_counter: usize,
    /// Counter minting call return-address labels
    call_counter: usize,
    /// Base name of the unit being translated, prefixes static symbols
    unit_name: String,
    /// Most recent `function` declaration, prefixes return-address labels
    current_function: String,
}

impl CodeGenerator {
    /// Create a new code generator with empty state.
    pub fn new() -> Self {
        Self {
            compare_counter: 0,
            call_counter: 0,
            unit_name: String::new(),
            current_function: String::new(),
        }
    }

    /// Set the base name of the unit being translated.
    pub fn set_unit(&mut self, unit: &str) {
        self.unit_name = unit.to_string();
    }

    /// Get the current function name.
    pub fn current_function(&self) -> &str {
        &self.current_function
    }

    /// Translate one VM command into the output buffer.
    pub fn translate(&mut self, cmd: &VmCommand, buf: &mut String) {
        match cmd {
            VmCommand::Arithmetic(op) => self.translate_arithmetic(*op, buf),
            VmCommand::Push { segment, index } => self.translate_push(*segment, *index, buf),
            VmCommand::Pop { segment, index } => self.translate_pop(*segment, *index, buf),
            VmCommand::Label { name } => self.translate_label(name, buf),
            VmCommand::Goto { label } => self.translate_goto(label, buf),
            VmCommand::IfGoto { label } => self.translate_if_goto(label, buf),
            VmCommand::Function { name, num_locals } => {
                self.translate_function(name, *num_locals, buf)
            }
            VmCommand::Call { name, num_args } => self.translate_call(name, *num_args, buf),
            VmCommand::Return => self.translate_return(buf),
        }
    }

    // =========================================================================
    // Arithmetic/Logical Commands
    // =========================================================================

    fn translate_arithmetic(&mut self, op: ArithmeticOp, buf: &mut String) {
        match op_class(op) {
            OpClass::Unary(operation) => {
                buf.push_str("@SP\nA=M-1\nM=");
                buf.push_str(operation);
                buf.push('\n');
            }
            OpClass::Binary(operation) => {
                buf.push_str(POP_TO_D);
                buf.push_str("A=A-1\nM=");
                buf.push_str(operation);
                buf.push('\n');
            }
            OpClass::Compare { jump, tag } => self.translate_comparison(jump, tag, buf),
        }
    }

    fn translate_comparison(&mut self, jump: &str, tag: &str, buf: &mut String) {
        let counter = self.compare_counter;
        self.compare_counter += 1;

        // x - y, where y is popped and x is the deeper cell
        buf.push_str(POP_TO_D);
        buf.push_str("A=A-1\nD=M-D\n@");
        write_compare_label(tag, "", counter, buf);
        buf.push_str("\nD;");
        buf.push_str(jump);
        buf.push_str("\n@SP\nA=M-1\nM=0\n@");
        write_compare_label(tag, "cont", counter, buf);
        buf.push_str("\n0;JMP\n(");
        write_compare_label(tag, "", counter, buf);
        buf.push_str(")\n@SP\nA=M-1\nM=-1\n(");
        write_compare_label(tag, "cont", counter, buf);
        buf.push_str(")\n");
    }

    // =========================================================================
    // Memory Access Commands
    // =========================================================================

    fn translate_push(&self, segment: Segment, index: u16, buf: &mut String) {
        match segment_access(segment) {
            SegmentAccess::Constant => {
                buf.push('@');
                write_num(index as usize, buf);
                buf.push_str("\nD=A\n");
            }
            SegmentAccess::Indirect(base) => {
                buf.push('@');
                write_num(index as usize, buf);
                buf.push_str("\nD=A\n@");
                buf.push_str(base);
                buf.push_str("\nA=D+M\nD=M\n");
            }
            SegmentAccess::Temp => {
                buf.push('@');
                write_num(temp_address(index) as usize, buf);
                buf.push_str("\nD=M\n");
            }
            SegmentAccess::Pointer => {
                buf.push('@');
                buf.push_str(pointer_symbol(index));
                buf.push_str("\nD=M\n");
            }
            SegmentAccess::Static => {
                buf.push('@');
                self.write_static_symbol(index, buf);
                buf.push_str("\nD=M\n");
            }
        }
        buf.push_str(PUSH_D);
    }

    fn translate_pop(&self, segment: Segment, index: u16, buf: &mut String) {
        match segment_access(segment) {
            SegmentAccess::Constant => {
                // Rejected by the classifier
                debug_assert!(false, "pop to constant should be caught by the parser");
            }
            SegmentAccess::Indirect(base) => {
                buf.push('@');
                write_num(index as usize, buf);
                buf.push_str("\nD=A\n@");
                buf.push_str(base);
                buf.push_str("\nD=D+M\n");
                write_spilled_store(index, buf);
            }
            SegmentAccess::Temp => {
                buf.push('@');
                write_num(temp_address(index) as usize, buf);
                buf.push_str("\nD=A\n");
                write_spilled_store(index, buf);
            }
            SegmentAccess::Pointer => {
                buf.push_str(POP_TO_D);
                buf.push('@');
                buf.push_str(pointer_symbol(index));
                buf.push_str("\nM=D\n");
            }
            SegmentAccess::Static => {
                buf.push_str(POP_TO_D);
                buf.push('@');
                self.write_static_symbol(index, buf);
                buf.push_str("\nM=D\n");
            }
        }
    }

    /// Write a static variable symbol: unit.N
    #[inline]
    fn write_static_symbol(&self, index: u16, buf: &mut String) {
        buf.push_str(&self.unit_name);
        buf.push('.');
        write_num(index as usize, buf);
    }

    // =========================================================================
    // Branching Commands
    // =========================================================================

    fn translate_label(&self, name: &str, buf: &mut String) {
        buf.push('(');
        buf.push_str(name);
        buf.push_str(")\n");
    }

    fn translate_goto(&self, label: &str, buf: &mut String) {
        buf.push('@');
        buf.push_str(label);
        buf.push_str("\n0;JMP\n");
    }

    fn translate_if_goto(&self, label: &str, buf: &mut String) {
        buf.push_str(POP_TO_D);
        buf.push('@');
        buf.push_str(label);
        buf.push_str("\nD;JNE\n");
    }

    // =========================================================================
    // Function Commands
    // =========================================================================

    fn translate_function(&mut self, name: &str, num_locals: u16, buf: &mut String) {
        self.current_function = name.to_string();

        buf.push('(');
        buf.push_str(name);
        buf.push_str(")\n");

        // Zero-initialize the locals
        for _ in 0..num_locals {
            buf.push_str("@SP\nA=M\nM=0\n@SP\nM=M+1\n");
        }
    }

    fn translate_call(&mut self, name: &str, num_args: u16, buf: &mut String) {
        let counter = self.call_counter;
        self.call_counter += 1;

        // Push return address as a value
        buf.push('@');
        self.write_return_label(counter, buf);
        buf.push_str("\nD=A\n");
        buf.push_str(PUSH_D);

        // Push the caller's LCL, ARG, THIS, THAT
        for symbol in ["LCL", "ARG", "THIS", "THAT"] {
            buf.push('@');
            buf.push_str(symbol);
            buf.push_str("\nD=M\n");
            buf.push_str(PUSH_D);
        }

        // ARG = SP - 5 - num_args
        buf.push_str("@SP\nD=M\n@");
        write_num(num_args as usize + 5, buf);
        buf.push_str("\nD=D-A\n@ARG\nM=D\n");

        // LCL = SP
        buf.push_str("@SP\nD=M\n@LCL\nM=D\n");

        // Transfer control
        buf.push('@');
        buf.push_str(name);
        buf.push_str("\n0;JMP\n");

        // Resumption point
        buf.push('(');
        self.write_return_label(counter, buf);
        buf.push_str(")\n");
    }

    /// Write a return-address label: function$ret.N
    ///
    /// An empty current function (bootstrap) yields the bare form `$ret.N`.
    #[inline]
    fn write_return_label(&self, counter: usize, buf: &mut String) {
        buf.push_str(&self.current_function);
        buf.push_str("$ret.");
        write_num(counter, buf);
    }

    fn translate_return(&self, buf: &mut String) {
        // frame = LCL
        buf.push_str("@LCL\nD=M\n@frame\nM=D\n");

        // retAddr = *(frame - 5)
        buf.push_str("@5\nA=D-A\nD=M\n@retAddr\nM=D\n");

        // *ARG = pop(), before ARG itself is restored
        buf.push_str(POP_TO_D);
        buf.push_str("@ARG\nA=M\nM=D\n");

        // SP = ARG + 1
        buf.push_str("@ARG\nD=M+1\n@SP\nM=D\n");

        // Restore THAT, THIS, ARG, LCL walking down from frame
        for symbol in ["THAT", "THIS", "ARG", "LCL"] {
            buf.push_str("@frame\nAM=M-1\nD=M\n@");
            buf.push_str(symbol);
            buf.push_str("\nM=D\n");
        }

        // Jump through the saved return address
        buf.push_str("@retAddr\nA=M\n0;JMP\n");
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Spill the effective address in D to addrN, then pop the stack through it.
fn write_spilled_store(index: u16, buf: &mut String) {
    buf.push('@');
    write_addr_cell(index, buf);
    buf.push_str("\nM=D\n");
    buf.push_str(POP_TO_D);
    buf.push('@');
    write_addr_cell(index, buf);
    buf.push_str("\nA=M\nM=D\n");
}

/// Write an indexed scratch cell symbol: addrN
#[inline]
fn write_addr_cell(index: u16, buf: &mut String) {
    buf.push_str("addr");
    write_num(index as usize, buf);
}

/// Write a comparison label: tag + optional suffix + counter (eq0, eqcont0)
#[inline]
fn write_compare_label(tag: &str, suffix: &str, counter: usize, buf: &mut String) {
    buf.push_str(tag);
    buf.push_str(suffix);
    write_num(counter, buf);
}

/// Append a decimal number to the buffer without allocating.
#[inline]
fn write_num(n: usize, buf: &mut String) {
    let mut digits = [0u8; 20];
    let mut len = 0;
    let mut rest = n;

    loop {
        digits[len] = b'0' + (rest % 10) as u8;
        rest /= 10;
        len += 1;
        if rest == 0 {
            break;
        }
    }

    while len > 0 {
        len -= 1;
        buf.push(digits[len] as char);
    }
}
