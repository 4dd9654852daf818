//! Bootstrap prologue and termination fragment.
//!
//! Multi-unit programs start from the bootstrap, which initializes SP and
//! transfers control to Sys.init. Single-unit programs instead end in the
//! terminator, a self-jump that halts execution by spinning.

use crate::codegen::CodeGenerator;
use crate::parser::VmCommand;

/// Write the bootstrap prologue: SP = 256, then `call Sys.init 0`.
///
/// The call goes through the ordinary call generator while the current
/// function is still empty, so the return label comes out as the bare
/// `$ret.0`. Sys.init never returns and the label is unreachable.
pub fn write_bootstrap(codegen: &mut CodeGenerator, buf: &mut String) {
    buf.push_str("@256\nD=A\n@SP\nM=D\n");

    let call = VmCommand::Call {
        name: "Sys.init".to_string(),
        num_args: 0,
    };
    codegen.translate(&call, buf);
}

/// Write the termination fragment: an infinite self-loop at label END.
pub fn write_terminator(buf: &mut String) {
    buf.push_str("(END)\n@END\n0;JMP\n");
}
