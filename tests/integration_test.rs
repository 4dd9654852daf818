//! Integration tests over the textual shape of the emitted assembly.

use std::collections::HashSet;
use std::path::Path;

use vm_translator::{TranslateError, translate, translate_directory, translate_units};

// =============================================================================
// Arithmetic and Memory Commands
// =============================================================================

#[test]
fn test_all_arithmetic_operations() {
    let vm_code = "push constant 10\npush constant 5\nadd\n\
                   push constant 10\npush constant 5\nsub\n\
                   push constant 10\nneg\n\
                   push constant 10\npush constant 5\neq\n\
                   push constant 10\npush constant 5\nlt\n\
                   push constant 10\npush constant 5\ngt\n\
                   push constant 10\npush constant 5\nand\n\
                   push constant 10\npush constant 5\nor\n\
                   push constant 10\nnot";

    let asm = translate(vm_code, "Test").expect("translation failed");

    assert!(asm.contains("M=D+M"));
    assert!(asm.contains("M=M-D"));
    assert!(asm.contains("M=-M"));
    assert!(asm.contains("D;JEQ"));
    assert!(asm.contains("D;JLT"));
    assert!(asm.contains("D;JGT"));
    assert!(asm.contains("M=D&M"));
    assert!(asm.contains("M=D|M"));
    assert!(asm.contains("M=!M"));
}

#[test]
fn test_all_memory_segments() {
    let vm_code = "push constant 10\npop local 0\n\
                   push constant 20\npop argument 1\n\
                   push constant 30\npop this 2\n\
                   push constant 40\npop that 3\n\
                   push constant 50\npop temp 4\n\
                   push constant 3030\npop pointer 0\n\
                   push constant 60\npop static 5";

    let asm = translate(vm_code, "Test").expect("translation failed");

    assert!(asm.contains("@LCL"));
    assert!(asm.contains("@ARG"));
    assert!(asm.contains("@THIS"));
    assert!(asm.contains("@THAT"));
    assert!(asm.contains("@9")); // temp 4 = RAM[5+4]
    assert!(asm.contains("@THIS\nM=D")); // pointer 0
    assert!(asm.contains("@Test.5")); // static 5
}

#[test]
fn test_pop_spills_through_indexed_scratch_cell() {
    let asm = translate("push constant 1\npop local 3\npush constant 2\npop that 3", "Test")
        .expect("translation failed");

    // Both pops at index 3 route through the same indexed cell
    assert_eq!(asm.matches("@addr3\nM=D").count(), 2);
    assert_eq!(asm.matches("@addr3\nA=M\nM=D").count(), 2);
}

#[test]
fn test_comparison_label_families() {
    let vm_code = "push constant 1\npush constant 2\neq\n\
                   push constant 3\npush constant 4\ngt\n\
                   push constant 5\npush constant 6\nlt";

    let asm = translate(vm_code, "Test").expect("translation failed");

    // One shared counter across all three comparison kinds
    assert!(asm.contains("(eq0)") && asm.contains("(eqcont0)"));
    assert!(asm.contains("(gt1)") && asm.contains("(gtcont1)"));
    assert!(asm.contains("(lt2)") && asm.contains("(ltcont2)"));
}

#[test]
fn test_comparison_label_uniqueness() {
    // Three eq commands mint counters 0, 1, 2
    let vm_code = "push constant 1\npush constant 2\neq\n\
                   push constant 3\npush constant 4\neq\n\
                   push constant 5\npush constant 6\neq";

    let asm = translate(vm_code, "Test").expect("translation failed");

    assert!(asm.contains("(eq0)"));
    assert!(asm.contains("(eq1)"));
    assert!(asm.contains("(eq2)"));
}

#[test]
fn test_label_declarations_globally_unique() {
    let vm_code = "function Main.main 1\n\
                   push constant 1\npush constant 2\neq\n\
                   push constant 3\npush constant 4\nlt\n\
                   call Main.helper 0\n\
                   call Main.helper 0\n\
                   return\n\
                   function Main.helper 0\n\
                   push constant 0\n\
                   return";

    let asm = translate(vm_code, "Main").expect("translation failed");

    let mut seen = HashSet::new();
    for line in asm.lines() {
        if line.starts_with('(') {
            assert!(seen.insert(line.to_string()), "duplicate label: {}", line);
        }
    }
}

// =============================================================================
// Branching Commands
// =============================================================================

#[test]
fn test_branching_labels_verbatim() {
    let vm_code = "function Test.main 0\n\
                   label LOOP\n\
                   push constant 1\n\
                   if-goto END_LOOP\n\
                   goto LOOP\n\
                   label END_LOOP\n\
                   return";

    let asm = translate(vm_code, "Test").expect("translation failed");

    // No function or unit prefix on branching labels
    assert!(asm.contains("(LOOP)"));
    assert!(asm.contains("(END_LOOP)"));
    assert!(asm.contains("@LOOP\n0;JMP"));
    assert!(asm.contains("@END_LOOP\nD;JNE"));
}

// =============================================================================
// Function Commands
// =============================================================================

#[test]
fn test_function_call_shape() {
    let vm_code = "function Test.caller 1\n\
                   push constant 5\n\
                   call Test.callee 1\n\
                   pop local 0\n\
                   return\n\
                   function Test.callee 0\n\
                   push argument 0\n\
                   push constant 1\n\
                   add\n\
                   return";

    let asm = translate(vm_code, "Test").expect("translation failed");

    assert!(asm.contains("(Test.caller)"));
    assert!(asm.contains("(Test.callee)"));
    assert!(asm.contains("@Test.caller$ret.0\nD=A"));
    assert!(asm.contains("(Test.caller$ret.0)"));
    assert!(asm.contains("@Test.callee\n0;JMP"));
    assert!(asm.contains("@retAddr\nA=M\n0;JMP"));
}

#[test]
fn test_call_frame_structure() {
    let vm_code = "function Test.main 0\n\
                   push constant 1\n\
                   push constant 2\n\
                   call Test.add 2\n\
                   return\n\
                   function Test.add 0\n\
                   push argument 0\n\
                   push argument 1\n\
                   add\n\
                   return";

    let asm = translate(vm_code, "Test").expect("translation failed");

    // Five-cell frame: return address then LCL, ARG, THIS, THAT
    assert!(asm.contains("@LCL\nD=M\n@SP\nA=M\nM=D"));
    assert!(asm.contains("@ARG\nD=M\n@SP\nA=M\nM=D"));
    assert!(asm.contains("@THIS\nD=M\n@SP\nA=M\nM=D"));
    assert!(asm.contains("@THAT\nD=M\n@SP\nA=M\nM=D"));

    // ARG = SP - 5 - 2
    assert!(asm.contains("@7\nD=D-A\n@ARG\nM=D"));

    // LCL = SP
    assert!(asm.contains("@SP\nD=M\n@LCL\nM=D"));
}

#[test]
fn test_return_frame_restoration() {
    let asm = translate("function Test.main 0\nreturn", "Test").expect("translation failed");

    assert!(asm.contains("@LCL\nD=M\n@frame\nM=D"));
    assert!(asm.contains("@5\nA=D-A\nD=M\n@retAddr\nM=D"));
    assert!(asm.contains("@SP\nAM=M-1\nD=M\n@ARG\nA=M\nM=D"));
    assert!(asm.contains("@ARG\nD=M+1\n@SP\nM=D"));
    assert!(asm.contains("@frame\nAM=M-1\nD=M\n@THAT\nM=D"));
    assert!(asm.contains("@frame\nAM=M-1\nD=M\n@THIS\nM=D"));
    assert!(asm.contains("@frame\nAM=M-1\nD=M\n@ARG\nM=D"));
    assert!(asm.contains("@frame\nAM=M-1\nD=M\n@LCL\nM=D"));
    assert!(asm.contains("@retAddr\nA=M\n0;JMP"));
}

#[test]
fn test_local_variable_initialization() {
    let asm = translate("function Test.main 5\nreturn", "Test").expect("translation failed");

    let init_count = asm.matches("M=0\n@SP\nM=M+1").count();
    assert_eq!(init_count, 5, "should initialize 5 local variables");
}

#[test]
fn test_return_label_counter_across_functions() {
    let vm_code = "function Class.first 0\n\
                   call Class.second 0\n\
                   return\n\
                   function Class.second 0\n\
                   call Class.third 0\n\
                   return\n\
                   function Class.third 0\n\
                   push constant 0\n\
                   return";

    let asm = translate(vm_code, "Class").expect("translation failed");

    // The counter is shared, the prefix follows the enclosing function
    assert!(asm.contains("(Class.first$ret.0)"));
    assert!(asm.contains("(Class.second$ret.1)"));
}

// =============================================================================
// Static Variables
// =============================================================================

#[test]
fn test_static_variable_naming() {
    let asm = translate("push static 0\npush static 5\npush static 10", "MyFile")
        .expect("translation failed");

    assert!(asm.contains("@MyFile.0"));
    assert!(asm.contains("@MyFile.5"));
    assert!(asm.contains("@MyFile.10"));
}

#[test]
fn test_static_isolation_between_units() {
    let u = "function U.set 0\npush constant 1\npop static 3\nreturn";
    let v = "function V.set 0\npush constant 2\npop static 3\nreturn";
    let sys = "function Sys.init 0\nlabel HALT\ngoto HALT";

    let asm = translate_units(&[("Sys", sys), ("U", u), ("V", v)]).expect("translation failed");

    assert!(asm.contains("@U.3"));
    assert!(asm.contains("@V.3"));
}

// =============================================================================
// Bootstrap and Terminator
// =============================================================================

#[test]
fn test_single_unit_has_terminator_no_bootstrap() {
    let asm = translate("push constant 1", "Test").expect("translation failed");

    assert!(asm.ends_with("(END)\n@END\n0;JMP\n"));
    assert!(!asm.contains("Sys.init"));
}

#[test]
fn test_multi_unit_has_bootstrap_no_terminator() {
    let sys = "function Sys.init 0\nlabel HALT\ngoto HALT";
    let asm = translate_units(&[("Sys", sys)]).expect("translation failed");

    assert!(asm.starts_with("@256\nD=A\n@SP\nM=D\n"));
    assert!(asm.contains("@Sys.init\n0;JMP"));
    assert!(asm.contains("($ret.0)"));
    assert!(!asm.contains("(END)"));
}

#[test]
fn test_bootstrap_call_consumes_counter_zero() {
    let sys = "function Sys.init 0\ncall Main.main 0\nlabel HALT\ngoto HALT";
    let main = "function Main.main 0\npush constant 1\nreturn";
    let asm = translate_units(&[("Sys", sys), ("Main", main)]).expect("translation failed");

    assert!(asm.contains("($ret.0)"));
    assert!(asm.contains("(Sys.init$ret.1)"));
}

// =============================================================================
// Directory Mode
// =============================================================================

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("vm_translator_{}_{}", name, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_translate_directory_skips_illegal_names() {
    let dir = scratch_dir("skip");
    std::fs::write(dir.join("Sys.vm"), "function Sys.init 0\nlabel HALT\ngoto HALT").unwrap();
    std::fs::write(dir.join("Main.vm"), "function Main.main 0\npush constant 1\nreturn").unwrap();
    std::fs::write(dir.join("lower.vm"), "push constant 1").unwrap();

    let output = translate_directory(&dir).expect("translation failed");

    assert!(output.asm.starts_with("@256"));
    assert!(output.asm.contains("(Sys.init)"));
    assert!(output.asm.contains("(Main.main)"));
    assert_eq!(output.skipped.len(), 1);
    assert!(matches!(
        output.skipped[0],
        TranslateError::LowercaseUnitName { .. }
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_translate_directory_without_vm_files() {
    let dir = scratch_dir("empty");
    std::fs::write(dir.join("README.md"), "nothing to translate").unwrap();

    assert!(matches!(
        translate_directory(&dir),
        Err(TranslateError::NoVmFiles { .. })
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_translate_directory_missing_path() {
    let missing = Path::new("/nonexistent/vm_translator_missing");
    assert!(matches!(
        translate_directory(missing),
        Err(TranslateError::FileRead { .. })
    ));
}
