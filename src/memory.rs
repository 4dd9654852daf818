//! Memory segment resolution.
//!
//! Maps VM segments onto the Hack RAM layout: indirect segments address
//! through a base pointer, temp occupies RAM[5..=12], pointer aliases the
//! THIS/THAT registers, and statics become per-unit assembler symbols.

use crate::parser::Segment;

/// How a segment's effective address is resolved during code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAccess {
    /// Immediate value, no backing storage.
    Constant,
    /// Base-pointer symbol plus index (LCL, ARG, THIS, THAT).
    Indirect(&'static str),
    /// Fixed RAM address 5 + index.
    Temp,
    /// THIS (index 0) or THAT (index 1).
    Pointer,
    /// Unit-prefixed assembler symbol.
    Static,
}

/// Classify a segment by access mode.
pub fn segment_access(segment: Segment) -> SegmentAccess {
    match segment {
        Segment::Constant => SegmentAccess::Constant,
        Segment::Local => SegmentAccess::Indirect("LCL"),
        Segment::Argument => SegmentAccess::Indirect("ARG"),
        Segment::This => SegmentAccess::Indirect("THIS"),
        Segment::That => SegmentAccess::Indirect("THAT"),
        Segment::Temp => SegmentAccess::Temp,
        Segment::Pointer => SegmentAccess::Pointer,
        Segment::Static => SegmentAccess::Static,
    }
}

/// RAM address for `temp i`.
#[inline]
pub fn temp_address(index: u16) -> u16 {
    5 + index
}

/// Register symbol for `pointer i`.
#[inline]
pub fn pointer_symbol(index: u16) -> &'static str {
    if index == 0 { "THIS" } else { "THAT" }
}
