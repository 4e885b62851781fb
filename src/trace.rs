//! Decode events and the sink they are reported to.
//!
//! The decoder reports every record as soon as it is decoded, so a sink has
//! everything up to the point where a decode error stopped the run.

use crate::literal::Literal;
use crate::program::Header;
use crate::section::Instruction;

/// A decoded record, borrowed for the duration of the callback.
#[derive(Debug, Clone, Copy)]
pub enum Event<'r> {
    /// Length of the input buffer.
    ProgramSize(usize),
    Header(&'r Header<'r>),
    /// Start of a literal section declaring `count` entries.
    PoolStart { offset: usize, count: u16 },
    Literal {
        offset: usize,
        index: usize,
        literal: &'r Literal<'r>,
    },
    /// A tag outside the table was skipped.
    UnknownLiteral { offset: usize, tag: u8 },
    /// Function count and size trailer after the first sentinel.
    FunctionTable {
        offset: usize,
        count: u16,
        total_size: u16,
    },
    /// Size prefix of one function block.
    FunctionSize { offset: usize, size: usize },
    /// The body of the function literal at `literal_index` follows, one level deeper.
    FunctionStart { offset: usize, literal_index: usize },
    FunctionEnd { offset: usize },
    /// Closing sentinel of a literal section.
    SectionEnd { offset: usize },
    Instruction(&'r Instruction<'r>),
}

/// Receives decode events along with the nesting depth they belong to.
pub trait TraceSink {
    fn event(&mut self, depth: usize, event: Event<'_>);
}

/// Discards everything, for callers that only want the decoded tree.
impl TraceSink for () {
    fn event(&mut self, _depth: usize, _event: Event<'_>) {}
}
