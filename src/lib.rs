//! Disassembler for Toy bytecode.
//!
//! A bytecode file is a header followed by the root scope: a literal section
//! (whose function table holds nested scopes of the same shape) and an
//! instruction stream running to the end of the file. [`disassemble`] decodes
//! all of it into a [`Disassembly`] tree while reporting every record to a
//! [`TraceSink`]; [`TextFormatter`] is the sink that produces the text trace.

pub mod constants;
pub mod cursor;
pub mod error;
pub mod format;
pub mod literal;
pub mod opcode;
pub mod options;
pub mod program;
pub mod section;
pub mod trace;

pub use cursor::ByteCursor;
pub use error::{DecodeError, Error, Result};
pub use format::TextFormatter;
pub use literal::{FunctionBlock, Literal, LiteralDecoder, LiteralPool, LiteralSection, TypeLiteral};
pub use opcode::{OpcodeInfo, OpcodeTable, OperandKind};
pub use options::{DecodeOptions, UnknownPolicy};
pub use program::{disassemble, Disassembly, Header, Program};
pub use section::{decode_section, Instruction, Operand, Section, SectionDisassembler};
pub use trace::{Event, TraceSink};
