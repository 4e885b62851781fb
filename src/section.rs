//! Instruction streams and the per-scope decode frame.

use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::literal::{LiteralDecoder, LiteralSection};
use crate::opcode::{OpcodeTable, OperandKind};
use crate::options::{DecodeOptions, UnknownPolicy};
use crate::trace::{Event, TraceSink};

/// A decoded operand value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operand<'a> {
    Byte(u8),
    Word(u16),
    Int(i32),
    Float(f32),
    Str(Cow<'a, str>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction<'a> {
    /// Absolute offset of the opcode byte.
    pub offset: usize,
    pub opcode: u8,
    pub mnemonic: &'static str,
    /// False when the opcode is outside the table and was decoded without operands.
    pub known: bool,
    pub operands: Vec<Operand<'a>>,
    /// Bytes consumed, opcode included.
    pub size: usize,
}

/// One decode frame: a literal section followed by an instruction stream that
/// runs to the end of the frame's range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<'a> {
    /// 0 for the program itself, +1 for every enclosing function literal.
    pub depth: usize,
    pub start: usize,
    pub end: usize,
    pub literals: LiteralSection<'a>,
    pub instructions: Vec<Instruction<'a>>,
}

/// Lazily decodes instructions until the cursor's range is exhausted.
///
/// Yields at most one error, after which the iterator is finished.
pub struct SectionDisassembler<'c, 'a> {
    cursor: &'c mut ByteCursor<'a>,
    unknown: UnknownPolicy,
    failed: bool,
}

impl<'c, 'a> SectionDisassembler<'c, 'a> {
    pub fn new(cursor: &'c mut ByteCursor<'a>, unknown: UnknownPolicy) -> Self {
        Self {
            cursor,
            unknown,
            failed: false,
        }
    }

    fn decode_one(&mut self) -> Result<Instruction<'a>, DecodeError> {
        let offset = self.cursor.offset();
        let opcode = self.cursor.read_u8()?;

        let Some(info) = OpcodeTable::lookup(opcode) else {
            if self.unknown == UnknownPolicy::Abort {
                return Err(DecodeError::UnknownOpcode { offset, opcode });
            }
            warn!(offset, opcode, "unknown opcode, continuing at the next byte");
            return Ok(Instruction {
                offset,
                opcode,
                mnemonic: OpcodeTable::describe(opcode).mnemonic,
                known: false,
                operands: Vec::new(),
                size: 1,
            });
        };

        let mut operands = Vec::with_capacity(info.operands.len());
        for &kind in info.operands {
            operands.push(read_operand(self.cursor, kind)?);
        }

        Ok(Instruction {
            offset,
            opcode,
            mnemonic: info.mnemonic,
            known: true,
            operands,
            size: self.cursor.offset() - offset,
        })
    }
}

impl<'c, 'a> Iterator for SectionDisassembler<'c, 'a> {
    type Item = Result<Instruction<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_at_end() {
            return None;
        }
        let result = self.decode_one();
        self.failed = result.is_err();
        Some(result)
    }
}

fn read_operand<'a>(cursor: &mut ByteCursor<'a>, kind: OperandKind) -> Result<Operand<'a>, DecodeError> {
    Ok(match kind {
        OperandKind::Byte => Operand::Byte(cursor.read_u8()?),
        OperandKind::Word => Operand::Word(cursor.read_u16_le()?),
        OperandKind::Int => Operand::Int(cursor.read_i32_le()?),
        OperandKind::Float => Operand::Float(cursor.read_f32_le()?),
        OperandKind::String => Operand::Str(cursor.read_cstr()?),
    })
}

/// Decode a literal section and the instruction stream after it, up to the
/// end of `cursor`'s range.
pub fn decode_section<'a>(
    cursor: &mut ByteCursor<'a>,
    depth: usize,
    options: &DecodeOptions,
    sink: &mut dyn TraceSink,
) -> Result<Section<'a>, DecodeError> {
    if depth > options.max_depth {
        return Err(DecodeError::DepthExceeded {
            limit: options.max_depth,
        });
    }

    let start = cursor.offset();
    let literals = LiteralDecoder::new(*options, &mut *sink, depth).decode(cursor)?;

    debug!(offset = cursor.offset(), end = cursor.end_offset(), depth, "reading instructions");
    let mut instructions = Vec::new();
    for instruction in SectionDisassembler::new(cursor, options.unknown) {
        let instruction = instruction?;
        sink.event(depth, Event::Instruction(&instruction));
        instructions.push(instruction);
    }

    Ok(Section {
        depth,
        start,
        end: cursor.end_offset(),
        literals,
        instructions,
    })
}
