//! Writer for the Toy bytecode format.
//!
//! Produces the same layout the Toy compiler emits, so disassembler tests can
//! describe fixtures as scopes instead of hand-counted byte arrays:
//!
//! - Header: major, minor, patch (1 byte each), build string (NUL-terminated),
//!   section end (`0xFF`)
//! - Scope:
//!   - literal count (2 bytes), tagged literal entries, section end
//!   - function count (2 bytes), total function size (2 bytes)
//!   - per function literal: block size (2 bytes) + nested scope bytes
//!   - section end
//!   - instruction bytes
//!
//! All multi-byte values are little-endian.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use thiserror::Error;
use toy_disasm::constants::{literal_tag, opcode};

/// Error type for encoding failures
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Too many literals for a 16-bit count: {0}")]
    TooManyLiterals(usize),

    #[error("Function block too large for a 16-bit size: {0}")]
    BlockTooLarge(usize),
}

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, WriteError>;

/// A literal pool entry as it is written to the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralEntry {
    Null,
    Boolean(bool),
    Integer(i32),
    Float(f32),
    String(String),
    Identifier(String),
    Array(Vec<u16>),
    /// Written with the intermediate tag the compiler uses for nested arrays.
    ArrayIntermediate(Vec<u16>),
    Dictionary(Vec<(u16, u16)>),
    Function(u16),
    Type {
        element: u8,
        constant: bool,
        subtypes: Vec<u16>,
    },
    IndexBlank,
    /// Written verbatim, tag byte included.
    Raw(Vec<u8>),
}

/// One scope: a literal pool, its function bodies and its instructions.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    literals: Vec<LiteralEntry>,
    functions: Vec<Vec<u8>>,
    function_count: Option<u16>,
    total_size: Option<u16>,
    code: Vec<u8>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn literal(mut self, entry: LiteralEntry) -> Self {
        self.literals.push(entry);
        self
    }

    /// Add a function literal whose body is `body`.
    pub fn function(self, body: Scope) -> Result<Self> {
        let bytes = body.encode()?;
        Ok(self.function_bytes(bytes))
    }

    /// Add a function literal with an already encoded (possibly malformed) body.
    pub fn function_bytes(mut self, body: Vec<u8>) -> Self {
        let index = self.functions.len() as u16;
        self.literals.push(LiteralEntry::Function(index));
        self.functions.push(body);
        self
    }

    /// Override the declared function count.
    pub fn with_function_count(mut self, count: u16) -> Self {
        self.function_count = Some(count);
        self
    }

    /// Override the declared total function size.
    pub fn with_total_size(mut self, size: u16) -> Self {
        self.total_size = Some(size);
        self
    }

    pub fn op(mut self, op: u8) -> Self {
        self.code.push(op);
        self
    }

    pub fn op_byte(mut self, op: u8, operand: u8) -> Self {
        self.code.extend_from_slice(&[op, operand]);
        self
    }

    pub fn op_word(mut self, op: u8, operand: u16) -> Self {
        self.code.push(op);
        self.code.extend_from_slice(&operand.to_le_bytes());
        self
    }

    pub fn op_bytes(mut self, op: u8, first: u8, second: u8) -> Self {
        self.code.extend_from_slice(&[op, first, second]);
        self
    }

    pub fn op_words(mut self, op: u8, first: u16, second: u16) -> Self {
        self.code.push(op);
        self.code.extend_from_slice(&first.to_le_bytes());
        self.code.extend_from_slice(&second.to_le_bytes());
        self
    }

    /// Append raw instruction bytes.
    pub fn code(mut self, bytes: &[u8]) -> Self {
        self.code.extend_from_slice(bytes);
        self
    }

    /// Terminate the instruction stream of a function body.
    pub fn end_function(self) -> Self {
        self.op(opcode::FN_END)
    }

    /// Encode the scope on its own, as it appears inside a function block.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut x: Vec<u8> = Vec::new();
        self.write_to(&mut x)?;
        Ok(x)
    }

    pub fn write_to<W: Write>(&self, x: &mut W) -> Result<()> {
        let count = u16::try_from(self.literals.len())
            .map_err(|_| WriteError::TooManyLiterals(self.literals.len()))?;
        x.write_u16::<LittleEndian>(count)?;
        for entry in &self.literals {
            write_literal(x, entry)?;
        }
        x.write_u8(opcode::SECTION_END)?;

        let computed_size: usize = self.functions.iter().map(|body| body.len() + 2).sum();
        let total_size = match self.total_size {
            Some(size) => size,
            None => u16::try_from(computed_size).map_err(|_| WriteError::BlockTooLarge(computed_size))?,
        };
        let function_count = self
            .function_count
            .unwrap_or(self.functions.len() as u16);
        x.write_u16::<LittleEndian>(function_count)?;
        x.write_u16::<LittleEndian>(total_size)?;

        for body in &self.functions {
            let size = u16::try_from(body.len()).map_err(|_| WriteError::BlockTooLarge(body.len()))?;
            x.write_u16::<LittleEndian>(size)?;
            x.write_all(body)?;
        }
        x.write_u8(opcode::SECTION_END)?;

        x.write_all(&self.code)?;
        Ok(())
    }
}

fn write_literal<W: Write>(x: &mut W, entry: &LiteralEntry) -> Result<()> {
    match entry {
        LiteralEntry::Null => x.write_u8(literal_tag::NULL)?,
        LiteralEntry::Boolean(value) => {
            x.write_u8(literal_tag::BOOLEAN)?;
            x.write_u8(u8::from(*value))?;
        }
        LiteralEntry::Integer(value) => {
            x.write_u8(literal_tag::INTEGER)?;
            x.write_i32::<LittleEndian>(*value)?;
        }
        LiteralEntry::Float(value) => {
            x.write_u8(literal_tag::FLOAT)?;
            x.write_f32::<LittleEndian>(*value)?;
        }
        LiteralEntry::String(value) => {
            x.write_u8(literal_tag::STRING)?;
            write_cstr(x, value)?;
        }
        LiteralEntry::Identifier(name) => {
            x.write_u8(literal_tag::IDENTIFIER)?;
            write_cstr(x, name)?;
        }
        LiteralEntry::Array(elements) => write_array(x, literal_tag::ARRAY, elements)?,
        LiteralEntry::ArrayIntermediate(elements) => {
            write_array(x, literal_tag::ARRAY_INTERMEDIATE, elements)?
        }
        LiteralEntry::Dictionary(entries) => {
            x.write_u8(literal_tag::DICTIONARY)?;
            // keys and values are counted together
            x.write_u16::<LittleEndian>((entries.len() * 2) as u16)?;
            for (key, value) in entries {
                x.write_u16::<LittleEndian>(*key)?;
                x.write_u16::<LittleEndian>(*value)?;
            }
        }
        LiteralEntry::Function(index) => {
            x.write_u8(literal_tag::FUNCTION)?;
            x.write_u16::<LittleEndian>(*index)?;
        }
        LiteralEntry::Type {
            element,
            constant,
            subtypes,
        } => {
            x.write_u8(literal_tag::TYPE)?;
            x.write_u8(*element)?;
            x.write_u8(u8::from(*constant))?;
            for subtype in subtypes {
                x.write_u16::<LittleEndian>(*subtype)?;
            }
        }
        LiteralEntry::IndexBlank => x.write_u8(literal_tag::INDEX_BLANK)?,
        LiteralEntry::Raw(bytes) => x.write_all(bytes)?,
    }
    Ok(())
}

fn write_array<W: Write>(x: &mut W, tag: u8, elements: &[u16]) -> Result<()> {
    x.write_u8(tag)?;
    x.write_u16::<LittleEndian>(elements.len() as u16)?;
    for element in elements {
        x.write_u16::<LittleEndian>(*element)?;
    }
    Ok(())
}

fn write_cstr<W: Write>(x: &mut W, text: &str) -> Result<()> {
    x.write_all(text.as_bytes())?;
    x.write_u8(0)?;
    Ok(())
}

/// Write the header block.
pub fn write_header<W: Write>(x: &mut W, version: (u8, u8, u8), build: &str) -> Result<()> {
    x.write_u8(version.0)?;
    x.write_u8(version.1)?;
    x.write_u8(version.2)?;
    write_cstr(x, build)?;
    x.write_u8(opcode::SECTION_END)?;
    Ok(())
}

/// Encode a whole program: header followed by the root scope.
pub fn encode_program(version: (u8, u8, u8), build: &str, root: &Scope) -> Result<Vec<u8>> {
    let mut x: Vec<u8> = Vec::new();
    write_header(&mut x, version, build)?;
    root.write_to(&mut x)?;
    Ok(x)
}
