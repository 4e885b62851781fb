//! Literal-pool decoding.
//!
//! A literal section has the layout
//!
//! - `count` (2 bytes)
//! - `count` tagged entries (see `constants::literal_tag`)
//! - section end (1 byte, `0xFF`)
//! - function count (2 bytes) and total function size (2 bytes)
//! - for every function literal in the pool, in pool order:
//!   - block size (2 bytes)
//!   - block contents: a nested literal section followed by the function's
//!     instruction stream, the last byte being `FN_END`
//! - section end (1 byte, `0xFF`)

use std::borrow::Cow;
use std::ops::Index;

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::{literal_tag, opcode};
use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::options::{DecodeOptions, UnknownPolicy};
use crate::section::{decode_section, Section};
use crate::trace::{Event, TraceSink};

/// A decoded literal pool entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal<'a> {
    Null,
    Boolean(bool),
    Integer(i32),
    Float(f32),
    String(Cow<'a, str>),
    Identifier(Cow<'a, str>),
    /// Pool indices of the elements.
    Array(Vec<u16>),
    /// Pool indices of the `(key, value)` pairs.
    Dictionary(Vec<(u16, u16)>),
    /// A function whose body lives in the function table after the pool.
    FunctionIntermediate(u16),
    Type(TypeLiteral),
    IndexBlank,
}

/// Payload of a type literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeLiteral {
    /// Literal tag of the described type.
    pub element: u8,
    pub constant: bool,
    /// Value type for arrays, key and value types for dictionaries.
    pub subtypes: Vec<u16>,
}

impl TypeLiteral {
    pub fn element_name(&self) -> &'static str {
        literal_tag::name(self.element).unwrap_or("UNKNOWN")
    }
}

/// Ordered literal entries of one scope, indexed in decode order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LiteralPool<'a> {
    entries: Vec<Literal<'a>>,
}

impl<'a> LiteralPool<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append `literal` and return its index.
    pub fn push(&mut self, literal: Literal<'a>) -> usize {
        self.entries.push(literal);
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Literal<'a>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Literal<'a>> {
        self.entries.iter()
    }

    /// Indices of the function literals, in pool order.
    pub fn function_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, literal)| matches!(literal, Literal::FunctionIntermediate(_)))
            .map(|(index, _)| index)
            .collect()
    }
}

impl<'a> Index<usize> for LiteralPool<'a> {
    type Output = Literal<'a>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

/// Body of a function literal, resolved from the function table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionBlock<'a> {
    /// Index of the function literal in the enclosing pool.
    pub literal_index: usize,
    /// Absolute offset of the first byte of the block.
    pub start: usize,
    /// Absolute offset one past the last byte (the `FN_END`).
    pub end: usize,
    pub body: Section<'a>,
}

/// Everything a literal section contains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteralSection<'a> {
    pub pool: LiteralPool<'a>,
    /// Declared function count. Informational, the pool decides what is read.
    pub function_count: u16,
    /// Declared total size of the function table. Informational.
    pub total_size: u16,
    pub functions: Vec<FunctionBlock<'a>>,
}

/// Decodes one literal section, recursing into function bodies.
pub struct LiteralDecoder<'s> {
    options: DecodeOptions,
    sink: &'s mut dyn TraceSink,
    depth: usize,
}

impl<'s> LiteralDecoder<'s> {
    pub fn new(options: DecodeOptions, sink: &'s mut dyn TraceSink, depth: usize) -> Self {
        Self {
            options,
            sink,
            depth,
        }
    }

    /// Decode the section at the cursor, leaving the cursor just past its
    /// closing sentinel.
    pub fn decode<'a>(&mut self, cursor: &mut ByteCursor<'a>) -> Result<LiteralSection<'a>, DecodeError> {
        let offset = cursor.offset();
        let count = cursor.read_u16_le()?;
        debug!(offset, count, depth = self.depth, "reading literal section");
        self.sink.event(self.depth, Event::PoolStart { offset, count });

        let mut pool = LiteralPool::with_capacity(count as usize);
        for _ in 0..count {
            self.decode_entry(cursor, &mut pool)?;
        }
        cursor.expect(opcode::SECTION_END)?;

        let offset = cursor.offset();
        let function_count = cursor.read_u16_le()?;
        let total_size = cursor.read_u16_le()?;
        self.sink.event(
            self.depth,
            Event::FunctionTable {
                offset,
                count: function_count,
                total_size,
            },
        );

        let function_indices = pool.function_indices();
        if function_indices.len() != function_count as usize {
            warn!(
                offset,
                declared = function_count,
                found = function_indices.len(),
                "function count does not match the function literals in the pool"
            );
        }

        let mut functions = Vec::with_capacity(function_indices.len());
        for literal_index in function_indices {
            functions.push(self.decode_function(cursor, literal_index)?);
        }

        cursor.expect(opcode::SECTION_END)?;
        self.sink.event(
            self.depth,
            Event::SectionEnd {
                offset: cursor.offset(),
            },
        );

        Ok(LiteralSection {
            pool,
            function_count,
            total_size,
            functions,
        })
    }

    fn decode_entry<'a>(
        &mut self,
        cursor: &mut ByteCursor<'a>,
        pool: &mut LiteralPool<'a>,
    ) -> Result<(), DecodeError> {
        let offset = cursor.offset();
        let tag = cursor.read_u8()?;

        let literal = match tag {
            literal_tag::NULL => Literal::Null,
            literal_tag::BOOLEAN => Literal::Boolean(cursor.read_u8()? != 0),
            literal_tag::INTEGER => Literal::Integer(cursor.read_i32_le()?),
            literal_tag::FLOAT => Literal::Float(cursor.read_f32_le()?),
            literal_tag::STRING => Literal::String(cursor.read_cstr()?),
            literal_tag::IDENTIFIER => Literal::Identifier(cursor.read_cstr()?),
            literal_tag::ARRAY | literal_tag::ARRAY_INTERMEDIATE => {
                let length = cursor.read_u16_le()?;
                let mut elements = Vec::with_capacity(length as usize);
                for _ in 0..length {
                    elements.push(cursor.read_u16_le()?);
                }
                check_references(offset, pool.len(), elements.iter().copied());

                // one slot per element keeps later indices aligned with the compiler's pool
                for _ in 0..length {
                    pool.push(Literal::Null);
                }
                Literal::Array(elements)
            }
            literal_tag::DICTIONARY | literal_tag::DICTIONARY_INTERMEDIATE => {
                // length counts keys and values together
                let length = cursor.read_u16_le()?;
                let mut entries = Vec::with_capacity(length as usize / 2);
                for _ in 0..length / 2 {
                    let key = cursor.read_u16_le()?;
                    let value = cursor.read_u16_le()?;
                    entries.push((key, value));
                }
                check_references(
                    offset,
                    pool.len(),
                    entries.iter().flat_map(|&(key, value)| [key, value]),
                );
                Literal::Dictionary(entries)
            }
            literal_tag::FUNCTION => Literal::FunctionIntermediate(cursor.read_u16_le()?),
            literal_tag::TYPE | literal_tag::TYPE_INTERMEDIATE => Literal::Type(read_type(cursor)?),
            literal_tag::INDEX_BLANK => Literal::IndexBlank,
            tag => {
                return match self.options.unknown {
                    UnknownPolicy::Abort => Err(DecodeError::UnknownLiteralTag { offset, tag }),
                    UnknownPolicy::Annotate => {
                        warn!(offset, tag, "unknown literal tag, skipping");
                        self.sink.event(self.depth, Event::UnknownLiteral { offset, tag });
                        Ok(())
                    }
                };
            }
        };

        let index = pool.push(literal);
        self.sink.event(
            self.depth,
            Event::Literal {
                offset,
                index,
                literal: &pool[index],
            },
        );
        Ok(())
    }

    fn decode_function<'a>(
        &mut self,
        cursor: &mut ByteCursor<'a>,
        literal_index: usize,
    ) -> Result<FunctionBlock<'a>, DecodeError> {
        let offset = cursor.offset();
        let size = cursor.read_u16_le()? as usize;
        self.sink.event(self.depth, Event::FunctionSize { offset, size });

        let start = cursor.offset();
        if size == 0 {
            return Err(DecodeError::EmptyFunctionBlock { offset: start });
        }

        let mut block = cursor.split_off(size)?;
        let found = block.peek_at(size - 1).unwrap_or_default();
        if found != opcode::FN_END {
            return Err(DecodeError::MissingFunctionEnd {
                offset: start,
                size,
                found,
            });
        }

        debug!(start, size, literal_index, depth = self.depth + 1, "entering function");
        self.sink.event(
            self.depth,
            Event::FunctionStart {
                offset: start,
                literal_index,
            },
        );
        let body = decode_section(&mut block, self.depth + 1, &self.options, &mut *self.sink)?;
        self.sink.event(self.depth, Event::FunctionEnd { offset: start + size });

        // the outer frame moves by the declared size, whatever the body consumed
        cursor.skip(size)?;

        Ok(FunctionBlock {
            literal_index,
            start,
            end: start + size,
            body,
        })
    }
}

fn read_type(cursor: &mut ByteCursor<'_>) -> Result<TypeLiteral, DecodeError> {
    let element = cursor.read_u8()?;
    let constant = cursor.read_u8()? != 0;
    let subtypes = match element {
        literal_tag::ARRAY => vec![cursor.read_u16_le()?],
        literal_tag::DICTIONARY => vec![cursor.read_u16_le()?, cursor.read_u16_le()?],
        _ => Vec::new(),
    };
    Ok(TypeLiteral {
        element,
        constant,
        subtypes,
    })
}

fn check_references(offset: usize, pool_len: usize, indices: impl Iterator<Item = u16>) {
    for index in indices.filter(|&index| index as usize > pool_len) {
        warn!(offset, index, pool_len, "composite literal refers past the end of the pool");
    }
}
