use std::io;
use thiserror::Error;

/// Error type for decode failures.
///
/// Every variant carries the absolute byte offset in the input where the
/// problem was detected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {offset}: needed {needed} byte(s), {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("framing error at offset {offset}: expected byte {expected}, found {found}")]
    Framing { offset: usize, expected: u8, found: u8 },

    #[error("function block at offset {offset} (size {size}) does not end with FN_END, found {found}")]
    MissingFunctionEnd { offset: usize, size: usize, found: u8 },

    #[error("function block at offset {offset} has size 0")]
    EmptyFunctionBlock { offset: usize },

    #[error("unknown opcode {opcode} at offset {offset}")]
    UnknownOpcode { offset: usize, opcode: u8 },

    #[error("unknown literal tag {tag} at offset {offset}")]
    UnknownLiteralTag { offset: usize, tag: u8 },

    #[error("function nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

impl DecodeError {
    /// True for the errors raised when a sentinel or a function-end marker is
    /// not where the framing says it should be.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            DecodeError::Framing { .. }
                | DecodeError::MissingFunctionEnd { .. }
                | DecodeError::EmptyFunctionBlock { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result type for disassembler operations
pub type Result<T> = std::result::Result<T, Error>;
