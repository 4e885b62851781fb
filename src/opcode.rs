//! Opcode registry: mnemonic and operand schema for every opcode value.

use serde::Serialize;

use crate::constants::opcode;

/// Encoding of a single operand following an opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandKind {
    /// 1 byte
    Byte,
    /// 2 bytes, little-endian
    Word,
    /// 4 bytes, little-endian, signed
    Int,
    /// 4 bytes, little-endian IEEE-754
    Float,
    /// NUL-terminated
    String,
}

impl OperandKind {
    /// Encoded width, `None` for variable-width strings.
    pub fn width(self) -> Option<usize> {
        match self {
            OperandKind::Byte => Some(1),
            OperandKind::Word => Some(2),
            OperandKind::Int | OperandKind::Float => Some(4),
            OperandKind::String => None,
        }
    }
}

/// Mnemonic and operand layout of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub operands: &'static [OperandKind],
}

impl OpcodeInfo {
    const fn new(mnemonic: &'static str, operands: &'static [OperandKind]) -> Self {
        Self { mnemonic, operands }
    }
}

const NONE: &[OperandKind] = &[];
const BYTE: &[OperandKind] = &[OperandKind::Byte];
const WORD: &[OperandKind] = &[OperandKind::Word];
const BYTE_BYTE: &[OperandKind] = &[OperandKind::Byte, OperandKind::Byte];
const WORD_WORD: &[OperandKind] = &[OperandKind::Word, OperandKind::Word];

/// Placeholder returned for opcodes outside the table.
pub const UNKNOWN: OpcodeInfo = OpcodeInfo::new("(unknown)", NONE);

/// Placeholder returned for the section-end sentinel when it appears in a stream.
pub const SECTION_END: OpcodeInfo = OpcodeInfo::new("SECTION_END", NONE);

static OPCODES: [OpcodeInfo; opcode::COUNT as usize] = [
    OpcodeInfo::new("EOF", NONE),
    OpcodeInfo::new("PASS", NONE),
    OpcodeInfo::new("ASSERT", NONE),
    OpcodeInfo::new("PRINT", NONE),
    OpcodeInfo::new("LITERAL", BYTE),
    OpcodeInfo::new("LITERAL_LONG", WORD),
    OpcodeInfo::new("LITERAL_RAW", NONE),
    OpcodeInfo::new("NEGATE", NONE),
    OpcodeInfo::new("ADDITION", NONE),
    OpcodeInfo::new("SUBTRACTION", NONE),
    OpcodeInfo::new("MULTIPLICATION", NONE),
    OpcodeInfo::new("DIVISION", NONE),
    OpcodeInfo::new("MODULO", NONE),
    OpcodeInfo::new("GROUPING_BEGIN", NONE),
    OpcodeInfo::new("GROUPING_END", NONE),
    OpcodeInfo::new("SCOPE_BEGIN", NONE),
    OpcodeInfo::new("SCOPE_END", NONE),
    OpcodeInfo::new("TYPE_DECL_removed", NONE),
    OpcodeInfo::new("TYPE_DECL_LONG_removed", NONE),
    OpcodeInfo::new("VAR_DECL", BYTE_BYTE),
    OpcodeInfo::new("VAR_DECL_LONG", WORD_WORD),
    OpcodeInfo::new("FN_DECL", BYTE_BYTE),
    OpcodeInfo::new("FN_DECL_LONG", WORD_WORD),
    OpcodeInfo::new("VAR_ASSIGN", NONE),
    OpcodeInfo::new("VAR_ADDITION_ASSIGN", NONE),
    OpcodeInfo::new("VAR_SUBTRACTION_ASSIGN", NONE),
    OpcodeInfo::new("VAR_MULTIPLICATION_ASSIGN", NONE),
    OpcodeInfo::new("VAR_DIVISION_ASSIGN", NONE),
    OpcodeInfo::new("VAR_MODULO_ASSIGN", NONE),
    OpcodeInfo::new("TYPE_CAST", NONE),
    OpcodeInfo::new("TYPE_OF", NONE),
    OpcodeInfo::new("IMPORT", NONE),
    OpcodeInfo::new("EXPORT_removed", NONE),
    OpcodeInfo::new("INDEX", NONE),
    OpcodeInfo::new("INDEX_ASSIGN", BYTE),
    OpcodeInfo::new("INDEX_ASSIGN_INTERMEDIATE", NONE),
    OpcodeInfo::new("DOT", NONE),
    OpcodeInfo::new("COMPARE_EQUAL", NONE),
    OpcodeInfo::new("COMPARE_NOT_EQUAL", NONE),
    OpcodeInfo::new("COMPARE_LESS", NONE),
    OpcodeInfo::new("COMPARE_LESS_EQUAL", NONE),
    OpcodeInfo::new("COMPARE_GREATER", NONE),
    OpcodeInfo::new("COMPARE_GREATER_EQUAL", NONE),
    OpcodeInfo::new("INVERT", NONE),
    OpcodeInfo::new("AND", WORD),
    OpcodeInfo::new("OR", WORD),
    OpcodeInfo::new("JUMP", WORD),
    OpcodeInfo::new("IF_FALSE_JUMP", WORD),
    OpcodeInfo::new("FN_CALL", NONE),
    OpcodeInfo::new("FN_RETURN", NONE),
    OpcodeInfo::new("POP_STACK", NONE),
    OpcodeInfo::new("TERNARY", NONE),
    OpcodeInfo::new("FN_END", NONE),
];

/// Read-only view of the opcode registry.
pub struct OpcodeTable;

impl OpcodeTable {
    /// Registry entry for `op`, `None` if the value is not a defined opcode.
    pub fn lookup(op: u8) -> Option<&'static OpcodeInfo> {
        OPCODES.get(op as usize)
    }

    /// Like [`OpcodeTable::lookup`], but unknown values map to a placeholder
    /// with an empty schema.
    pub fn describe(op: u8) -> &'static OpcodeInfo {
        match Self::lookup(op) {
            Some(info) => info,
            None if op == opcode::SECTION_END => &SECTION_END,
            None => &UNKNOWN,
        }
    }

    pub fn is_known(op: u8) -> bool {
        op < opcode::COUNT
    }

    /// All defined opcodes with their values, in table order.
    pub fn iter() -> impl Iterator<Item = (u8, &'static OpcodeInfo)> {
        OPCODES.iter().enumerate().map(|(op, info)| (op as u8, info))
    }
}
