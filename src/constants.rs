/// Opcode values (1 byte)
pub mod opcode {
    pub const EOF: u8 = 0;
    pub const PASS: u8 = 1;
    pub const ASSERT: u8 = 2;
    pub const PRINT: u8 = 3;
    pub const LITERAL: u8 = 4;
    pub const LITERAL_LONG: u8 = 5;
    pub const LITERAL_RAW: u8 = 6;
    pub const NEGATE: u8 = 7;
    pub const ADDITION: u8 = 8;
    pub const SUBTRACTION: u8 = 9;
    pub const MULTIPLICATION: u8 = 10;
    pub const DIVISION: u8 = 11;
    pub const MODULO: u8 = 12;
    pub const GROUPING_BEGIN: u8 = 13;
    pub const GROUPING_END: u8 = 14;
    pub const SCOPE_BEGIN: u8 = 15;
    pub const SCOPE_END: u8 = 16;
    pub const TYPE_DECL_REMOVED: u8 = 17;
    pub const TYPE_DECL_LONG_REMOVED: u8 = 18;
    pub const VAR_DECL: u8 = 19;
    pub const VAR_DECL_LONG: u8 = 20;
    pub const FN_DECL: u8 = 21;
    pub const FN_DECL_LONG: u8 = 22;
    pub const VAR_ASSIGN: u8 = 23;
    pub const VAR_ADDITION_ASSIGN: u8 = 24;
    pub const VAR_SUBTRACTION_ASSIGN: u8 = 25;
    pub const VAR_MULTIPLICATION_ASSIGN: u8 = 26;
    pub const VAR_DIVISION_ASSIGN: u8 = 27;
    pub const VAR_MODULO_ASSIGN: u8 = 28;
    pub const TYPE_CAST: u8 = 29;
    pub const TYPE_OF: u8 = 30;
    pub const IMPORT: u8 = 31;
    pub const EXPORT_REMOVED: u8 = 32;
    pub const INDEX: u8 = 33;
    pub const INDEX_ASSIGN: u8 = 34;
    pub const INDEX_ASSIGN_INTERMEDIATE: u8 = 35;
    pub const DOT: u8 = 36;
    pub const COMPARE_EQUAL: u8 = 37;
    pub const COMPARE_NOT_EQUAL: u8 = 38;
    pub const COMPARE_LESS: u8 = 39;
    pub const COMPARE_LESS_EQUAL: u8 = 40;
    pub const COMPARE_GREATER: u8 = 41;
    pub const COMPARE_GREATER_EQUAL: u8 = 42;
    pub const INVERT: u8 = 43;
    pub const AND: u8 = 44;
    pub const OR: u8 = 45;
    pub const JUMP: u8 = 46;
    pub const IF_FALSE_JUMP: u8 = 47;
    pub const FN_CALL: u8 = 48;
    pub const FN_RETURN: u8 = 49;
    pub const POP_STACK: u8 = 50;
    pub const TERNARY: u8 = 51;
    pub const FN_END: u8 = 52;

    /// Number of defined opcodes; anything at or above this is unknown.
    pub const COUNT: u8 = 53;

    /// Marks the end of the header and of each literal-section trailer.
    pub const SECTION_END: u8 = 255;
}

/// Literal type tags (1 byte)
pub mod literal_tag {
    pub const NULL: u8 = 0;
    pub const BOOLEAN: u8 = 1;
    pub const INTEGER: u8 = 2;
    pub const FLOAT: u8 = 3;
    pub const STRING: u8 = 4;
    pub const ARRAY: u8 = 5;
    pub const DICTIONARY: u8 = 6;
    pub const FUNCTION: u8 = 7;
    pub const IDENTIFIER: u8 = 8;
    pub const TYPE: u8 = 9;
    pub const OPAQUE: u8 = 10;
    pub const ANY: u8 = 11;

    // compiler-side kinds
    pub const TYPE_INTERMEDIATE: u8 = 12;
    pub const ARRAY_INTERMEDIATE: u8 = 13;
    pub const DICTIONARY_INTERMEDIATE: u8 = 14;
    pub const FUNCTION_INTERMEDIATE: u8 = 15;
    pub const FUNCTION_ARG_REST: u8 = 16;
    pub const FUNCTION_NATIVE: u8 = 17;
    pub const FUNCTION_HOOK: u8 = 18;
    pub const INDEX_BLANK: u8 = 19;

    /// Printable name of a literal tag, `None` for values outside the enum.
    pub fn name(tag: u8) -> Option<&'static str> {
        const NAMES: [&str; 20] = [
            "NULL",
            "BOOLEAN",
            "INTEGER",
            "FLOAT",
            "STRING",
            "ARRAY",
            "DICTIONARY",
            "FUNCTION",
            "IDENTIFIER",
            "TYPE",
            "OPAQUE",
            "ANY",
            "TYPE_INTERMEDIATE",
            "ARRAY_INTERMEDIATE",
            "DICTIONARY_INTERMEDIATE",
            "FUNCTION_INTERMEDIATE",
            "FUNCTION_ARG_REST",
            "FUNCTION_NATIVE",
            "FUNCTION_HOOK",
            "INDEX_BLANK",
        ];
        NAMES.get(tag as usize).copied()
    }
}

