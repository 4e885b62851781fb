//! Text rendering of decode events.

use crate::literal::Literal;
use crate::section::{Instruction, Operand};
use crate::trace::{Event, TraceSink};

/// Spaces of indentation per nesting level.
pub const INDENT_WIDTH: usize = 4;

const SECTION_RULE: &str = "-------------------------";

/// Renders every event as one line of text, indented by nesting depth.
#[derive(Debug, Default, Clone)]
pub struct TextFormatter {
    out: String,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl TraceSink for TextFormatter {
    fn event(&mut self, depth: usize, event: Event<'_>) {
        self.out.push_str(&" ".repeat(depth * INDENT_WIDTH));
        self.out.push_str(&render_event(&event));
        self.out.push('\n');
    }
}

/// Render a single event without indentation.
pub fn render_event(event: &Event<'_>) -> String {
    match *event {
        Event::ProgramSize(len) => format!("File size: {len}"),
        Event::Header(header) => format!(
            "[Version: {}.{}.{} ({})]",
            header.major, header.minor, header.patch, header.build
        ),
        Event::PoolStart { count, .. } => format!("-- Reading {count} literals --"),
        Event::Literal {
            offset,
            index,
            literal,
        } => format!("[ {offset:05} ] #{index} {}", render_literal(literal)),
        Event::UnknownLiteral { offset, tag } => {
            format!("[ {offset:05} ] (unknown literal tag {tag})")
        }
        Event::FunctionTable {
            count, total_size, ..
        } => format!("(fun count: {count}, size: {total_size})"),
        Event::FunctionSize { offset, size } => format!("[ {offset:05} ] (size: {size})"),
        Event::FunctionStart { literal_index, .. } => format!("[ start fun #{literal_index} >>"),
        Event::FunctionEnd { .. } => "<< end fun ]".to_string(),
        Event::SectionEnd { .. } => SECTION_RULE.to_string(),
        Event::Instruction(instruction) => render_instruction(instruction),
    }
}

pub fn render_literal(literal: &Literal<'_>) -> String {
    match literal {
        Literal::Null => "(null)".to_string(),
        Literal::Boolean(value) => format!("(boolean {value})"),
        Literal::Integer(value) => format!("(integer {value})"),
        Literal::Float(value) => format!("(float {value:.6})"),
        Literal::String(value) => format!("(string \"{value}\")"),
        Literal::Identifier(name) => format!("(identifier {name})"),
        Literal::Array(elements) => {
            let elements: String = elements.iter().map(|index| format!("{index}, ")).collect();
            format!("(array {elements})")
        }
        Literal::Dictionary(entries) => {
            let entries: String = entries
                .iter()
                .map(|(key, value)| format!("(key: {key}, val: {value}) "))
                .collect();
            format!("(dictionary {entries})")
        }
        Literal::FunctionIntermediate(index) => format!("(function index: {index})"),
        Literal::Type(ty) => {
            let constant = u8::from(ty.constant);
            match ty.subtypes.as_slice() {
                [value] => format!(
                    "(type {}: constant = {constant}, value type: {value})",
                    ty.element_name()
                ),
                [key, value] => format!(
                    "(type {}: constant = {constant}, key type: {key}, value type: {value})",
                    ty.element_name()
                ),
                _ => format!("(type {}: constant = {constant})", ty.element_name()),
            }
        }
        Literal::IndexBlank => "(blank)".to_string(),
    }
}

pub fn render_instruction(instruction: &Instruction<'_>) -> String {
    let mut line = format!(
        "[ {:05} ]({:03}) {}",
        instruction.offset, instruction.opcode, instruction.mnemonic
    );
    for operand in &instruction.operands {
        line.push(' ');
        line.push_str(&render_operand(operand));
    }
    line
}

pub fn render_operand(operand: &Operand<'_>) -> String {
    match operand {
        Operand::Byte(value) => format!("byte({value})"),
        Operand::Word(value) => format!("word({value})"),
        Operand::Int(value) => format!("int({value})"),
        Operand::Float(value) => format!("float({value:.6})"),
        Operand::Str(value) => format!("string({value})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::TypeLiteral;
    use crate::program::Header;

    #[test]
    fn test_literal_lines() {
        assert_eq!(render_literal(&Literal::Null), "(null)");
        assert_eq!(render_literal(&Literal::Boolean(true)), "(boolean true)");
        assert_eq!(render_literal(&Literal::Integer(-7)), "(integer -7)");
        assert_eq!(render_literal(&Literal::Float(1.5)), "(float 1.500000)");
        assert_eq!(render_literal(&Literal::String("hi".into())), "(string \"hi\")");
        assert_eq!(render_literal(&Literal::Identifier("x".into())), "(identifier x)");
        assert_eq!(render_literal(&Literal::Array(vec![0, 1])), "(array 0, 1, )");
        assert_eq!(
            render_literal(&Literal::Dictionary(vec![(0, 1)])),
            "(dictionary (key: 0, val: 1) )"
        );
        assert_eq!(
            render_literal(&Literal::FunctionIntermediate(3)),
            "(function index: 3)"
        );
        assert_eq!(render_literal(&Literal::IndexBlank), "(blank)");
    }

    #[test]
    fn test_type_lines() {
        let plain = Literal::Type(TypeLiteral {
            element: 2,
            constant: true,
            subtypes: vec![],
        });
        assert_eq!(render_literal(&plain), "(type INTEGER: constant = 1)");

        let array = Literal::Type(TypeLiteral {
            element: 5,
            constant: false,
            subtypes: vec![4],
        });
        assert_eq!(
            render_literal(&array),
            "(type ARRAY: constant = 0, value type: 4)"
        );

        let unknown = Literal::Type(TypeLiteral {
            element: 99,
            constant: false,
            subtypes: vec![],
        });
        assert_eq!(render_literal(&unknown), "(type UNKNOWN: constant = 0)");
    }

    #[test]
    fn test_instruction_line() {
        let instruction = Instruction {
            offset: 12,
            opcode: 20,
            mnemonic: "VAR_DECL_LONG",
            known: true,
            operands: vec![Operand::Word(1), Operand::Word(300)],
            size: 5,
        };
        assert_eq!(
            render_instruction(&instruction),
            "[ 00012 ](020) VAR_DECL_LONG word(1) word(300)"
        );
        assert_eq!(render_operand(&Operand::Str("s".into())), "string(s)");
        assert_eq!(render_operand(&Operand::Int(-1)), "int(-1)");
        assert_eq!(render_operand(&Operand::Float(0.25)), "float(0.250000)");
    }

    #[test]
    fn test_indentation_follows_depth() {
        let header = Header {
            major: 1,
            minor: 2,
            patch: 3,
            build: "abc".into(),
        };
        let mut formatter = TextFormatter::new();
        formatter.event(0, Event::Header(&header));
        formatter.event(2, Event::FunctionEnd { offset: 0 });

        assert_eq!(
            formatter.as_str(),
            "[Version: 1.2.3 (abc)]\n        << end fun ]\n"
        );
    }
}
