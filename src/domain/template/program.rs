//! Parser and executor for the internal action syntax produced by
//! [`normalize`](super::normalize::normalize).
//!
//! The instruction set is closed:
//! - [`Instruction::Text`]: emit a run of source text
//! - [`Instruction::Field`]: emit the value bound to a name (empty if unbound)
//! - [`Instruction::Literal`]: emit a quoted literal verbatim

use std::collections::HashMap;
use std::fmt;

use super::syntax::{is_identifier, CLOSE_DELIM, OPEN_DELIM};
use super::types::{TemplateError, TemplateResult};

/// Source of variable values during execution.
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl Bindings for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Text(String),
    Field(String),
    Literal(String),
}

/// A parsed template ready for execution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Parse normalized text into a program.
    pub fn parse(source: &str) -> TemplateResult<Self> {
        let mut instructions = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN_DELIM) {
            if start > 0 {
                instructions.push(Instruction::Text(rest[..start].to_string()));
            }

            let action_offset = offset + start;
            let body = &rest[start + OPEN_DELIM.len()..];
            let (instruction, consumed) = parse_action(body, action_offset)?;
            instructions.push(instruction);

            let advance = start + OPEN_DELIM.len() + consumed;
            rest = &rest[advance..];
            offset += advance;
        }

        if !rest.is_empty() {
            instructions.push(Instruction::Text(rest.to_string()));
        }

        Ok(Self { instructions })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Names referenced by field instructions, in order of appearance.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Field(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Run the program left to right, writing output into `out`.
    pub fn execute<W, B>(&self, bindings: &B, out: &mut W) -> TemplateResult<()>
    where
        W: fmt::Write,
        B: Bindings + ?Sized,
    {
        for instruction in &self.instructions {
            let piece = match instruction {
                Instruction::Text(text) => text.as_str(),
                Instruction::Field(name) => bindings.lookup(name).unwrap_or(""),
                Instruction::Literal(text) => text.as_str(),
            };
            out.write_str(piece).map_err(|_| {
                TemplateError::RenderFailed("failed to write rendered output".to_string())
            })?;
        }
        Ok(())
    }
}

/// Parse one action body (text right after `{{`).
///
/// Returns the instruction and the number of bytes consumed, including the
/// closing delimiter.
fn parse_action(body: &str, at: usize) -> TemplateResult<(Instruction, usize)> {
    let leading = body.len() - body.trim_start().len();
    let inner = &body[leading..];

    let (instruction, used) = if let Some(field) = inner.strip_prefix('.') {
        let len = field
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(field.len());
        let name = &field[..len];
        if !is_identifier(name) {
            return Err(malformed(at, "invalid field name after '.'"));
        }
        (Instruction::Field(name.to_string()), 1 + len)
    } else if inner.starts_with('"') {
        let (text, len) = parse_quoted(inner, at)?;
        (Instruction::Literal(text), len)
    } else if inner.starts_with(CLOSE_DELIM) {
        return Err(malformed(at, "missing value in action"));
    } else if inner.is_empty() {
        return Err(malformed(at, "unclosed action"));
    } else if inner.starts_with(OPEN_DELIM) {
        return Err(malformed(at, "unexpected '{{' inside action"));
    } else {
        let word: String = inner.chars().take_while(|c| !c.is_whitespace()).take(16).collect();
        return Err(malformed(at, &format!("unexpected \"{}\" in action", word)));
    };

    let after = &inner[used..];
    let trailing = after.len() - after.trim_start().len();
    let tail = &after[trailing..];

    if tail.starts_with(CLOSE_DELIM) {
        Ok((instruction, leading + used + trailing + CLOSE_DELIM.len()))
    } else if tail.is_empty() {
        Err(malformed(at, "unclosed action"))
    } else {
        Err(malformed(at, "expected '}}' to close action"))
    }
}

/// Parse a double-quoted literal starting at `input[0] == '"'`.
fn parse_quoted(input: &str, at: usize) -> TemplateResult<(String, usize)> {
    let mut text = String::new();
    let mut chars = input.char_indices().skip(1);

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((text, idx + 1)),
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| malformed(at, "unterminated quoted string"))?;
                match escaped {
                    '\\' => text.push('\\'),
                    '"' => text.push('"'),
                    '\'' => text.push('\''),
                    'n' => text.push('\n'),
                    'r' => text.push('\r'),
                    't' => text.push('\t'),
                    '0' => text.push('\0'),
                    'u' => {
                        let mut hex = String::new();
                        match chars.next() {
                            Some((_, '{')) => {}
                            _ => return Err(malformed(at, "invalid unicode escape")),
                        }
                        loop {
                            match chars.next() {
                                Some((_, '}')) => break,
                                Some((_, h)) if h.is_ascii_hexdigit() && hex.len() < 6 => {
                                    hex.push(h)
                                }
                                _ => return Err(malformed(at, "invalid unicode escape")),
                            }
                        }
                        let decoded = u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| malformed(at, "invalid unicode escape"))?;
                        text.push(decoded);
                    }
                    other => {
                        return Err(malformed(
                            at,
                            &format!("unknown escape sequence '\\{}'", other),
                        ))
                    }
                }
            }
            c => text.push(c),
        }
    }

    Err(malformed(at, "unterminated quoted string"))
}

fn malformed(at: usize, detail: &str) -> TemplateError {
    TemplateError::MalformedTemplate(format!("{} at byte {}", detail, at))
}
