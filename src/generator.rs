//! Canonical text generation from the token stream.
//!
//! The generator consumes the token sequence once, left to right, and never
//! looks ahead or back beyond three pieces of running state: the current
//! indent level, the length of the most recently emitted instruction (for
//! operand column alignment) and a one-shot flag suppressing the space in
//! front of the operand following a colon. Like the lexer it cannot fail:
//! every token sequence renders to some text.

use crate::config::Config;
use crate::lexer::{Token, TokenKind};

/// Render the token sequence as canonical text.
///
/// Deterministic for identical inputs. The result never starts with a blank
/// line and carries no trailing newline; terminating the output is the
/// caller's concern.
#[must_use]
pub fn render(tokens: &[Token], config: &Config) -> String {
    if tokens.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(tokens.len() * 8);
    let mut indent_level: usize = 0;
    let mut instruction_len: usize = 0;
    let mut suppress_operand_space = false;

    for token in tokens {
        match token.kind {
            TokenKind::Label => {
                out.push('\n');
                out.push_str(&token.value);
                out.push(':');
                indent_level = 1;
            }
            TokenKind::BracketedDirective => {
                out.push('\n');
                out.push('[');
                out.push_str(&token.value);
                out.push(']');
                indent_level = 0;
            }
            TokenKind::Instruction => {
                out.push('\n');
                push_indent(&mut out, indent_level, config);
                out.push_str(&token.value);
                instruction_len = token.value.chars().count();
            }
            TokenKind::Operand | TokenKind::Operator => {
                // The first operand after an instruction is padded out to
                // the configured column; an instruction at least that long
                // degrades to the ordinary single-space separator.
                let mut padded = false;
                if instruction_len != 0 && indent_level != 0 {
                    let pad = config.operand_align_column.saturating_sub(instruction_len);
                    push_spaces(&mut out, pad);
                    instruction_len = 0;
                    padded = pad > 0;
                }
                if padded {
                    suppress_operand_space = false;
                } else if suppress_operand_space {
                    suppress_operand_space = false;
                } else {
                    out.push(' ');
                }
                out.push_str(&token.value);
            }
            TokenKind::Comma => out.push(','),
            TokenKind::Colon => {
                out.push(':');
                suppress_operand_space = true;
            }
            TokenKind::CommentSameLine => {
                out.push_str(" ; ");
                out.push_str(&token.value);
            }
            TokenKind::CommentNewLine => {
                out.push('\n');
                push_indent(&mut out, indent_level, config);
                out.push_str("; ");
                out.push_str(&token.value);
            }
            TokenKind::EmptyLine => out.push('\n'),
            TokenKind::PushIndentLevel => {
                indent_level = token.value.parse().unwrap_or(0);
            }
        }
    }

    // Line-opening tokens emit a leading newline; the result must not
    // begin with a blank line.
    match out.strip_prefix('\n') {
        Some(stripped) => stripped.to_string(),
        None => out,
    }
}

fn push_indent(out: &mut String, level: usize, config: &Config) {
    for _ in 0..level {
        if config.use_tabs {
            out.push('\t');
        } else {
            push_spaces(out, config.tab_width);
        }
    }
}

fn push_spaces(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push(' ');
    }
}
