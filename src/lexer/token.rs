//! Token types produced by the lexer.

/// Classification of a lexed token.
///
/// The set is deliberately closed: the generator renders with a total match
/// over these variants, so adding one forces every consumer to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A label definition (bare word terminated by a colon before any
    /// instruction was seen on the line)
    Label,
    /// A `[...]` directive opening a line, e.g. `[bits 64]`; the value is
    /// the text between the brackets
    BracketedDirective,
    /// The first mnemonic-like word on a line
    Instruction,
    /// Any further bare word on the line
    Operand,
    /// A top-level `,` separator
    Comma,
    /// A `:` after the line's instruction (colons before it make a label)
    Colon,
    /// An arithmetic operator: `+`, `-`, `*` or `/`
    Operator,
    /// Trailing comment on a line that already produced tokens
    CommentSameLine,
    /// Stand-alone comment line
    CommentNewLine,
    /// A blank input line
    EmptyLine,
    /// Layout marker: sets the generator's indent level, emits no text.
    /// The value carries the level as decimal text.
    PushIndentLevel,
}

impl TokenKind {
    /// Variant name as used in `--debug` token dumps.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Label => "Label",
            TokenKind::BracketedDirective => "BracketedDirective",
            TokenKind::Instruction => "Instruction",
            TokenKind::Operand => "Operand",
            TokenKind::Comma => "Comma",
            TokenKind::Colon => "Colon",
            TokenKind::Operator => "Operator",
            TokenKind::CommentSameLine => "CommentSameLine",
            TokenKind::CommentNewLine => "CommentNewLine",
            TokenKind::EmptyLine => "EmptyLine",
            TokenKind::PushIndentLevel => "PushIndentLevel",
        }
    }
}

/// An immutable (kind, value) pair.
///
/// The value is the token's literal text with delimiters and surrounding
/// whitespace stripped according to kind-specific rules (e.g. a comment
/// value has the leading `;` and at most one following space removed).
/// Tokens are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
