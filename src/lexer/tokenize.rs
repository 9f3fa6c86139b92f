//! The per-line scanning state machine.
//!
//! Each input line is tokenized independently; the only cross-line artifact
//! is the shared output vector. A bare word stays in an accumulation buffer
//! with an undetermined classification until a later character resolves it:
//! a colon makes it a label, any other flush boundary makes it the line's
//! instruction (first word) or an operand.

use super::chars::{is_operator_char, is_special_char, is_whitespace_char};
use super::token::{Token, TokenKind};

/// Initial token vector capacity for whole-source tokenization.
const TOKENS_CAPACITY: usize = 1024;

/// Pending classification of the accumulation buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Undetermined,
    Operand,
    Label,
}

/// Scanner state for a single line, discarded when the line ends.
struct LineState {
    buf: String,
    /// Byte column of the first character in `buf`
    buf_start: usize,
    pending: Pending,
    instruction_found: bool,
}

impl LineState {
    fn new() -> Self {
        Self {
            buf: String::new(),
            buf_start: 0,
            pending: Pending::Undetermined,
            instruction_found: false,
        }
    }

    /// Emit the buffered value, if any, resolving its classification.
    ///
    /// An undetermined or operand-pending value becomes the line's
    /// instruction when none has been seen yet. An instruction whose first
    /// character sat in column 0 is preceded by a `PushIndentLevel` marker:
    /// a line starting flush left must not be indented as though it were
    /// under the most recent label.
    fn flush(&mut self, tokens: &mut Vec<Token>) {
        if self.buf.is_empty() {
            self.pending = Pending::Undetermined;
            return;
        }

        let kind = match self.pending {
            Pending::Label => TokenKind::Label,
            Pending::Undetermined | Pending::Operand => {
                if self.instruction_found {
                    TokenKind::Operand
                } else {
                    self.instruction_found = true;
                    if self.buf_start == 0 {
                        tokens.push(Token::new(TokenKind::PushIndentLevel, "0"));
                    }
                    TokenKind::Instruction
                }
            }
        };

        tokens.push(Token::new(kind, std::mem::take(&mut self.buf)));
        self.pending = Pending::Undetermined;
    }
}

/// Tokenize a whole source text.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_lines(source.lines())
}

/// Tokenize an ordered sequence of newline-stripped lines.
pub fn tokenize_lines<I, S>(lines: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::with_capacity(TOKENS_CAPACITY);
    for line in lines {
        tokenize_line(&mut tokens, line.as_ref());
    }
    tokens
}

/// Tokenize a single line, appending its tokens to `tokens`.
pub fn tokenize_line(tokens: &mut Vec<Token>, line: &str) {
    if line.trim().is_empty() {
        tokens.push(Token::new(TokenKind::EmptyLine, ""));
        return;
    }

    let start_len = tokens.len();
    let mut state = LineState::new();
    let mut iter = line.char_indices();

    while let Some((col, ch)) = iter.next() {
        match ch {
            ';' => {
                state.flush(tokens);
                push_comment(tokens, start_len, line, col);
                return;
            }
            '[' if !state.instruction_found && state.buf.is_empty() => {
                let mut value = String::new();
                for (_, inner) in iter.by_ref() {
                    if inner == ']' {
                        break;
                    }
                    value.push(inner);
                }
                tokens.push(Token::new(TokenKind::BracketedDirective, value));
            }
            c if is_whitespace_char(c) => {
                if !state.buf.is_empty() && state.pending == Pending::Undetermined {
                    state.pending = Pending::Operand;
                }
            }
            c if is_special_char(c) => {
                if c == ':' {
                    if state.instruction_found {
                        state.flush(tokens);
                        tokens.push(Token::new(TokenKind::Colon, ":"));
                    } else {
                        // A colon before the instruction resolves the
                        // buffered word as a label; the buffer is kept
                        // open until the next flush boundary.
                        state.pending = Pending::Label;
                    }
                } else {
                    state.flush(tokens);
                    tokens.push(Token::new(TokenKind::Comma, ","));
                }
            }
            c if is_operator_char(c) => {
                state.flush(tokens);
                tokens.push(Token::new(TokenKind::Operator, c.to_string()));
            }
            c => {
                if state.pending != Pending::Undetermined && !state.buf.is_empty() {
                    state.flush(tokens);
                }
                if state.buf.is_empty() {
                    state.buf_start = col;
                }
                state.buf.push(c);
            }
        }
    }

    state.flush(tokens);
}

/// Emit the remainder of the line as a comment token.
///
/// The leading `;` and at most one following space are stripped and internal
/// whitespace runs collapse to single spaces. The comment is stand-alone
/// (`CommentNewLine`) only when the line produced no other token.
fn push_comment(tokens: &mut Vec<Token>, start_len: usize, line: &str, semi: usize) {
    let rest = &line[semi + 1..];
    let value = rest.split_whitespace().collect::<Vec<_>>().join(" ");

    let kind = if tokens.len() == start_len {
        TokenKind::CommentNewLine
    } else {
        TokenKind::CommentSameLine
    };
    tokens.push(Token::new(kind, value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_only_basic_instructions() {
        let source = "\tmov eax, cr0\n\tmov ebx, 0x13\n\tmov ecx, 0x15";
        let expected = [
            Token::new(TokenKind::Instruction, "mov"),
            Token::new(TokenKind::Operand, "eax"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Operand, "cr0"),
            Token::new(TokenKind::Instruction, "mov"),
            Token::new(TokenKind::Operand, "ebx"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Operand, "0x13"),
            Token::new(TokenKind::Instruction, "mov"),
            Token::new(TokenKind::Operand, "ecx"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Operand, "0x15"),
        ];
        assert_eq!(tokenize(source), expected);
    }

    #[test]
    fn test_labels_and_instructions() {
        let source = "_start:\n\textern page_directory\n\tmov eax, page_directory";
        let expected = [
            Token::new(TokenKind::Label, "_start"),
            Token::new(TokenKind::Instruction, "extern"),
            Token::new(TokenKind::Operand, "page_directory"),
            Token::new(TokenKind::Instruction, "mov"),
            Token::new(TokenKind::Operand, "eax"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Operand, "page_directory"),
        ];
        assert_eq!(tokenize(source), expected);
    }

    #[test]
    fn test_label_alone_on_line() {
        let tokens = tokenize("loop_top:");
        assert_eq!(tokens, [Token::new(TokenKind::Label, "loop_top")]);
    }

    #[test]
    fn test_label_state_is_per_line() {
        // An instruction on a previous line must not stop `foo:` from being
        // a label: classification state resets every line.
        let tokens = tokenize("\tmov eax, 1\nfoo:");
        assert_eq!(tokens.last(), Some(&Token::new(TokenKind::Label, "foo")));
    }

    #[test]
    fn test_label_followed_by_instruction_on_same_line() {
        let tokens = tokenize("start: mov eax, ebx");
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Label,
                TokenKind::Instruction,
                TokenKind::Operand,
                TokenKind::Comma,
                TokenKind::Operand,
            ]
        );
        assert_eq!(tokens[0].value, "start");
        assert_eq!(tokens[1].value, "mov");
    }

    #[test]
    fn test_colon_after_instruction_is_colon_token() {
        let tokens = tokenize("\tmov ax, [es:di]");
        assert_eq!(
            tokens,
            [
                Token::new(TokenKind::Instruction, "mov"),
                Token::new(TokenKind::Operand, "ax"),
                Token::new(TokenKind::Comma, ","),
                Token::new(TokenKind::Operand, "[es"),
                Token::new(TokenKind::Colon, ":"),
                Token::new(TokenKind::Operand, "di]"),
            ]
        );
    }

    #[test]
    fn test_single_word_line_is_instruction() {
        let tokens = tokenize("\tret");
        assert_eq!(tokens, [Token::new(TokenKind::Instruction, "ret")]);
    }

    #[test]
    fn test_column_zero_instruction_pushes_indent_override() {
        let tokens = tokenize("mov eax, 1");
        assert_eq!(tokens[0], Token::new(TokenKind::PushIndentLevel, "0"));
        assert_eq!(tokens[1], Token::new(TokenKind::Instruction, "mov"));
    }

    #[test]
    fn test_indented_instruction_has_no_indent_override() {
        let tokens = tokenize("  mov eax, 1");
        assert_eq!(tokens[0], Token::new(TokenKind::Instruction, "mov"));
    }

    #[test]
    fn test_standalone_comment() {
        let tokens = tokenize("; Start label");
        assert_eq!(
            tokens,
            [Token::new(TokenKind::CommentNewLine, "Start label")]
        );
    }

    #[test]
    fn test_indented_standalone_comment() {
        let tokens = tokenize("    ; set up paging");
        assert_eq!(
            tokens,
            [Token::new(TokenKind::CommentNewLine, "set up paging")]
        );
    }

    #[test]
    fn test_trailing_comment_strips_and_collapses_whitespace() {
        let tokens = tokenize("  mov eax, ebx   ; move   it  ");
        assert_eq!(
            tokens.last(),
            Some(&Token::new(TokenKind::CommentSameLine, "move it"))
        );
    }

    #[test]
    fn test_comment_after_label_is_same_line() {
        let tokens = tokenize("done: ; all finished");
        assert_eq!(
            tokens,
            [
                Token::new(TokenKind::Label, "done"),
                Token::new(TokenKind::CommentSameLine, "all finished"),
            ]
        );
    }

    #[test]
    fn test_comment_only_semicolon() {
        let tokens = tokenize(";");
        assert_eq!(tokens, [Token::new(TokenKind::CommentNewLine, "")]);
    }

    #[test]
    fn test_commas_inside_comments_are_not_tokens() {
        let tokens = tokenize("\tmov eax, ebx ; a, b, c");
        let commas = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comma)
            .count();
        assert_eq!(commas, 1);
    }

    #[test]
    fn test_consecutive_commas_each_produce_a_token() {
        let tokens = tokenize("\tdb 1,,2");
        let commas = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comma)
            .count();
        assert_eq!(commas, 2);
    }

    #[test]
    fn test_bracketed_directive() {
        let tokens = tokenize("[bits 64]");
        assert_eq!(
            tokens,
            [Token::new(TokenKind::BracketedDirective, "bits 64")]
        );
    }

    #[test]
    fn test_unterminated_bracketed_directive_runs_to_eol() {
        let tokens = tokenize("[bits 64");
        assert_eq!(
            tokens,
            [Token::new(TokenKind::BracketedDirective, "bits 64")]
        );
    }

    #[test]
    fn test_bracket_after_instruction_is_not_a_directive() {
        let tokens = tokenize("\tmov eax, [ebx]");
        assert_eq!(
            tokens.last(),
            Some(&Token::new(TokenKind::Operand, "[ebx]"))
        );
    }

    #[test]
    fn test_bracketed_directive_with_trailing_comment() {
        let tokens = tokenize("[bits 64] ; long mode");
        assert_eq!(
            tokens,
            [
                Token::new(TokenKind::BracketedDirective, "bits 64"),
                Token::new(TokenKind::CommentSameLine, "long mode"),
            ]
        );
    }

    #[test]
    fn test_empty_line() {
        let tokens = tokenize_lines([""]);
        assert_eq!(tokens, [Token::new(TokenKind::EmptyLine, "")]);
    }

    #[test]
    fn test_whitespace_only_line_is_empty() {
        let tokens = tokenize("   \t ");
        assert_eq!(tokens, [Token::new(TokenKind::EmptyLine, "")]);
    }

    #[test]
    fn test_blank_lines_are_kept_per_line() {
        let tokens = tokenize("\tnop\n\n\n\tnop");
        let blanks = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::EmptyLine)
            .count();
        assert_eq!(blanks, 2);
    }

    #[test]
    fn test_arithmetic_operator_tokens() {
        let tokens = tokenize("\tmsg_len equ $ - msg");
        assert_eq!(
            tokens,
            [
                Token::new(TokenKind::Instruction, "msg_len"),
                Token::new(TokenKind::Operand, "equ"),
                Token::new(TokenKind::Operand, "$"),
                Token::new(TokenKind::Operator, "-"),
                Token::new(TokenKind::Operand, "msg"),
            ]
        );
    }

    #[test]
    fn test_operator_splits_glued_operands() {
        let tokens = tokenize("\tresb 2*4");
        assert_eq!(
            tokens,
            [
                Token::new(TokenKind::Instruction, "resb"),
                Token::new(TokenKind::Operand, "2"),
                Token::new(TokenKind::Operator, "*"),
                Token::new(TokenKind::Operand, "4"),
            ]
        );
    }

    #[test]
    fn test_tokenize_lines_matches_tokenize() {
        let source = "_start:\n\tmov eax, 1\n\n; done";
        assert_eq!(tokenize(source), tokenize_lines(source.lines()));
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("").is_empty());
        assert!(tokenize_lines(std::iter::empty::<&str>()).is_empty());
    }
}
