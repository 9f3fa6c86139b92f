//! Assembly source tokenization.
//!
//! This module converts raw source text into a classified token stream:
//! - [`token`]: The [`Token`] pair and the closed [`TokenKind`] set
//! - [`chars`]: Character classification lookup tables
//! - [`tokenize`]: The per-line scanning state machine
//!
//! Tokenization is purely line-local: no state crosses a line boundary, and
//! no input can make it fail. Malformed source is classified on a
//! best-effort basis rather than rejected.

pub mod chars;
pub mod token;
pub mod tokenize;

pub use token::{Token, TokenKind};
pub use tokenize::{tokenize, tokenize_line, tokenize_lines};
