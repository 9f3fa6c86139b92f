//! asmfmt - Auto-formatter for NASM-style assembly source
//!
//! A single-pass, line-oriented source-to-source transformer: tokenize the
//! input, then re-emit it with consistent indentation, aligned operand
//! columns and normalized comment spacing.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod generator;
pub mod lexer;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::Result;
pub use generator::render;
pub use lexer::{tokenize, tokenize_lines, Token, TokenKind};
pub use process::format_source;
