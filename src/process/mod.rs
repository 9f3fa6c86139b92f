//! File processing and formatting pipeline.
//!
//! This module composes the two core components into the single synchronous
//! pass the formatter performs per input:
//!
//! 1. The lexer converts each line into classified tokens.
//! 2. The generator renders the whole token sequence as canonical text.
//!
//! The main entry point is [`format_file`] which processes a buffered reader
//! and writes formatted output to any `Write` implementation;
//! [`format_source`] is the pure in-memory equivalent.

pub mod pipeline;

pub use pipeline::{format_file, format_source};
