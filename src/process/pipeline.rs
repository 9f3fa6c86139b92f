//! Tokenize-then-render pipeline
//!
//! The pipeline is a single synchronous pass: read newline-stripped lines,
//! tokenize them in order, render the whole token sequence once. Neither
//! core stage can fail; the only error path here is the surrounding I/O.

use std::io::{BufRead, Write};

use anyhow::Context;

use crate::config::Config;
use crate::generator::render;
use crate::lexer::tokenize_line;
use crate::Result;

/// Format in-memory source text into its canonical layout.
///
/// Deterministic given identical input and config; the result carries no
/// trailing newline.
#[must_use]
pub fn format_source(source: &str, config: &Config) -> String {
    render(&crate::lexer::tokenize(source), config)
}

/// Format everything read from `input` and write the result to `output`.
///
/// Non-empty output is terminated with exactly one trailing newline.
pub fn format_file<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &Config,
    source_name: &str,
) -> Result<()> {
    let mut tokens = Vec::new();
    for line in input.lines() {
        let line = line.with_context(|| format!("failed to read {source_name}"))?;
        tokenize_line(&mut tokens, &line);
    }

    let rendered = render(&tokens, config);
    output
        .write_all(rendered.as_bytes())
        .with_context(|| format!("failed to write formatted output for {source_name}"))?;
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        output.write_all(b"\n")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use super::*;

    fn format_str(input: &str, config: &Config) -> String {
        let reader = BufReader::new(Cursor::new(input.as_bytes()));
        let mut output = Vec::new();
        format_file(reader, &mut output, config, "test").unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_format_source_is_pure() {
        let config = Config::default();
        let a = format_source("_start:\n  mov eax, 1", &config);
        let b = format_source("_start:\n  mov eax, 1", &config);
        assert_eq!(a, b);
        assert_eq!(a, "_start:\n    mov       eax, 1");
    }

    #[test]
    fn test_format_file_appends_trailing_newline() {
        let output = format_str("_start:\n  mov eax, 1", &Config::default());
        assert_eq!(output, "_start:\n    mov       eax, 1\n");
    }

    #[test]
    fn test_format_file_empty_input() {
        let output = format_str("", &Config::default());
        assert_eq!(output, "");
    }

    #[test]
    fn test_format_file_handles_crlf() {
        let output = format_str("_start:\r\n  mov eax, 1\r\n", &Config::default());
        assert_eq!(output, "_start:\n    mov       eax, 1\n");
    }

    #[test]
    fn test_format_file_is_idempotent() {
        let config = Config::default();
        let first = format_str("_start:\n\tmov   eax,1   ; init\n\n\tret", &config);
        let second = format_str(&first, &config);
        assert_eq!(first, second);
    }
}
