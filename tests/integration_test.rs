//! Integration tests for asmfmt
//!
//! These tests verify that the components work together correctly

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{BufReader, Cursor};

use asmfmt::process::format_file;
use asmfmt::{find_directive, format_source, parse_args_from, render, tokenize, Config, TokenKind};

/// Run the full pipeline over `input` with `config`
fn format_str(input: &str, config: &Config) -> String {
    let reader = BufReader::new(Cursor::new(input.as_bytes()));
    let mut output = Vec::new();
    format_file(reader, &mut output, config, "test").unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_label_with_aligned_instructions() {
    let input = "_start:\n  mov eax, 1\n  mov ebx, 2\n";
    let output = format_str(input, &Config::default());
    assert_eq!(output, "_start:\n    mov       eax, 1\n    mov       ebx, 2\n");
}

#[test]
fn test_tokenize_then_render_matches_format_source() {
    let source = "_start:\n  mov eax, 1\n\n; done";
    let config = Config::default();
    assert_eq!(render(&tokenize(source), &config), format_source(source, &config));
}

#[test]
fn test_render_is_deterministic() {
    let source = "[bits 32]\nloop:\n  dec ecx\n  jnz loop";
    let config = Config::default();
    assert_eq!(format_source(source, &config), format_source(source, &config));
}

#[test]
fn test_blank_line_pass_through() {
    let tokens = tokenize("  nop\n\n  nop");
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::EmptyLine).count(), 1);
    let output = format_str("  nop\n\n  nop\n", &Config::default());
    assert_eq!(output, "nop\n\nnop\n");
}

#[test]
fn test_comma_count_matches_top_level_commas() {
    let source = "  mov eax, ebx ; a, b\n  db 1, 2, 3";
    let commas = tokenize(source)
        .iter()
        .filter(|t| t.kind == TokenKind::Comma)
        .count();
    assert_eq!(commas, 3);
}

#[test]
fn test_idempotence_of_full_pipeline() {
    let input = "\
; boot sector
[org 0x7c00]

start:
\tcli
\tmov ax , 0x07c0
\tmov ds,ax
\tjmp $
";
    let config = Config::default();
    let first = format_str(input, &config);
    let second = format_str(&first, &config);
    assert_eq!(first, second);
}

#[test]
fn test_idempotence_with_tabs() {
    let config = Config {
        use_tabs: true,
        ..Config::default()
    };
    let input = "start:\n  mov eax, cr0\n  or eax, 0x80000001\n";
    let first = format_str(input, &config);
    let second = format_str(&first, &config);
    assert_eq!(first, second);
}

#[test]
fn test_directive_overrides_reach_the_generator() {
    let input = "; asmfmt: --align-column 6\nstart:\n  mov eax, 1\n";

    let mut reader = BufReader::new(Cursor::new(input.as_bytes()));
    let overrides = find_directive(&mut reader).unwrap();

    let mut config = Config::default();
    if let Some(align) = overrides.operand_align_column {
        config.operand_align_column = align;
    }

    let output = format_str(input, &config);
    // `mov` is 3 chars, so the operand lands 3 columns after it
    assert_eq!(
        output,
        "; asmfmt: --align-column 6\nstart:\n    mov   eax, 1\n"
    );
}

#[test]
fn test_cli_args_build_a_valid_config() {
    let args = parse_args_from(["asmfmt", "-t", "2", "-a", "8", "--use-tabs", "x.asm"]);
    let mut config = Config::default();
    if let Some(tab_width) = args.tab_width {
        config.tab_width = tab_width;
    }
    if let Some(align) = args.align_column {
        config.operand_align_column = align;
    }
    if args.use_tabs {
        config.use_tabs = true;
    }
    assert!(config.validate().is_none());
    assert_eq!(config.tab_width, 2);
    assert_eq!(config.operand_align_column, 8);
    assert!(config.use_tabs);
}

#[test]
fn test_malformed_input_still_formats() {
    // Stray brackets, lone colons and dangling commas must never fail
    let inputs = [
        "]stray",
        ":",
        ",",
        "mov eax,",
        "[unterminated",
        "a:b:c:d",
        "\t\t\t",
    ];
    for input in inputs {
        let output = format_str(input, &Config::default());
        // Formatting twice is still stable
        assert_eq!(format_str(&output, &Config::default()), output, "input: {input:?}");
    }
}

#[test]
fn test_empty_input_produces_empty_output() {
    assert_eq!(format_str("", &Config::default()), "");
}

#[test]
fn test_output_ends_with_single_newline() {
    let output = format_str("  nop", &Config::default());
    assert!(output.ends_with('\n'));
    assert!(!output.ends_with("\n\n"));
}
