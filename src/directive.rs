//! Inline directive parsing for `; asmfmt:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `; asmfmt: --tab-width 8 --use-tabs`

use std::sync::LazyLock;

use regex::Regex;

/// Pattern to match asmfmt directives
static ASMFMT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*;\s*asmfmt:\s*(.*)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone)]
pub struct DirectiveOverrides {
    pub use_tabs: Option<bool>,
    pub tab_width: Option<usize>,
    pub operand_align_column: Option<usize>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.use_tabs.is_none() && self.tab_width.is_none() && self.operand_align_column.is_none()
    }
}

/// Check if a line contains an asmfmt directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    ASMFMT_DIRECTIVE_RE.is_match(line)
}

/// Parse an asmfmt directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a valid directive
/// * `None` if the line is not a directive or sets nothing
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = ASMFMT_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();

    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "-t" | "--tab-width" => {
                i += 1;
                if i < tokens.len() {
                    overrides.tab_width = tokens[i].parse().ok();
                }
            }
            "-a" | "--align-column" => {
                i += 1;
                if i < tokens.len() {
                    overrides.operand_align_column = tokens[i].parse().ok();
                }
            }
            "--use-tabs" => {
                overrides.use_tabs = Some(true);
            }
            "--no-tabs" => {
                overrides.use_tabs = Some(false);
            }
            _ => {
                // Unknown option, skip
            }
        }
        i += 1;
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for asmfmt directives and return the first found
///
/// This reads the input looking for `; asmfmt:` lines.
/// Only the first directive is used (subsequent ones are ignored).
pub fn find_directive<R: std::io::BufRead>(input: &mut R) -> Option<DirectiveOverrides> {
    let mut buffer = String::new();

    while input.read_line(&mut buffer).ok()? > 0 {
        if is_directive_line(&buffer) {
            return parse_directive(&buffer);
        }
        buffer.clear();
    }

    None
}
