//! Line-oriented G-code parser.
//!
//! Each non-blank, non-comment line becomes one [`Command`]:
//! - leading/trailing whitespace is stripped
//! - lines starting with `;` are comments and are skipped
//! - anything after the first `;` is an inline comment and is dropped
//! - the first whitespace-separated token is the mnemonic
//! - every other token is a parameter: its first character is the key,
//!   the remainder is the value (see [`parse_value`])

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::command::{Command, Params, Value};
use crate::error::{GcodeError, Result};
use crate::settings::{MalformedLinePolicy, ParseSettings};

/// Comment marker.
pub const COMMENT: char = ';';

/// A line that produced no tokens after comment stripping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedLine {
    /// Line number (1-indexed).
    pub line: usize,
    /// Raw line text.
    pub text: String,
}

/// Result of a parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    /// Commands in source order.
    pub commands: Vec<Command>,
    /// Lines skipped under [`MalformedLinePolicy::Skip`].
    pub malformed: Vec<MalformedLine>,
}

enum Line {
    Skip,
    Malformed,
    Command(Command),
}

/// Configurable parser.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    settings: ParseSettings,
}

impl Parser {
    /// Create a parser with the given settings.
    pub fn new(settings: ParseSettings) -> Self {
        Self { settings }
    }

    /// Parse G-code text.
    pub fn parse(&self, text: &str) -> Result<ParseOutput> {
        let mut output = ParseOutput::default();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            match parse_line(raw) {
                Line::Skip => {}
                Line::Command(cmd) => output.commands.push(cmd),
                Line::Malformed => match self.settings.malformed {
                    MalformedLinePolicy::Fail => return Err(GcodeError::malformed(line_no, raw)),
                    MalformedLinePolicy::Skip => {
                        warn!("skipping malformed line {line_no}: {raw:?}");
                        output.malformed.push(MalformedLine {
                            line: line_no,
                            text: raw.to_owned(),
                        });
                    }
                },
            }
        }

        debug!(
            "parsed {} commands ({} malformed lines skipped)",
            output.commands.len(),
            output.malformed.len()
        );
        Ok(output)
    }
}

/// Parse G-code text, skipping malformed lines.
pub fn parse(text: &str) -> Vec<Command> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| match parse_line(raw) {
            Line::Command(cmd) => Some(cmd),
            Line::Malformed => {
                warn!("skipping malformed line {}: {raw:?}", idx + 1);
                None
            }
            Line::Skip => None,
        })
        .collect()
}

fn parse_line(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT) {
        return Line::Skip;
    }

    let code = match line.find(COMMENT) {
        Some(idx) => line[..idx].trim(),
        None => line,
    };

    let mut tokens = code.split_whitespace();
    let Some(mnemonic) = tokens.next() else {
        return Line::Malformed;
    };

    let params: Params = tokens.filter_map(parse_param).collect();
    match Command::new(mnemonic, params) {
        Ok(cmd) => Line::Command(cmd),
        Err(_) => Line::Malformed,
    }
}

fn parse_param(token: &str) -> Option<(char, Value)> {
    let mut chars = token.chars();
    let key = chars.next()?;
    Some((key, parse_value(chars.as_str())))
}

/// Infer a parameter value from the text after its key letter.
///
/// A remainder containing `.` is tried as a float, anything else as an
/// integer. If that fails the remainder is kept as [`Value::Text`].
pub fn parse_value(remainder: &str) -> Value {
    let parsed = if remainder.contains('.') {
        remainder.parse::<f64>().ok().map(Value::Float)
    } else {
        remainder.parse::<i64>().ok().map(Value::Integer)
    };

    parsed.unwrap_or_else(|| {
        trace!("keeping non-numeric parameter value {remainder:?} as text");
        Value::Text(remainder.to_owned())
    })
}
