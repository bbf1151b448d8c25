use regex::Regex;
use tracing::trace;

use crate::ast::{Line, NumberedLine};
use crate::error::ConfigError;
use crate::infer::infer;
use crate::value::Assignment;

/// How lines that do not follow the key grammar are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Malformed lines are kept as comments.
    #[default]
    Lenient,
    /// Malformed lines fail with `MalformedInput`, and every key segment
    /// must match `[a-zA-Z0-9_-]+`.
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub mode: ParseMode,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            mode: ParseMode::Strict,
        }
    }
}

const KEY_SEGMENT_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

/// Line classifier. Holds the compiled key pattern for strict mode.
struct Parser {
    mode: ParseMode,
    key_segment: Option<Regex>,
}

/// Classify every line of `input`. Line numbers are 0-based.
pub fn parse(input: &str, options: &ParseOptions) -> Result<Vec<NumberedLine>, ConfigError> {
    let parser = Parser::new(options);
    input
        .lines()
        .enumerate()
        .map(|(number, text)| {
            parser
                .classify(number, text)
                .map(|line| NumberedLine { number, line })
        })
        .collect()
}

/// Classify a single line with the given options.
pub fn parse_line(number: usize, text: &str, options: &ParseOptions) -> Result<Line, ConfigError> {
    Parser::new(options).classify(number, text)
}

impl Parser {
    fn new(options: &ParseOptions) -> Self {
        let key_segment = match options.mode {
            ParseMode::Lenient => None,
            ParseMode::Strict => {
                Some(Regex::new(KEY_SEGMENT_PATTERN).expect("key pattern is a valid regex"))
            }
        };
        Parser {
            mode: options.mode,
            key_segment,
        }
    }

    fn classify(&self, number: usize, text: &str) -> Result<Line, ConfigError> {
        let first = text.trim_start().chars().next();
        let eq = text.find('=');

        let eq = match (first, eq) {
            (None, _) | (Some('#'), _) | (Some(';'), _) | (_, None) => {
                return Ok(Line::Comment(text.to_string()));
            }
            (_, Some(eq)) => eq,
        };

        let (key, assignment) = split_operator(text[..eq].trim());
        let key = match self.normalize_key(key) {
            Some(key) => key,
            None => return self.malformed(number, text, "missing or invalid key"),
        };

        let raw = text[eq + 1..].trim();
        Ok(Line::Assign {
            key,
            assignment,
            value: infer(raw),
        })
    }

    /// Trim each dotted segment and reject empty ones. In strict mode every
    /// segment must also match the key grammar.
    fn normalize_key(&self, key: &str) -> Option<String> {
        let mut segments = Vec::new();
        for segment in key.split('.') {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }
            if let Some(pattern) = &self.key_segment {
                if !pattern.is_match(segment) {
                    return None;
                }
            }
            segments.push(segment);
        }
        Some(segments.join("."))
    }

    fn malformed(&self, number: usize, text: &str, message: &str) -> Result<Line, ConfigError> {
        match self.mode {
            ParseMode::Lenient => {
                trace!(line = number, "keeping malformed line as comment");
                Ok(Line::Comment(text.to_string()))
            }
            ParseMode::Strict => Err(ConfigError::MalformedInput {
                line: Some(number + 1),
                message: format!("{}: {:?}", message, text),
            }),
        }
    }
}

/// Split a trailing `+` or `:` (from `+=` / `:=`) off the key.
fn split_operator(key: &str) -> (&str, Assignment) {
    if let Some(stripped) = key.strip_suffix('+') {
        (stripped.trim_end(), Assignment::ForceAppend)
    } else if let Some(stripped) = key.strip_suffix(':') {
        (stripped.trim_end(), Assignment::ForceReplace)
    } else {
        (key, Assignment::Default)
    }
}
