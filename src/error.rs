use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised while building, combining or loading a configuration tree.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value was added to a key holding a value of an incompatible type.
    #[error("type mismatch at \"{key}\": cannot add {incoming} to {existing}")]
    TypeMismatch {
        /// Full dotted path of the offending key.
        key: String,
        existing: ValueKind,
        incoming: ValueKind,
    },

    /// A line (strict mode) or a key passed to `set`/`add` does not follow
    /// the key grammar.
    #[error(
        "malformed input{}: {message}",
        .line.map(|line| format!(" at line {}", line)).unwrap_or_default()
    )]
    MalformedInput {
        line: Option<usize>,
        message: String,
    },

    /// The underlying file or stream could not be read or written.
    #[error("cannot access {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Wraps an error raised while applying a specific line of text.
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number
        line: usize,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub fn type_mismatch(key: &str, existing: ValueKind, incoming: ValueKind) -> Self {
        ConfigError::TypeMismatch {
            key: key.to_string(),
            existing,
            incoming,
        }
    }

    pub(crate) fn invalid_key(path: &str) -> Self {
        ConfigError::MalformedInput {
            line: None,
            message: format!("invalid key {:?}", path),
        }
    }

    /// Prefix the key of a `TypeMismatch` with the parent segment, so errors
    /// raised deep inside a sub-tree name the full path.
    pub(crate) fn under(self, parent: &str) -> Self {
        match self {
            ConfigError::TypeMismatch {
                key,
                existing,
                incoming,
            } => ConfigError::TypeMismatch {
                key: format!("{}.{}", parent, key),
                existing,
                incoming,
            },
            other => other,
        }
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            already @ (ConfigError::AtLine { .. }
            | ConfigError::MalformedInput { line: Some(_), .. }) => already,
            other => ConfigError::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Returns true for `TypeMismatch`, including one wrapped in `AtLine`.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            ConfigError::TypeMismatch { .. } => true,
            ConfigError::AtLine { source, .. } => source.is_type_mismatch(),
            _ => false,
        }
    }

    /// The 1-based source line the error was raised on, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::AtLine { line, .. } => Some(*line),
            ConfigError::MalformedInput { line, .. } => *line,
            _ => None,
        }
    }

    /// The dotted key a `TypeMismatch` refers to, looking through `AtLine`.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::TypeMismatch { key, .. } => Some(key),
            ConfigError::AtLine { source, .. } => source.key(),
            _ => None,
        }
    }
}
