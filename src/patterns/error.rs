use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the provider pattern table. Any of them aborts
/// the whole load.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("cannot read pattern table {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("pattern table is not valid CSV: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
    #[error("pattern table missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<&'static str> },
    #[error("line {line}: `{field}` is empty")]
    EmptyField { line: u64, field: &'static str },
    #[error("line {line}: unknown match_type '{value}' (expected suffix|contains|exact|regex)")]
    UnknownMatchType { line: u64, value: String },
    #[error("line {line}: priority '{value}' is not an integer")]
    InvalidPriority {
        line: u64,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: regex '{pattern}' does not compile: {source}")]
    InvalidRegex {
        line: u64,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(source: csv::Error) -> Self {
        Self::Csv { source }
    }

    pub(crate) fn invalid_priority(line: u64, value: &str, source: ParseIntError) -> Self {
        Self::InvalidPriority {
            line,
            value: value.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_regex(line: u64, pattern: &str, source: regex::Error) -> Self {
        Self::InvalidRegex {
            line,
            pattern: pattern.to_string(),
            source,
        }
    }

    /// 1-based line of the offending row, when the error is tied to one.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::EmptyField { line, .. }
            | Self::UnknownMatchType { line, .. }
            | Self::InvalidPriority { line, .. }
            | Self::InvalidRegex { line, .. } => Some(*line),
            _ => None,
        }
    }
}
