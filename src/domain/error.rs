//! Pipeline error types.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Which half of a segment pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Source,
    Target,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Source => f.write_str("source"),
            Segment::Target => f.write_str("target"),
        }
    }
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Dataset '{name}' not found (searched: {searched})")]
    DatasetNotFound { name: String, searched: String },

    /// `expected` is the configured max length, `actual` the raw segment
    /// length and `framing` the special tokens added around it.
    #[error(
        "Sentence is too long. {segment} expected at most {expected} tokens \
         ({framing} of them framing), received {actual}"
    )]
    SequenceTooLong {
        segment: Segment,
        expected: usize,
        actual: usize,
        framing: usize,
    },

    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Special token '{token}' must encode to exactly one id, got {ids:?}")]
    SpecialToken { token: String, ids: Vec<u32> },

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Malformed record at {}:{line}: {source}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_too_long_message_names_segment_and_lengths() {
        let err = PipelineError::SequenceTooLong {
            segment: Segment::Target,
            expected: 6,
            actual: 7,
            framing: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("target"));
        assert!(msg.contains("at most 6"));
        assert!(msg.contains("(1 of them framing)"));
        assert!(msg.contains("received 7"));
    }
}
