use std::path::PathBuf;

/// Errors raised by the editing core.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A line index outside `0..len` reached an operation that requires a valid line
    #[error("line {line} is out of range (document has {len} lines)")]
    LineOutOfRange { line: usize, len: usize },

    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid regular expression: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("no active buffer")]
    NoActiveBuffer,

    #[error("no path given and none stored in the buffer")]
    NoPath,
}

pub type Result<T> = std::result::Result<T, EditorError>;
