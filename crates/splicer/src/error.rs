use std::path::PathBuf;
use thiserror::Error;

/// Result type for splicer operations
pub type Result<T> = std::result::Result<T, SplicerError>;

/// Errors that can occur while injecting code into a source file
#[derive(Error, Debug)]
pub enum SplicerError {
    /// The source text is not valid Go
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Reading the target file failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the target file back failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl SplicerError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// True when the failure came from the source text rather than the file system
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }
}
