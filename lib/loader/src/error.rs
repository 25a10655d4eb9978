use std::path::PathBuf;
use thiserror::Error;

/// Format and file errors raised while loading an edge list
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid weight on line {line}: {value}")]
    InvalidWeight { line: usize, value: String },

    #[error("Blank location label on line {line}")]
    BlankLabel { line: usize },

    #[error("Unrecognised line {line}: {content}")]
    Malformed { line: usize, content: String },

    #[error("Edge pattern failed to compile: {0}")]
    Pattern(regex::Error),
}
