//! Error types shared by every table operation.

use std::fmt;

/// Axis addressed by a positional selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "row"),
            Axis::Columns => write!(f, "column"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("column '{0}' given more than once")]
    DuplicateColumn(String),

    #[error("table has no Index column")]
    NoIndexColumn,

    #[error("column '{column}' contains duplicate values and cannot become the index")]
    DuplicateValues { column: String },

    #[error("{axis} range [{start}, {end}) out of bounds for length {len}")]
    OutOfBounds {
        axis: Axis,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("{axis} step must be at least 1")]
    InvalidStep { axis: Axis },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("invalid filter expression: {0}")]
    InvalidExpression(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
