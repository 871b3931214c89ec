#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors produced by [`DataFrame`](crate::DataFrame) operations and the
/// boundary conversions.
///
/// All errors are synchronous and propagate to the immediate caller; nothing
/// is retried or swallowed.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A column assignment whose length disagrees with the frame's current
    /// row count. The frame is left unchanged.
    #[error("column of length {got} does not match row count {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    /// A referenced column name is absent from the frame.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// An aggregation kind spelling that is not recognized.
    #[error("unsupported aggregation `{0}`")]
    UnsupportedAggregation(String),

    /// A numeric reduction ran into text cells. Strings are never silently
    /// coerced to numbers.
    #[error("column `{column}` contains non-numeric values")]
    NonNumeric { column: String },

    /// Descriptive statistics were requested over a column with no numeric
    /// values.
    #[error("column `{column}` has no values to summarize")]
    EmptyColumn { column: String },

    /// Malformed external data or an invalid construction request: ragged
    /// rows, duplicate or missing columns, unsupported columnar types.
    #[error("malformed tabular input: {reason}")]
    Malformed { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FrameError::Malformed {
            reason: reason.into(),
        }
    }
}
