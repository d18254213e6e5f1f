//! Error types for Prism.

use crate::ndarray::DType;
use crate::value::Value;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Result type alias for Prism operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for Prism operations.
///
/// Every variant is structural: it marks a programming error by the caller
/// and aborts the operation that raised it. Recoverable conditions (missing
/// group column, ragged column lengths) are logged instead and never show up
/// here.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Binary index-set operation between sets of different capacity.
    SizeMismatch {
        left: usize,
        right: usize,
    },
    /// Row position outside `0..size`.
    IndexOutOfRange {
        index: usize,
        size: usize,
    },
    /// A value could not be stored in a typed buffer.
    TypeMismatch {
        expected: DType,
        got: Value,
    },
    /// A custom filter returned something other than null, integers or booleans.
    InvalidFilterResult {
        value: Value,
    },
    /// Operand list misuse on a filter (wrong kind, cyclic tree).
    InvalidOperand {
        message: String,
    },
    /// Column backing storage that an operation cannot handle.
    UnsupportedColumn {
        column: String,
        message: String,
    },
    /// Column not found on a data source.
    ColumnNotFound {
        column: String,
    },
    /// Streamed data does not cover exactly the existing columns.
    StreamColumns {
        missing: Vec<String>,
        extra: Vec<String>,
    },
    /// Streamed columns have different lengths.
    StreamLengths {
        lengths: Vec<usize>,
    },
    /// Malformed or out-of-bounds patch descriptor.
    InvalidPatch {
        column: String,
        message: String,
    },
    /// Columns of a data source disagree on their length.
    InconsistentLengths {
        lengths: Vec<usize>,
    },
    /// Invalid slice bounds.
    InvalidSlice {
        message: String,
    },
    /// Shared state is still borrowed through a guard handed out earlier.
    Borrowed {
        resource: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SizeMismatch { left, right } => {
                write!(f, "Size mismatch: {} != {}", left, right)
            }
            Error::IndexOutOfRange { index, size } => {
                write!(f, "Index {} out of range for size {}", index, size)
            }
            Error::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: cannot store {} in a {} array", got, expected)
            }
            Error::InvalidFilterResult { value } => {
                write!(
                    f,
                    "Expected an array of integers or booleans, or null, got {}",
                    value
                )
            }
            Error::InvalidOperand { message } => {
                write!(f, "Invalid operand: {}", message)
            }
            Error::UnsupportedColumn { column, message } if column.is_empty() => {
                write!(f, "Unsupported column: {}", message)
            }
            Error::UnsupportedColumn { column, message } => {
                write!(f, "Unsupported column {}: {}", column, message)
            }
            Error::ColumnNotFound { column } => {
                write!(f, "Column not found: {}", column)
            }
            Error::StreamColumns { missing, extra } => {
                write!(f, "Must stream updates to all existing columns")?;
                match (missing.is_empty(), extra.is_empty()) {
                    (false, false) => write!(
                        f,
                        " (missing: {}, extra: {})",
                        missing.join(", "),
                        extra.join(", ")
                    ),
                    (false, true) => write!(f, " (missing: {})", missing.join(", ")),
                    (true, false) => write!(f, " (extra: {})", extra.join(", ")),
                    (true, true) => Ok(()),
                }
            }
            Error::StreamLengths { lengths } => {
                write!(
                    f,
                    "All streaming column updates must be the same length, got {:?}",
                    lengths
                )
            }
            Error::InvalidPatch { column, message } if column.is_empty() => {
                write!(f, "Invalid patch: {}", message)
            }
            Error::InvalidPatch { column, message } => {
                write!(f, "Invalid patch for column {}: {}", column, message)
            }
            Error::InconsistentLengths { lengths } => {
                write!(f, "Data source has columns of inconsistent lengths: {:?}", lengths)
            }
            Error::InvalidSlice { message } => {
                write!(f, "Invalid slice: {}", message)
            }
            Error::Borrowed { resource } => {
                write!(f, "Cannot modify {} while it is borrowed", resource)
            }
        }
    }
}

impl Error {
    /// Creates a size mismatch error.
    pub fn size_mismatch(left: usize, right: usize) -> Self {
        Error::SizeMismatch { left, right }
    }

    /// Creates an index out of range error.
    pub fn index_out_of_range(index: usize, size: usize) -> Self {
        Error::IndexOutOfRange { index, size }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: DType, got: Value) -> Self {
        Error::TypeMismatch { expected, got }
    }

    /// Creates an invalid filter result error.
    pub fn invalid_filter_result(value: Value) -> Self {
        Error::InvalidFilterResult { value }
    }

    /// Creates an invalid operand error.
    pub fn invalid_operand(message: impl Into<String>) -> Self {
        Error::InvalidOperand {
            message: message.into(),
        }
    }

    /// Creates an unsupported column error.
    pub fn unsupported_column(column: impl Into<String>, message: impl Into<String>) -> Self {
        Error::UnsupportedColumn {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates an invalid patch error.
    pub fn invalid_patch(column: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidPatch {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Attaches a column name to column-level errors raised without one.
    pub fn with_column(self, name: &str) -> Self {
        match self {
            Error::UnsupportedColumn { column, message } if column.is_empty() => {
                Error::UnsupportedColumn {
                    column: name.into(),
                    message,
                }
            }
            Error::InvalidPatch { column, message } if column.is_empty() => Error::InvalidPatch {
                column: name.into(),
                message,
            },
            other => other,
        }
    }

    /// Creates an invalid slice error.
    pub fn invalid_slice(message: impl Into<String>) -> Self {
        Error::InvalidSlice {
            message: message.into(),
        }
    }

    /// Creates a borrowed-state error.
    pub fn borrowed(resource: &'static str) -> Self {
        Error::Borrowed { resource }
    }
}
