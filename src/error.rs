use std::fmt;

use thiserror::Error;

use crate::types::{DataType, Mode};

/// Convenience result type for dataset and reader operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Fatal error type shared by the reader, writer, dataset and processing layers.
///
/// These abort the current operation. Malformed input lines are *not* reported through this type;
/// they become a [`LineError`] and are routed to the reject sink.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be decoded.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// A dataset mode string was not one of `rows`, `columns` or `matrix`.
    #[error("unknown dataset mode '{mode}'")]
    UnknownMode { mode: String },

    /// A row or column did not have the shape the dataset expects.
    #[error("shape mismatch: expected {expected} records, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The operation does not support the declared type of the column.
    #[error("{operation}: column {column} has unsupported type {data_type}")]
    UnsupportedColumnType {
        operation: &'static str,
        column: usize,
        data_type: DataType,
    },

    /// A column index past the end of the dataset.
    #[error("column index {column} out of range (columns={columns})")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// The operation needs a storage view the dataset's mode does not keep.
    #[error("{operation} is not available in {mode} mode")]
    UnsupportedMode { operation: &'static str, mode: Mode },

    /// A sort permutation that is not a permutation of `0..len`.
    #[error("invalid permutation: {message}")]
    InvalidPermutation { message: String },
}

/// What went wrong while parsing one field of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineErrorKind {
    /// The line ended before a quote or separator was fully matched.
    PrematureEol,
    /// The bytes at the cursor do not match the field's left quote.
    InvalidLeftQuote,
    /// No byte of the right quote was found before the end of the line.
    MissingRightQuote,
    /// The right quote's first byte was found but the rest did not match.
    InvalidRightQuote,
    /// No byte of the separator was found before the end of the line.
    MissingSeparator,
    /// The separator's first byte was found but the rest did not match.
    InvalidSeparator,
    /// The captured text could not be converted to the field's declared type.
    TypeConversion { message: String },
}

impl fmt::Display for LineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrematureEol => f.write_str("premature end of line"),
            Self::InvalidLeftQuote => f.write_str("invalid left quote"),
            Self::MissingRightQuote => f.write_str("missing right quote"),
            Self::InvalidRightQuote => f.write_str("invalid right quote"),
            Self::MissingSeparator => f.write_str("missing separator"),
            Self::InvalidSeparator => f.write_str("invalid separator"),
            Self::TypeConversion { message } => write!(f, "type conversion failed: {message}"),
        }
    }
}

/// A line rejected by the line parser.
///
/// The whole line is rejected even when only one field fails; `line` holds the raw bytes so the
/// reader can write it verbatim to the reject sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {kind} at field {field}, position {position} (line='{text}')", text = String::from_utf8_lossy(.line))]
pub struct LineError {
    pub kind: LineErrorKind,
    /// Index into the field metadata list.
    pub field: usize,
    /// Cursor position (byte offset) where parsing stopped.
    pub position: usize,
    /// Name of the parsing step that failed.
    pub operation: &'static str,
    pub line: Vec<u8>,
}
