use std::fmt;
use thiserror::Error;

/// Fatal errors. These abort the load and, at startup, the process.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage unavailable at {location}")]
    StorageUnavailable {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The SQLite message is part of the text, so this variant has no source
    #[error("storage error: {0}")]
    Storage(rusqlite::Error),

    #[error("failed to read {table} source")]
    Source {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("unknown table: {0}")]
    UnknownTable(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(err)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single source row could not become an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowProblem {
    FieldCount { expected: usize, found: usize },
    EmptyRequired { column: &'static str },
    NotAnInteger { column: &'static str, value: String },
    InvalidUtf8,
}

impl fmt::Display for RowProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowProblem::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            RowProblem::EmptyRequired { column } => {
                write!(f, "required field '{}' is empty", column)
            }
            RowProblem::NotAnInteger { column, value } => {
                write!(f, "field '{}' is not an integer: {:?}", column, value)
            }
            RowProblem::InvalidUtf8 => write!(f, "row is not valid UTF-8"),
        }
    }
}

/// Per-table load failure. Recorded in the load report; the table is left
/// as it was before the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("malformed {table} row {row}: {problem}")]
    MalformedRow {
        table: &'static str,
        row: usize,
        problem: RowProblem,
    },

    #[error("duplicate key {key:?} in {table} row {row}")]
    DuplicateKey {
        table: &'static str,
        row: usize,
        key: String,
    },

    #[error("constraint violation in {table}: {message}")]
    Constraint { table: &'static str, message: String },
}

impl RowError {
    pub fn table(&self) -> &'static str {
        match self {
            RowError::MalformedRow { table, .. }
            | RowError::DuplicateKey { table, .. }
            | RowError::Constraint { table, .. } => table,
        }
    }

    /// 1-based data row the error refers to, if it refers to one
    pub fn row(&self) -> Option<usize> {
        match self {
            RowError::MalformedRow { row, .. } | RowError::DuplicateKey { row, .. } => Some(*row),
            RowError::Constraint { .. } => None,
        }
    }
}
