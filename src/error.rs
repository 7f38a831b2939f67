use std::path::PathBuf;

use thiserror::Error;

/// The workbook could not be opened or its first sheet read.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("failed to open workbook {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {path:?} has no sheets")]
    NoSheets { path: PathBuf },

    #[error("failed to read first sheet of {path:?}: {source}")]
    Sheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read csv {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowFault {
    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("invalid {field} {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("invalid numeric data in {field} {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// A single row that could not become a record. Never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row}: {fault}")]
pub struct MalformedRow {
    pub row: usize,
    pub fault: RowFault,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown score component: {0}")]
pub struct UnknownComponent(pub String);
