//! Error types for sf-create-filter

use std::path::PathBuf;

use thiserror::Error;

/// Error type for headcount parsing and perimeter filtering
#[derive(Error, Debug)]
pub enum FilterError {
    /// Opening or reading an input file failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the perimeter to its output sink failed
    #[error("failed to write perimeter: {0}")]
    Output(#[source] std::io::Error),

    /// The CSV reader rejected a record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// URSSAF period code that is neither YYQM nor YYYYQM
    #[error("invalid URSSAF period: {0:?}")]
    InvalidPeriod(String),

    /// Headcount cell with no integer left once non-digits are stripped
    #[error("malformed headcount {value:?} on line {line}")]
    MalformedHeadcount { line: u64, value: String },

    /// Header column that does not name an effectif period
    #[error("this column is not a valid period: {0}")]
    InvalidColumnName(String),

    /// Headcount file without a header row
    #[error("empty headcount file: {0}")]
    EmptyFile(PathBuf),
}
