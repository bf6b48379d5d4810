//! Errors that stop the pipeline before a record store exists.
//!
//! Row-level problems never surface here; the cleaner absorbs and counts them
//! (see [`crate::cleaner::RejectReason`]).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested input file does not exist.
    #[error("data source not found: {path}")]
    SourceNotFound { path: String },

    /// One or more required header columns are absent.
    #[error(
        "schema mismatch: missing columns [{}], found [{}]",
        .missing.join(", "),
        .found.join(", ")
    )]
    SchemaMismatch {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
